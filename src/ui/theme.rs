use crate::models::ConditionKind;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Magenta;
    pub const HIGHLIGHT: Color = Color::Cyan;

    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    /// Upper bounds (exclusive, Celsius) of the cold, cool and warm bands.
    const TEMP_BANDS: [(f64, Color); 3] = [
        (5.0, Color::LightBlue),
        (15.0, Color::Cyan),
        (25.0, Color::Yellow),
    ];
    const TEMP_HOT: Color = Color::Red;

    fn fg(color: Color) -> Style {
        Style::default().fg(color)
    }

    fn bold(color: Color) -> Style {
        Self::fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Self::bold(Self::ACCENT)
    }

    pub fn header() -> Style {
        Self::bold(Self::FG)
    }

    pub fn normal() -> Style {
        Self::fg(Self::FG)
    }

    pub fn dim() -> Style {
        Self::fg(Self::DIM)
    }

    pub fn highlight() -> Style {
        Self::bold(Self::HIGHLIGHT)
    }

    /// Highlighted suggestion row and the search cursor.
    pub fn selected() -> Style {
        Self::bold(Self::FG).bg(Self::DIM)
    }

    pub fn success() -> Style {
        Self::fg(Self::SUCCESS)
    }

    pub fn error() -> Style {
        Self::bold(Self::ERROR)
    }

    pub fn temp_color(temp_c: f64) -> Color {
        Self::TEMP_BANDS
            .iter()
            .find(|(upper, _)| temp_c < *upper)
            .map(|(_, color)| *color)
            .unwrap_or(Self::TEMP_HOT)
    }

    pub fn temperature(temp_c: f64) -> Style {
        Self::fg(Self::temp_color(temp_c))
    }

    pub fn condition(kind: ConditionKind) -> Style {
        let color = match kind {
            ConditionKind::Clear => Color::Yellow,
            ConditionKind::Clouds | ConditionKind::Other => Self::FG,
            ConditionKind::Rain | ConditionKind::Drizzle => Color::LightBlue,
            ConditionKind::Thunderstorm => Color::LightMagenta,
            ConditionKind::Snow => Color::White,
            ConditionKind::Mist | ConditionKind::Fog => Color::Gray,
        };
        Self::bold(color)
    }

    pub fn nav_key() -> Style {
        Self::bold(Self::ACCENT)
    }

    pub fn nav_label() -> Style {
        Self::dim()
    }

    pub fn border() -> Style {
        Self::dim()
    }

    pub fn border_focused() -> Style {
        Self::fg(Self::ACCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_color_bands() {
        assert_eq!(Theme::temp_color(-3.0), Color::LightBlue);
        assert_eq!(Theme::temp_color(5.0), Color::Cyan);
        assert_eq!(Theme::temp_color(20.0), Color::Yellow);
        assert_eq!(Theme::temp_color(25.0), Color::Red);
    }

    #[test]
    fn rain_and_sun_differ() {
        assert_ne!(
            Theme::condition(ConditionKind::Clear),
            Theme::condition(ConditionKind::Rain)
        );
    }
}
