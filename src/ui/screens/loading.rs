use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct LoadingScreen<'a> {
    pub city: &'a str,
}

impl<'a> LoadingScreen<'a> {
    pub fn new(city: &'a str) -> Self {
        Self { city }
    }
}

impl Widget for LoadingScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let lines = vec![
            Line::from(Span::styled("Loading weather data...", Theme::header())),
            Line::from(vec![]),
            Line::from(Span::styled(format!("Fetching {}", self.city), Theme::dim())),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let nav = Line::from(vec![
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::buffer_text;

    #[test]
    fn shows_city_being_fetched() {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        LoadingScreen::new("Tokyo").render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Loading weather data..."));
        assert!(text.contains("Fetching Tokyo"));
    }
}
