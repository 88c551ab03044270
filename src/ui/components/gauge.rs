use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Bordered reading with a one-row bar underneath.
pub struct GaugeWidget<'a> {
    title: &'a str,
    value: Option<f64>,
    unit: &'a str,
    max: f64,
    bands: Vec<(f64, Color)>,
}

impl<'a> GaugeWidget<'a> {
    pub fn new(title: &'a str, value: Option<f64>, unit: &'a str) -> Self {
        Self {
            title,
            value,
            unit,
            max: 100.0,
            bands: Vec::new(),
        }
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    /// Colour bands as (lower bound, colour), ascending.
    pub fn bands(mut self, bands: Vec<(f64, Color)>) -> Self {
        self.bands = bands;
        self
    }

    fn color_for(&self, value: f64) -> Color {
        self.bands
            .iter()
            .rev()
            .find(|(lower, _)| value >= *lower)
            .map(|(_, color)| *color)
            .unwrap_or(Theme::FG)
    }

    fn ratio(&self, value: f64) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (value / self.max).clamp(0.0, 1.0)
    }
}

impl Widget for GaugeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(value) = self.value else {
            Paragraph::new(Span::styled("N/A", Theme::dim())).render(inner, buf);
            return;
        };

        let color = self.color_for(value);
        let reading = format!("{}{}", crate::models::round_half_up(value), self.unit);
        let reading_width = reading.chars().count() as u16 + 1;
        Paragraph::new(Line::from(Span::styled(reading, Style::default().fg(color))))
            .render(inner, buf);

        // Bar fills the rest of the row after the reading
        if inner.width > reading_width + 2 {
            let bar_x = inner.x + reading_width;
            let bar_width = inner.width - reading_width;
            let filled = (bar_width as f64 * self.ratio(value)).round() as u16;

            for x in bar_x..bar_x + bar_width {
                let ch = if x < bar_x + filled { '█' } else { '░' };
                buf[(x, inner.y)].set_char(ch).set_fg(color);
            }
        }
    }
}

pub fn humidity_gauge(title: &str, value: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, "%").max(100.0).bands(vec![
        (0.0, Theme::WARNING),
        (30.0, Theme::SUCCESS),
        (70.0, Theme::HIGHLIGHT),
    ])
}

pub fn wind_gauge(title: &str, value_kph: Option<f64>) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value_kph, " km/h").max(80.0).bands(vec![
        (0.0, Theme::SUCCESS),
        (30.0, Theme::WARNING),
        (50.0, Theme::ERROR),
    ])
}
