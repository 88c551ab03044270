use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct ErrorScreen<'a> {
    pub message: &'a str,
    pub retry_city: &'a str,
}

impl<'a> ErrorScreen<'a> {
    pub fn new(message: &'a str, retry_city: &'a str) -> Self {
        Self {
            message,
            retry_city,
        }
    }
}

impl Widget for ErrorScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(7),
                Constraint::Min(0),
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(15),
                Constraint::Percentage(70),
                Constraint::Percentage(15),
            ])
            .split(chunks[1]);

        let block = Block::default()
            .title(Span::styled("WeatherDash", Theme::title()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let lines = vec![
            Line::from(Span::styled(self.message, Theme::error())),
            Line::from(vec![]),
            Line::from(vec![
                Span::styled("[r]", Theme::nav_key()),
                Span::styled(" Try Again ", Theme::normal()),
                Span::styled(format!("({})", self.retry_city), Theme::dim()),
            ]),
        ];

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(middle[1], buf);

        let nav = Line::from(vec![
            Span::styled("[r]", Theme::nav_key()),
            Span::styled("Try Again ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[3], buf);
    }
}
