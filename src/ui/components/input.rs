use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub const SEARCH_PLACEHOLDER: &str = "Search for a city...";

/// Single-line search box. The cursor always sits at the end of the text.
pub struct SearchInput<'a> {
    label: &'a str,
    value: &'a str,
    placeholder: &'a str,
    focused: bool,
}

impl<'a> SearchInput<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            placeholder: SEARCH_PLACEHOLDER,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let mut spans = if self.value.is_empty() {
            vec![Span::styled(self.placeholder, Theme::dim())]
        } else {
            vec![Span::styled(self.value, Theme::normal())]
        };

        if self.focused {
            if self.value.is_empty() {
                spans.insert(0, Span::styled(" ", Theme::selected()));
            } else {
                spans.push(Span::styled(" ", Theme::selected()));
            }
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}
