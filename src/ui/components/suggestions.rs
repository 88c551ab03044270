use crate::models::CitySuggestion;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Widget},
};

/// Autocomplete dropdown drawn over whatever sits beneath the search box.
pub struct SuggestionList<'a> {
    suggestions: &'a [CitySuggestion],
    highlighted: Option<usize>,
}

impl<'a> SuggestionList<'a> {
    pub fn new(suggestions: &'a [CitySuggestion]) -> Self {
        Self {
            suggestions,
            highlighted: None,
        }
    }

    pub fn highlighted(mut self, index: Option<usize>) -> Self {
        self.highlighted = index;
        self
    }

    /// Rows needed including borders.
    pub fn height(&self) -> u16 {
        self.suggestions.len() as u16 + 2
    }
}

impl Widget for SuggestionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.suggestions.is_empty() || area.height < 3 {
            return;
        }

        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused());
        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = self
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let style = if Some(i) == self.highlighted {
                    Theme::selected()
                } else {
                    Theme::normal()
                };
                ListItem::new(Line::from(Span::styled(s.label(), style)))
            })
            .collect();

        List::new(items).render(inner, buf);
    }
}
