use crate::models::{
    CitySuggestion, HourlyEntry, TemperatureUnit, WeatherSnapshot, DEFAULT_HOURLY_LIMIT,
};
use crate::ui::components::{humidity_gauge, wind_gauge, SearchInput, SuggestionList};
use crate::ui::Theme;
use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

pub struct DashboardScreen<'a> {
    pub snapshot: &'a WeatherSnapshot,
    pub unit: TemperatureUnit,
    pub now: DateTime<Utc>,
    pub hourly_limit: usize,
    pub search_input: &'a str,
    pub search_focused: bool,
    pub suggestions: &'a [CitySuggestion],
    pub highlighted: Option<usize>,
    pub status_message: Option<&'a str>,
}

impl<'a> DashboardScreen<'a> {
    pub fn new(snapshot: &'a WeatherSnapshot, unit: TemperatureUnit) -> Self {
        Self {
            snapshot,
            unit,
            now: Utc::now(),
            hourly_limit: DEFAULT_HOURLY_LIMIT,
            search_input: "",
            search_focused: false,
            suggestions: &[],
            highlighted: None,
            status_message: None,
        }
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn hourly_limit(mut self, limit: usize) -> Self {
        self.hourly_limit = limit;
        self
    }

    pub fn with_search(mut self, input: &'a str, focused: bool) -> Self {
        self.search_input = input;
        self.search_focused = focused;
        self
    }

    pub fn with_suggestions(
        mut self,
        suggestions: &'a [CitySuggestion],
        highlighted: Option<usize>,
    ) -> Self {
        self.suggestions = suggestions;
        self.highlighted = highlighted;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }
}

impl Widget for DashboardScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Search box
                Constraint::Min(10),   // Current conditions and forecast
                Constraint::Length(1), // Status message
                Constraint::Length(1), // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);

        SearchInput::new("Search", self.search_input)
            .focused(self.search_focused)
            .render(chunks[1], buf);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[2]);

        self.render_current(body[0], buf);

        let outlook_height = self.snapshot.daily.len() as u16 + 3;
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(outlook_height)])
            .split(body[1]);

        self.render_hourly(right[0], buf);
        self.render_outlook(right[1], buf);

        self.render_status_message(chunks[3], buf);
        self.render_nav(chunks[4], buf);

        // Dropdown last so it sits on top of the body
        self.render_suggestions(chunks[1], area, buf);
    }
}

impl DashboardScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let title = format!("WeatherDash - {}", self.snapshot.location.display_name());

        let block = Block::default()
            .title(Span::styled(title, Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let local_time = self
            .snapshot
            .location
            .localtime
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        let info = Line::from(vec![
            Span::styled("Local time: ", Theme::dim()),
            Span::styled(local_time, Theme::normal()),
            Span::styled("  Unit: ", Theme::dim()),
            Span::styled(self.unit.symbol(), Theme::highlight()),
        ]);
        Paragraph::new(info).block(block).render(area, buf);
    }

    fn render_current(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(
                self.snapshot.location.name.as_str(),
                Theme::header(),
            ))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(3)])
            .split(inner);

        let current = &self.snapshot.current;
        let kind = current.condition.kind();

        let lines = vec![
            Line::from(vec![
                Span::styled(format!("{} ", kind.symbol()), Theme::condition(kind)),
                Span::styled(current.condition.text.as_str(), Theme::normal()),
            ]),
            Line::from(vec![]),
            Line::from(Span::styled(
                self.unit.format(current.temp_c),
                Theme::temperature(current.temp_c).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Feels like ", Theme::dim()),
                Span::styled(self.unit.format(current.feelslike_c), Theme::normal()),
            ]),
            Line::from(vec![]),
            Line::from(vec![
                Span::styled("Sunrise ", Theme::dim()),
                Span::styled(self.snapshot.sunrise(), Theme::normal()),
            ]),
            Line::from(vec![
                Span::styled("Sunset  ", Theme::dim()),
                Span::styled(self.snapshot.sunset(), Theme::normal()),
            ]),
        ];
        Paragraph::new(lines).render(sections[0], buf);

        let gauges = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(sections[1]);

        humidity_gauge("Humidity", Some(current.humidity)).render(gauges[0], buf);
        wind_gauge("Wind", Some(current.wind_kph)).render(gauges[1], buf);
    }

    fn render_hourly(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Upcoming Hours", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let upcoming = self.snapshot.upcoming_hours(self.now, self.hourly_limit);
        if upcoming.is_empty() {
            Paragraph::new(Span::styled("No more forecast hours today", Theme::dim()))
                .render(inner, buf);
            return;
        }

        let header = Row::new(vec![
            Cell::from("Time"),
            Cell::from("Temp"),
            Cell::from("Conditions"),
        ])
        .style(Theme::header());

        let rows: Vec<Row> = upcoming.iter().map(|h| self.hour_row(h)).collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Min(10),
        ];

        Table::new(rows, widths).header(header).render(inner, buf);
    }

    fn hour_row(&self, hour: &HourlyEntry) -> Row<'static> {
        let kind = hour.condition.kind();
        Row::new(vec![
            Cell::from(hour.time_label()),
            Cell::from(self.unit.format(hour.temp_c)).style(Theme::temperature(hour.temp_c)),
            Cell::from(format!("{} {}", kind.symbol(), hour.condition.text))
                .style(Theme::condition(kind)),
        ])
    }

    fn render_outlook(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Outlook", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let header = Row::new(vec![
            Cell::from("Day"),
            Cell::from("High / Low"),
            Cell::from("Rain"),
            Cell::from("Conditions"),
        ])
        .style(Theme::header());

        let rows: Vec<Row> = self
            .snapshot
            .daily
            .iter()
            .map(|day| {
                Row::new(vec![
                    Cell::from(day.date.format("%a %d %b").to_string()),
                    Cell::from(format!(
                        "{} / {}",
                        self.unit.format(day.max_temp_c),
                        self.unit.format(day.min_temp_c)
                    )),
                    Cell::from(format!("{}%", crate::models::round_half_up(day.chance_of_rain))),
                    Cell::from(day.condition.text.clone()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(11),
            Constraint::Length(14),
            Constraint::Length(6),
            Constraint::Min(10),
        ];

        Table::new(rows, widths).header(header).render(inner, buf);
    }

    fn render_suggestions(&self, search_area: Rect, area: Rect, buf: &mut Buffer) {
        if self.suggestions.is_empty() {
            return;
        }

        let list = SuggestionList::new(self.suggestions).highlighted(self.highlighted);
        let top = search_area.bottom();
        let available = area.bottom().saturating_sub(top);
        let dropdown = Rect {
            x: search_area.x,
            y: top,
            width: search_area.width,
            height: list.height().min(available),
        };
        list.render(dropdown, buf);
    }

    fn render_status_message(&self, area: Rect, buf: &mut Buffer) {
        if let Some(msg) = self.status_message {
            Paragraph::new(Span::styled(msg, Theme::success())).render(area, buf);
        }
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let nav = if self.search_focused {
            Line::from(vec![
                Span::styled("[Enter]", Theme::nav_key()),
                Span::styled("Go ", Theme::nav_label()),
                Span::styled("[↑↓]", Theme::nav_key()),
                Span::styled("Select ", Theme::nav_label()),
                Span::styled("[Esc]", Theme::nav_key()),
                Span::styled("Cancel", Theme::nav_label()),
            ])
        } else {
            Line::from(vec![
                Span::styled("[/]", Theme::nav_key()),
                Span::styled("Search ", Theme::nav_label()),
                Span::styled("[u]", Theme::nav_key()),
                Span::styled("°C/°F ", Theme::nav_label()),
                Span::styled("[r]", Theme::nav_key()),
                Span::styled("Refresh ", Theme::nav_label()),
                Span::styled("[q]", Theme::nav_key()),
                Span::styled("Quit", Theme::nav_label()),
            ])
        };

        Paragraph::new(nav).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weather::fixtures::snapshot_starting;
    use crate::ui::test_support::buffer_text;
    use chrono::{Duration, TimeZone};

    fn midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn render(screen: DashboardScreen<'_>) -> String {
        let area = Rect::new(0, 0, 110, 32);
        let mut buf = Buffer::empty(area);
        screen.render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn shows_location_and_six_upcoming_hours() {
        let snapshot = snapshot_starting(midnight());
        let text = render(
            DashboardScreen::new(&snapshot, TemperatureUnit::Celsius)
                .at(midnight() + Duration::hours(9) + Duration::minutes(15)),
        );

        assert!(text.contains("London"));
        for label in ["10:00 AM", "11:00 AM", "12:00 PM", "01:00 PM", "02:00 PM", "03:00 PM"] {
            assert!(text.contains(label), "missing {}", label);
        }
        assert!(!text.contains("09:00 AM"));
        assert!(!text.contains("04:00 PM"));
    }

    #[test]
    fn current_card_details() {
        let snapshot = snapshot_starting(midnight());
        let text = render(DashboardScreen::new(&snapshot, TemperatureUnit::Celsius).at(midnight()));

        assert!(text.contains("15°C"));
        assert!(text.contains("Partly cloudy"));
        assert!(text.contains("72%"));
        assert!(text.contains("16 km/h"));
        assert!(text.contains("06:45 AM"));
        assert!(text.contains("07:30 PM"));
    }

    #[test]
    fn fahrenheit_display() {
        let snapshot = snapshot_starting(midnight());
        let text = render(
            DashboardScreen::new(&snapshot, TemperatureUnit::Fahrenheit).at(midnight()),
        );
        // 14.6°C current temperature
        assert!(text.contains("58°F"));
        assert!(!text.contains("15°C"));
    }

    #[test]
    fn no_upcoming_hours_late_in_day() {
        let snapshot = snapshot_starting(midnight());
        let text = render(
            DashboardScreen::new(&snapshot, TemperatureUnit::Celsius)
                .at(midnight() + Duration::hours(23)),
        );
        assert!(text.contains("No more forecast hours today"));
    }

    #[test]
    fn status_line_uses_success_colour() {
        let snapshot = snapshot_starting(midnight());
        let area = Rect::new(0, 0, 110, 32);
        let mut buf = Buffer::empty(area);
        DashboardScreen::new(&snapshot, TemperatureUnit::Celsius)
            .at(midnight())
            .with_status(Some("Weather updated for London"))
            .render(area, &mut buf);

        // Status sits directly above the one-row nav bar
        let row = area.bottom() - 2;
        assert!(buffer_text(&buf)
            .lines()
            .nth(row as usize)
            .unwrap()
            .starts_with("Weather updated for London"));
        assert_eq!(buf[(0, row)].fg, Theme::SUCCESS);
    }

    #[test]
    fn suggestions_overlay_the_body() {
        let snapshot = snapshot_starting(midnight());
        let suggestions = vec![
            CitySuggestion::new("Paris", "France"),
            CitySuggestion::new("Paris", "United States of America"),
        ];
        let text = render(
            DashboardScreen::new(&snapshot, TemperatureUnit::Celsius)
                .at(midnight())
                .with_search("Par", true)
                .with_suggestions(&suggestions, Some(0)),
        );
        assert!(text.contains("Paris, France"));
        assert!(text.contains("Paris, United States of America"));
        assert!(text.contains("[Esc]"));
    }
}
