use crate::config::Config;
use crate::error::Result;
use crate::logic::{FetchEvent, ForecastRequest, RequestId, SuggestionRequest};
use crate::models::{CitySuggestion, TemperatureUnit, WeatherSnapshot};

/// Which of the three screens is drawn. Being an enum, the loading, error
/// and data paths can never be active at the same time.
#[derive(Debug, Clone)]
pub enum ViewState {
    Loading,
    Error(String),
    Data(Box<WeatherSnapshot>),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            ViewState::Data(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

pub struct App {
    pub view: ViewState,
    pub selected_city: String,
    pub unit: TemperatureUnit,
    pub should_quit: bool,

    // Search box and autocomplete
    pub input_mode: InputMode,
    pub search_input: String,
    pub suggestions: Vec<CitySuggestion>,
    pub highlighted: Option<usize>,

    // UI state
    pub status_message: Option<String>,
    pub hourly_limit: usize,

    default_city: String,
    suggestion_min_chars: usize,
    forecast_generation: RequestId,
    suggestion_generation: RequestId,
}

impl App {
    pub fn new(config: &Config, start_city: Option<&str>) -> Self {
        let dashboard = &config.dashboard;
        let selected_city = start_city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(dashboard.default_city.as_str())
            .to_string();

        Self {
            view: ViewState::Loading,
            selected_city,
            unit: dashboard.unit,
            should_quit: false,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            suggestions: Vec::new(),
            highlighted: None,
            status_message: None,
            hourly_limit: dashboard.hourly_limit,
            default_city: dashboard.default_city.clone(),
            suggestion_min_chars: dashboard.suggestion_min_chars,
            forecast_generation: 0,
            suggestion_generation: 0,
        }
    }

    pub fn default_city(&self) -> &str {
        &self.default_city
    }

    /// Request for the city the app was started with.
    pub fn initial_request(&mut self) -> ForecastRequest {
        let city = self.selected_city.clone();
        self.begin_forecast(&city)
    }

    pub fn begin_forecast(&mut self, city: &str) -> ForecastRequest {
        self.forecast_generation += 1;
        self.selected_city = city.to_string();
        self.view = ViewState::Loading;
        ForecastRequest {
            id: self.forecast_generation,
            city: city.to_string(),
        }
    }

    /// Apply a forecast result. Returns false when a newer request has been
    /// issued since, in which case the result is dropped.
    pub fn apply_forecast(&mut self, id: RequestId, result: Result<WeatherSnapshot>) -> bool {
        if id != self.forecast_generation {
            tracing::debug!(
                id,
                latest = self.forecast_generation,
                "Discarding stale forecast"
            );
            return false;
        }

        match result {
            Ok(snapshot) => {
                self.set_status(&format!("Weather updated for {}", snapshot.location.name));
                self.view = ViewState::Data(Box::new(snapshot));
            }
            Err(e) => {
                self.view = ViewState::Error(e.user_message());
            }
        }
        true
    }

    pub fn handle_fetch_event(&mut self, event: FetchEvent) -> bool {
        match event {
            FetchEvent::Forecast { id, result } => self.apply_forecast(id, result),
            FetchEvent::Suggestions { id, result } => self.apply_suggestions(id, result),
        }
    }

    /// Id of the newest suggestion query; anything older is stale.
    pub fn suggestion_generation(&self) -> RequestId {
        self.suggestion_generation
    }

    pub fn set_search_input(&mut self, text: &str) -> Option<SuggestionRequest> {
        self.search_input = text.to_string();
        self.query_changed()
    }

    pub fn push_search_char(&mut self, c: char) -> Option<SuggestionRequest> {
        self.search_input.push(c);
        self.query_changed()
    }

    pub fn pop_search_char(&mut self) -> Option<SuggestionRequest> {
        self.search_input.pop();
        self.query_changed()
    }

    fn query_changed(&mut self) -> Option<SuggestionRequest> {
        self.suggestion_generation += 1;

        if self.search_input.chars().count() < self.suggestion_min_chars {
            self.clear_suggestions();
            return None;
        }

        Some(SuggestionRequest {
            id: self.suggestion_generation,
            query: self.search_input.clone(),
        })
    }

    pub fn apply_suggestions(
        &mut self,
        id: RequestId,
        result: Result<Vec<CitySuggestion>>,
    ) -> bool {
        if id != self.suggestion_generation {
            tracing::trace!(id, "Discarding stale suggestions");
            return false;
        }

        match result {
            Ok(suggestions) => {
                self.suggestions = suggestions;
                self.highlighted = None;
            }
            Err(e) => {
                tracing::warn!("Error fetching suggestions: {}", e);
                self.clear_suggestions();
            }
        }
        true
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.highlighted = None;
    }

    /// Drop the typed query and any suggestions, and ignore in-flight ones.
    fn reset_search(&mut self) {
        self.search_input.clear();
        self.suggestion_generation += 1;
        self.clear_suggestions();
    }

    pub fn submit_search(&mut self) -> Option<ForecastRequest> {
        let city = self.search_input.trim().to_string();
        if city.is_empty() {
            return None;
        }
        self.reset_search();
        self.input_mode = InputMode::Normal;
        Some(self.begin_forecast(&city))
    }

    pub fn select_suggestion(&mut self, index: usize) -> Option<ForecastRequest> {
        let city = self.suggestions.get(index)?.name.clone();
        self.reset_search();
        self.input_mode = InputMode::Normal;
        Some(self.begin_forecast(&city))
    }

    /// Enter in the search box: the highlighted suggestion wins over the raw text.
    pub fn confirm_search(&mut self) -> Option<ForecastRequest> {
        match self.highlighted {
            Some(index) => self.select_suggestion(index),
            None => self.submit_search(),
        }
    }

    pub fn highlight_next(&mut self) {
        if self.suggestions.is_empty() {
            return;
        }
        let last = self.suggestions.len() - 1;
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) if i < last => i + 1,
            Some(i) => i,
        });
    }

    pub fn highlight_prev(&mut self) {
        self.highlighted = match self.highlighted {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Search;
        self.clear_status();
    }

    pub fn leave_search_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.suggestion_generation += 1;
        self.clear_suggestions();
    }

    /// "Try Again" always goes back to the default city.
    pub fn retry(&mut self) -> ForecastRequest {
        let city = self.default_city.clone();
        self.begin_forecast(&city)
    }

    pub fn refresh(&mut self) -> Option<ForecastRequest> {
        if !matches!(self.view, ViewState::Data(_)) {
            return None;
        }
        let city = self.selected_city.clone();
        self.set_status("Refreshing data...");
        Some(self.begin_forecast(&city))
    }

    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggle();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
