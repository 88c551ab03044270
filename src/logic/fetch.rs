use crate::datasources::WeatherApiClient;
use crate::error::Result;
use crate::models::{CitySuggestion, WeatherSnapshot};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Generation number the app assigns to every request it issues.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub id: RequestId,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub id: RequestId,
    pub query: String,
}

/// Work the UI loop asks the fetch service to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCommand {
    Forecast(ForecastRequest),
    Suggestions(SuggestionRequest),
}

#[derive(Debug)]
pub enum FetchEvent {
    Forecast {
        id: RequestId,
        result: Result<WeatherSnapshot>,
    },
    Suggestions {
        id: RequestId,
        result: Result<Vec<CitySuggestion>>,
    },
}

/// Runs API calls on tokio tasks and reports results over a channel so the
/// UI loop never blocks on the network.
pub struct FetchService {
    client: Arc<WeatherApiClient>,
    tx: mpsc::UnboundedSender<FetchEvent>,
    debounce: Duration,
    latest_suggestion: Arc<AtomicU64>,
}

impl FetchService {
    pub fn new(
        client: WeatherApiClient,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<FetchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let service = Self {
            client: Arc::new(client),
            tx,
            debounce,
            latest_suggestion: Arc::new(AtomicU64::new(0)),
        };
        (service, rx)
    }

    pub fn dispatch(&self, command: FetchCommand) {
        match command {
            FetchCommand::Forecast(request) => self.spawn_forecast(request),
            FetchCommand::Suggestions(request) => self.spawn_suggestions(request),
        }
    }

    pub fn spawn_forecast(&self, request: ForecastRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            tracing::debug!(id = request.id, city = %request.city, "Fetching forecast");
            let result = client.fetch_forecast(&request.city).await;
            if let Err(ref e) = result {
                tracing::warn!("Forecast fetch for {} failed: {}", request.city, e);
            }
            if tx
                .send(FetchEvent::Forecast {
                    id: request.id,
                    result,
                })
                .is_err()
            {
                tracing::debug!("Forecast result dropped, receiver closed");
            }
        });
    }

    /// Marks every suggestion request older than `id` as stale, including
    /// ones the app dropped without issuing a replacement.
    pub fn supersede_suggestions(&self, id: RequestId) {
        self.latest_suggestion.fetch_max(id, Ordering::SeqCst);
    }

    /// Debounced: a request superseded during the wait never hits the network.
    pub fn spawn_suggestions(&self, request: SuggestionRequest) {
        self.supersede_suggestions(request.id);

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let latest = Arc::clone(&self.latest_suggestion);
        let debounce = self.debounce;

        tokio::spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }
            if latest.load(Ordering::SeqCst) != request.id {
                tracing::trace!(id = request.id, "Suggestion request superseded");
                return;
            }

            let result = client.search(&request.query).await;
            if tx
                .send(FetchEvent::Suggestions {
                    id: request.id,
                    result,
                })
                .is_err()
            {
                tracing::debug!("Suggestion result dropped, receiver closed");
            }
        });
    }
}
