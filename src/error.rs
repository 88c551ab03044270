use thiserror::Error;

/// Shown on the error screen when the API gave no message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to fetch weather data. Please try again.";

#[derive(Error, Debug)]
pub enum WeatherDashError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WeatherAPI returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl WeatherDashError {
    /// Text for the error screen. Only messages the API embedded in its
    /// response are surfaced; everything else gets the generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            WeatherDashError::Api { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WeatherDashError>;
