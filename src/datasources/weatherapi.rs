use crate::config::WeatherApiConfig;
use crate::error::{Result, WeatherDashError};
use crate::models::{
    Astro, CitySuggestion, Condition, CurrentConditions, DailyForecast, HourlyEntry, Location,
    WeatherSnapshot,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Forecast window requested from WeatherAPI, in days.
const FORECAST_DAYS: &str = "3";

pub struct WeatherApiClient {
    client: reqwest::Client,
    config: WeatherApiConfig,
}

// WeatherAPI response structures
#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    localtime: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    code: u32,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    #[serde(default)]
    feelslike_c: Option<f64>,
    #[serde(deserialize_with = "number_or_string")]
    humidity: f64,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    day: WaDay,
    #[serde(default)]
    astro: Option<WaAstro>,
    #[serde(default)]
    hour: Vec<WaHour>,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    #[serde(default, deserialize_with = "number_or_string")]
    daily_chance_of_rain: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaAstro {
    #[serde(default)]
    sunrise: String,
    #[serde(default)]
    sunset: String,
}

#[derive(Debug, Deserialize)]
struct WaHour {
    time_epoch: i64,
    time: String,
    temp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaErrorEnvelope {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    #[allow(dead_code)]
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

/// WeatherAPI has historically sent some numeric fields as strings.
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("expected a number, got '{}'", s))),
    }
}

impl WeatherApiClient {
    pub fn new(config: WeatherApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), name)
    }

    /// Current conditions plus the hourly/daily forecast for `city`.
    pub async fn fetch_forecast(&self, city: &str) -> Result<WeatherSnapshot> {
        let response: WaForecastResponse = self
            .get_json(
                &self.endpoint("forecast.json"),
                &[
                    ("key", self.config.api_key.as_str()),
                    ("q", city),
                    ("days", FORECAST_DAYS),
                    ("aqi", "no"),
                ],
            )
            .await?;

        Ok(convert_forecast(response, Utc::now()))
    }

    /// City-name completions for a partial query.
    pub async fn search(&self, query: &str) -> Result<Vec<CitySuggestion>> {
        self.get_json(
            &self.endpoint("search.json"),
            &[("key", self.config.api_key.as_str()), ("q", query)],
        )
        .await
    }

    /// Test connection to WeatherAPI using a cheap search request
    pub async fn test_connection(&self, probe: &str) -> Result<bool> {
        let response = self
            .client
            .get(self.endpoint("search.json"))
            .query(&[("key", self.config.api_key.as_str()), ("q", probe)])
            .send()
            .await
            .map_err(|e| WeatherDashError::DataSourceUnavailable(format!("WeatherAPI: {}", e)))?;

        Ok(response.status().is_success())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        tracing::debug!(url, "WeatherAPI request");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherDashError::DataSourceUnavailable(format!("WeatherAPI: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            WeatherDashError::DataSourceUnavailable(format!(
                "Failed to read WeatherAPI body: {}",
                e
            ))
        })?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            WeatherDashError::InvalidData(format!("Failed to parse WeatherAPI response: {}", e))
        })
    }
}

/// Prefer the message WeatherAPI embeds in its error body.
fn api_error(status: u16, body: &str) -> WeatherDashError {
    match serde_json::from_str::<WaErrorEnvelope>(body) {
        Ok(envelope) => WeatherDashError::Api {
            status,
            message: envelope.error.message,
        },
        Err(_) => WeatherDashError::DataSourceUnavailable(format!(
            "WeatherAPI returned {}: {}",
            status,
            truncate_body(body)
        )),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

fn convert_condition(condition: WaCondition) -> Condition {
    Condition {
        text: condition.text,
        icon: condition.icon,
        code: condition.code,
    }
}

fn convert_forecast(response: WaForecastResponse, fetched_at: DateTime<Utc>) -> WeatherSnapshot {
    let location = Location {
        name: response.location.name,
        region: response.location.region,
        country: response.location.country,
        localtime: response
            .location
            .localtime
            .as_deref()
            .and_then(|t| NaiveDateTime::parse_from_str(t, LOCAL_TIME_FORMAT).ok()),
    };

    let current = CurrentConditions {
        temp_c: response.current.temp_c,
        feelslike_c: response.current.feelslike_c.unwrap_or(response.current.temp_c),
        humidity: response.current.humidity,
        wind_kph: response.current.wind_kph,
        condition: convert_condition(response.current.condition),
    };

    let mut days = response.forecast.forecastday.into_iter();

    // Astro and hourly data come from the first forecast day only
    let (astro, hourly, first_daily) = match days.next() {
        Some(first) => {
            let astro = first.astro.map(|a| Astro {
                sunrise: a.sunrise,
                sunset: a.sunset,
            });
            let hourly = first.hour.into_iter().filter_map(convert_hour).collect();
            let daily = convert_day(first.date, first.day);
            (astro, hourly, Some(daily))
        }
        None => (None, Vec::new(), None),
    };

    let daily = first_daily
        .into_iter()
        .chain(days.map(|d| convert_day(d.date, d.day)))
        .collect();

    WeatherSnapshot {
        fetched_at,
        location,
        current,
        astro,
        hourly,
        daily,
    }
}

fn convert_hour(hour: WaHour) -> Option<HourlyEntry> {
    let Some(timestamp) = DateTime::from_timestamp(hour.time_epoch, 0) else {
        tracing::debug!("Skipping hour with bad epoch {}", hour.time_epoch);
        return None;
    };

    let local_time = NaiveDateTime::parse_from_str(&hour.time, LOCAL_TIME_FORMAT)
        .unwrap_or_else(|_| timestamp.naive_utc());

    Some(HourlyEntry {
        timestamp,
        local_time,
        temp_c: hour.temp_c,
        condition: convert_condition(hour.condition),
    })
}

fn convert_day(date: NaiveDate, day: WaDay) -> DailyForecast {
    DailyForecast {
        date,
        max_temp_c: day.maxtemp_c,
        min_temp_c: day.mintemp_c,
        chance_of_rain: day.daily_chance_of_rain,
        condition: convert_condition(day.condition),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::london_forecast;
    use super::*;
    use chrono::{Duration, TimeZone};
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn sample_config(base_url: &str) -> WeatherApiConfig {
        WeatherApiConfig {
            api_key: "test_key".to_string(),
            base_url: base_url.to_string(),
            timeout_secs: 5,
        }
    }

    fn client_for(server: &MockServer) -> WeatherApiClient {
        WeatherApiClient::new(sample_config(&server.uri())).unwrap()
    }

    #[test]
    fn convert_forecast_payload() {
        let response: WaForecastResponse = serde_json::from_value(london_forecast()).unwrap();
        let fetched_at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 55, 0).unwrap();
        let snapshot = convert_forecast(response, fetched_at);

        assert_eq!(snapshot.location.name, "London");
        assert_eq!(snapshot.current.humidity, 68.0);
        assert_eq!(snapshot.current.condition.code, 1003);
        assert_eq!(snapshot.sunrise(), "04:44 AM");
        assert_eq!(snapshot.hourly.len(), 3);
        assert_eq!(snapshot.hourly[1].time_label(), "11:00 AM");
        assert_eq!(snapshot.daily.len(), 2);
        assert_eq!(snapshot.daily[1].chance_of_rain, 10.0);
        assert!(snapshot.location.localtime.is_some());

        // 10:00 local is 09:00 UTC, so every hour is still ahead
        assert_eq!(snapshot.upcoming_hours(fetched_at, 6).len(), 3);
        let later = fetched_at + Duration::hours(1);
        assert_eq!(snapshot.upcoming_hours(later, 6).len(), 2);
    }

    #[test]
    fn api_error_prefers_embedded_message() {
        let err = api_error(
            400,
            r#"{"error":{"code":1006,"message":"No matching location found."}}"#,
        );
        assert_eq!(err.user_message(), "No matching location found.");

        let err = api_error(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, WeatherDashError::DataSourceUnavailable(_)));
    }

    #[test]
    fn truncate_long_bodies() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.len(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[tokio::test]
    async fn fetch_forecast_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .and(query_param("key", "test_key"))
            .and(query_param("q", "London"))
            .and(query_param("days", "3"))
            .and(query_param("aqi", "no"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_forecast()))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = client_for(&server).fetch_forecast("London").await.unwrap();
        assert_eq!(snapshot.location.name, "London");
        assert_eq!(snapshot.current.temp_c, 16.4);
    }

    #[tokio::test]
    async fn fetch_forecast_encodes_city_with_spaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .and(query_param("q", "New York"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_forecast()))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_forecast("New York").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn fetch_forecast_unknown_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "code": 1006, "message": "No matching location found." }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_forecast("Atlantis")
            .await
            .unwrap_err();
        match &err {
            WeatherDashError::Api { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "No matching location found.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn fetch_forecast_server_error_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_forecast("London")
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherDashError::DataSourceUnavailable(_)));
        assert_eq!(err.user_message(), crate::error::FALLBACK_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn fetch_forecast_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_forecast("London")
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherDashError::InvalidData(_)));
    }

    #[tokio::test]
    async fn search_returns_suggestions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "Lon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 2801268,
                    "name": "London",
                    "region": "City of London, Greater London",
                    "country": "United Kingdom"
                },
                { "id": 315398, "name": "London", "region": "Ontario", "country": "Canada" }
            ])))
            .mount(&server)
            .await;

        let suggestions = client_for(&server).search("Lon").await.unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[1].label(), "London, Canada");
    }

    #[tokio::test]
    async fn base_url_trailing_slash_is_tolerated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            WeatherApiClient::new(sample_config(&format!("{}/", server.uri()))).unwrap();
        assert!(client.search("Pa").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connection_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "code": 2006, "message": "API key is invalid." }
            })))
            .mount(&server)
            .await;

        assert!(!client_for(&server).test_connection("London").await.unwrap());
    }
}
