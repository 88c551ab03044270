use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of upcoming hours shown on the dashboard.
pub const DEFAULT_HOURLY_LIMIT: usize = 6;

/// Everything the dashboard shows for one city. Built once per successful
/// forecast fetch and replaced wholesale by the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub location: Location,
    pub current: CurrentConditions,
    pub astro: Option<Astro>,
    pub hourly: Vec<HourlyEntry>, // forecast day 0 only
    pub daily: Vec<DailyForecast>,
}

impl WeatherSnapshot {
    /// Hourly entries strictly after `now`, in payload order, at most `limit`.
    pub fn upcoming_hours(&self, now: DateTime<Utc>, limit: usize) -> Vec<&HourlyEntry> {
        self.hourly
            .iter()
            .filter(|h| h.timestamp > now)
            .take(limit)
            .collect()
    }

    pub fn sunrise(&self) -> String {
        self.astro
            .as_ref()
            .map(|a| format_clock(&a.sunrise))
            .unwrap_or_default()
    }

    pub fn sunset(&self) -> String {
        self.astro
            .as_ref()
            .map(|a| format_clock(&a.sunset))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    pub localtime: Option<NaiveDateTime>,
}

impl Location {
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub humidity: f64, // percent
    pub wind_kph: f64,
    pub condition: Condition,
}

impl CurrentConditions {
    pub fn wind_display(&self) -> String {
        format!("{} km/h", super::units::round_half_up(self.wind_kph))
    }

    pub fn humidity_display(&self) -> String {
        format!("{}%", super::units::round_half_up(self.humidity))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub timestamp: DateTime<Utc>,
    pub local_time: NaiveDateTime,
    pub temp_c: f64,
    pub condition: Condition,
}

impl HourlyEntry {
    /// Location-local clock label, e.g. "01:00 PM".
    pub fn time_label(&self) -> String {
        self.local_time.format("%I:%M %p").to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub chance_of_rain: f64,
    pub condition: Condition,
}

/// Condition as reported by WeatherAPI: free text, icon URL and numeric code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    pub code: u32,
}

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        ConditionKind::from_code(self.code)
    }
}

/// Coarse condition categories derived from WeatherAPI condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConditionKind {
    #[default]
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Other,
}

impl ConditionKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            1000 => ConditionKind::Clear,
            1003 | 1006 | 1009 => ConditionKind::Clouds,
            1030 => ConditionKind::Mist,
            1135 | 1147 => ConditionKind::Fog,
            1087 | 1273..=1282 => ConditionKind::Thunderstorm,
            1072 | 1150 | 1153 | 1168 | 1171 => ConditionKind::Drizzle,
            1063 | 1180..=1201 | 1240..=1246 => ConditionKind::Rain,
            1066 | 1069 | 1114 | 1117 | 1204..=1237 | 1249..=1264 => ConditionKind::Snow,
            _ => ConditionKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKind::Clear => "Clear",
            ConditionKind::Clouds => "Cloudy",
            ConditionKind::Rain => "Rain",
            ConditionKind::Drizzle => "Drizzle",
            ConditionKind::Thunderstorm => "Thunderstorm",
            ConditionKind::Snow => "Snow",
            ConditionKind::Mist => "Mist",
            ConditionKind::Fog => "Fog",
            ConditionKind::Other => "Other",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ConditionKind::Clear => "☀",
            ConditionKind::Clouds => "☁",
            ConditionKind::Rain => "🌧",
            ConditionKind::Drizzle => "🌦",
            ConditionKind::Thunderstorm => "⛈",
            ConditionKind::Snow => "❄",
            ConditionKind::Mist => "🌫",
            ConditionKind::Fog => "🌫",
            ConditionKind::Other => "?",
        }
    }
}

impl std::fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Collapses stray whitespace in API clock strings ("06:45  AM" -> "06:45 AM").
pub fn format_clock(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
