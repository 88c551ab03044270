use serde::{Deserialize, Serialize};

/// Display unit for temperatures. Values are always stored in Celsius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "c" | "celsius" => Some(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Some(TemperatureUnit::Fahrenheit),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Whole-degree display value for a Celsius reading.
    pub fn convert(&self, temp_c: f64) -> i64 {
        match self {
            TemperatureUnit::Celsius => round_half_up(temp_c),
            TemperatureUnit::Fahrenheit => round_half_up(celsius_to_fahrenheit(temp_c)),
        }
    }

    pub fn format(&self, temp_c: f64) -> String {
        format!("{}{}", self.convert(temp_c), self.symbol())
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Rounds .5 toward positive infinity, so -2.5 becomes -2.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_to_fahrenheit_known_values() {
        assert!((celsius_to_fahrenheit(0.0) - 32.0).abs() < 0.001);
        assert!((celsius_to_fahrenheit(100.0) - 212.0).abs() < 0.001);
        assert!((celsius_to_fahrenheit(-40.0) - (-40.0)).abs() < 0.001);
    }

    #[test]
    fn convert_rounds_to_whole_degrees() {
        assert_eq!(TemperatureUnit::Celsius.convert(11.4), 11);
        assert_eq!(TemperatureUnit::Celsius.convert(11.5), 12);
        // 21.3°C = 70.34°F
        assert_eq!(TemperatureUnit::Fahrenheit.convert(21.3), 70);
        // 0.25°C = 32.45°F
        assert_eq!(TemperatureUnit::Fahrenheit.convert(0.25), 32);
    }

    #[test]
    fn negative_halves_round_up() {
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(2.5), 3);
    }

    #[test]
    fn format_appends_symbol() {
        assert_eq!(TemperatureUnit::Celsius.format(18.2), "18°C");
        assert_eq!(TemperatureUnit::Fahrenheit.format(18.2), "65°F");
    }

    #[test]
    fn toggling_never_touches_the_stored_value() {
        let stored = 13.7;
        let unit = TemperatureUnit::Celsius;
        let before = unit.format(stored);
        let after = unit.toggle().toggle().format(stored);
        assert_eq!(before, after);
        assert_eq!(unit.toggle(), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn from_str_accepts_short_and_long_forms() {
        assert_eq!(TemperatureUnit::from_str("F"), Some(TemperatureUnit::Fahrenheit));
        assert_eq!(
            TemperatureUnit::from_str("celsius"),
            Some(TemperatureUnit::Celsius)
        );
        assert_eq!(TemperatureUnit::from_str("kelvin"), None);
    }
}
