use serde::{Deserialize, Serialize};

/// One autocomplete result from the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    #[serde(default)]
    pub region: String,
    pub country: String,
}

impl CitySuggestion {
    pub fn new(name: &str, country: &str) -> Self {
        Self {
            name: name.to_string(),
            region: String::new(),
            country: country.to_string(),
        }
    }

    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

impl std::fmt::Display for CitySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
