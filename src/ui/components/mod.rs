pub mod gauge;
pub mod input;
pub mod suggestions;

pub use gauge::{humidity_gauge, wind_gauge};
pub use input::SearchInput;
pub use suggestions::SuggestionList;
