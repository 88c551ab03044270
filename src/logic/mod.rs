pub mod fetch;

pub use fetch::{
    FetchCommand, FetchEvent, FetchService, ForecastRequest, RequestId, SuggestionRequest,
};
