pub mod dashboard;
pub mod error;
pub mod loading;

pub use dashboard::DashboardScreen;
pub use error::ErrorScreen;
pub use loading::LoadingScreen;
