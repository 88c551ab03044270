pub mod suggestion;
pub mod units;
pub mod weather;

pub use suggestion::*;
pub use units::*;
pub use weather::*;
