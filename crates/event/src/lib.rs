mod date;
pub mod query;
mod root;
pub mod scheduler;
mod sweep;

pub use date::{format_date, parse_date};
pub use query::{AccountSummary, EventView, Query};
pub use root::*;
pub use scheduler::scheduler;
pub use sweep::SweepReport;
