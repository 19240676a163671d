mod password;
pub mod query;
mod root;

pub use query::{AccountView, Query};
pub use root::*;
