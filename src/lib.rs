pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod image;
pub mod observability;
pub mod routes;
pub mod server;

pub use config::Config;
pub use server::AppState;
