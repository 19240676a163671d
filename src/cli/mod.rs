mod migrate;
mod server;
mod sweep;

pub use migrate::migrate;
pub use server::serve;
pub use sweep::sweep;
