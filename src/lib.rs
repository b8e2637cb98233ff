pub mod api;
pub mod config;
pub mod debug;
pub mod error;
pub mod mail;
pub mod models;
pub mod rate_limit;
pub mod server;
pub mod state;
pub mod validation;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
