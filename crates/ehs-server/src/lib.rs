//! HTTP surface for the Vision EHS pipelines: the rule builder and video analysis
//! actions behind JSON or form-encoded POST endpoints.

pub mod config;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod state;

pub use config::{Config, ConfigError};
pub use server::{app_config, payload_config, run};
pub use state::AppState;
