// Library interface for testing
pub mod config;
pub mod constants;
pub mod error;
pub mod file_utils;
pub mod latency;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::{Args, ServerConfig};
pub use server::FixtureServer;
pub use state::AppState;
