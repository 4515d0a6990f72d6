//! Odin Application Shell
//!
//! This is the thin application shell that wires state and exposes commands.
//! Core business logic lives in the `crates/` directory.

pub mod commands;
pub mod error;
pub mod state;

pub use error::CommandError;
pub use state::{AppState, SharedStore};

/// Health check
pub fn health_check() -> String {
    tracing::info!("Health check called");
    "ok".to_string()
}

/// Get application version
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Initialize tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,odin=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check() {
        assert_eq!(health_check(), "ok");
    }

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }
}
