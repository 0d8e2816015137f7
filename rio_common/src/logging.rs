//! `tracing` subscriber bootstrap.
//!
//! The core only emits `tracing` events; installing a subscriber is up to
//! the embedding application. This helper gives every application the same
//! format: an `EnvFilter` seeded from the configured [`LogLevel`] (so
//! `RUST_LOG` can still refine it), plain text or JSON lines.

use crate::config::LogLevel;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Returns `false` if a global subscriber was already installed, which is
/// harmless (tests call this repeatedly).
pub fn init_tracing(level: LogLevel, json: bool) -> bool {
    let level: tracing::Level = level.into();
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    }
}
