/*!
Logging setup for the dump engine.

Operations emit structured `tracing` events; this module wires up a console
subscriber for binaries and tests that want them rendered.
*/

use tracing::subscriber::set_global_default;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::{DumpError, Result};

/// Initialize the global tracing subscriber with JSON console output.
///
/// The level defaults to `dump_core=info` and can be overridden through the
/// standard `RUST_LOG` environment variable. Fails if a global subscriber is
/// already installed.
pub fn init_logging() -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(false);

    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env().add_directive("dump_core=info".parse().unwrap()))
        .with(fmt_layer);

    set_global_default(subscriber)
        .map_err(|e| DumpError::config(format!("Failed to set global tracing subscriber: {e}")))?;

    tracing::info!("Dump engine logging initialized");
    Ok(())
}
