//! Logging initialization

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the supplied default filter.
pub fn init(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
