//! Tracing subscriber setup
//!
//! Log lines go to stderr so stdout only carries the report. The span-trace
//! layer lets color-eyre attach the active spans to a failing run.

use tracing::Subscriber;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Subscriber filtered by `RUST_LOG`, falling back to `default_filter`
pub fn subscriber(default_filter: &str) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    with_filter(filter)
}

fn with_filter(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
}
