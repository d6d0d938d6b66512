//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// How the process-wide subscriber is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub filter: String,
    /// JSON lines when true, human-readable otherwise.
    pub json: bool,
}

impl Default for TracingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: true,
        }
    }
}

impl TracingSettings {
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(settings: &TracingSettings) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let installed = if settings.json {
        builder.json().try_init().is_ok()
    } else {
        builder.pretty().try_init().is_ok()
    };

    if installed {
        ::tracing::debug!(filter = %settings.filter, json = settings.json, "tracing initialised");
    }
}
