//! Tracing and logging (shared setup).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(settings: &TracingSettings) {
    tracing::init(settings);
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::TracingSettings;
