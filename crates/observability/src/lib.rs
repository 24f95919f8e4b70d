//! Tracing and logging setup shared by the shoplist binaries.

/// Tracing configuration (format, filters).
pub mod tracing;

pub use crate::tracing::{LogFormat, ParseLogFormatError, TracingConfig};

/// Initialize process-wide tracing.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(config: &TracingConfig) {
    crate::tracing::init(config);
}
