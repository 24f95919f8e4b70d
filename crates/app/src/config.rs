//! Start-up configuration from the environment.

use shoplist_observability::{LogFormat, TracingConfig};
use tracing_subscriber::EnvFilter;

/// Log output format: `json` (default) or `pretty`.
pub const LOG_FORMAT_VAR: &str = "SHOPLIST_LOG_FORMAT";

/// Standard `EnvFilter` directives.
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub tracing: TracingConfig,
    /// Problems found while reading the environment. Tracing is not up yet at
    /// that point, so the caller logs these after `init`.
    pub warnings: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut tracing = TracingConfig::default();
        let mut warnings = Vec::new();

        if let Some(raw) = lookup(LOG_FORMAT_VAR) {
            match raw.parse::<LogFormat>() {
                Ok(format) => tracing.format = format,
                Err(e) => warnings.push(format!("{LOG_FORMAT_VAR}: {e}; using json")),
            }
        }

        if let Some(filter) = lookup(LOG_FILTER_VAR).filter(|f| !f.trim().is_empty()) {
            match EnvFilter::try_new(&filter) {
                Ok(_) => tracing.filter = filter,
                Err(e) => warnings.push(format!(
                    "{LOG_FILTER_VAR}: invalid filter `{filter}` ({e}); using {}",
                    tracing.filter
                )),
            }
        }

        Self { tracing, warnings }
    }
}
