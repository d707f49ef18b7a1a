//! Process-wide tracing subscriber setup.
//!
//! ```rust
//! use vobserve::TracingOptions;
//!
//! let options = TracingOptions::new("voicelane=debug").with_json(true);
//! assert_eq!(options.default_directive, "voicelane=debug");
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

pub const DEFAULT_LOG_DIRECTIVE: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingOptions {
    /// Filter used when `RUST_LOG` is unset or invalid.
    pub default_directive: String,
    pub json: bool,
}

impl TracingOptions {
    pub fn new(default_directive: impl Into<String>) -> Self {
        Self {
            default_directive: default_directive.into(),
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive.as_str()))
    }
}

impl Default for TracingOptions {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_DIRECTIVE)
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_tracing(options: &TracingOptions) -> Result<(), TryInitError> {
    let fmt_layer = if options.json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(options.env_filter())
        .with(fmt_layer)
        .try_init()
}
