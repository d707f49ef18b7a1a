//! Observability hooks for provider and tool events, plus subscriber setup.
//!
//! ```rust
//! use vobserve::{MetricsObservabilityHooks, SafeHooks, TracingObservabilityHooks};
//!
//! let _logged = SafeHooks::new(TracingObservabilityHooks);
//! let _metered = SafeHooks::new(MetricsObservabilityHooks);
//! ```

mod metrics_hooks;
mod safe_hooks;
mod subscriber;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeHooks;
pub use subscriber::{DEFAULT_LOG_DIRECTIVE, TracingOptions, init_tracing};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeHooks, TracingObservabilityHooks, TracingOptions,
        init_tracing,
    };
}

#[cfg(test)]
mod tests;
