//! Panic isolation for observability hooks.
//!
//! A hook that panics must not take a driver's turn down with it, so every
//! callback runs under `catch_unwind` and a panic is logged and dropped.
//!
//! ```rust
//! use vobserve::{MetricsObservabilityHooks, SafeHooks};
//! use vprovider::{ProviderId, ProviderOperationHooks};
//!
//! let hooks = SafeHooks::new(MetricsObservabilityHooks);
//! hooks.on_attempt_start(ProviderId::OpenAi, "gpt-4.1-mini", 1);
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use vprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use vtooling::{ToolExecutionContext, ToolOutcome, ToolRuntimeHooks};

/// Wraps provider hooks, tool hooks, or a type implementing both.
#[derive(Debug, Clone, Default)]
pub struct SafeHooks<H> {
    inner: H,
}

impl<H> SafeHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

fn guarded(hook: &'static str, callback: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(callback)).is_err() {
        tracing::warn!(hook, "observability hook panicked; event dropped");
    }
}

impl<H> ProviderOperationHooks for SafeHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_attempt_start(&self, provider: ProviderId, model: &str, attempt: u32) {
        guarded("provider_attempt_start", || {
            self.inner.on_attempt_start(provider, model, attempt)
        });
    }

    fn on_candidate_fallback(
        &self,
        provider: ProviderId,
        from_model: &str,
        to_model: &str,
        error: &ProviderError,
    ) {
        guarded("provider_candidate_fallback", || {
            self.inner
                .on_candidate_fallback(provider, from_model, to_model, error)
        });
    }

    fn on_success(&self, provider: ProviderId, model: &str, attempts: u32) {
        guarded("provider_success", || {
            self.inner.on_success(provider, model, attempts)
        });
    }

    fn on_failure(&self, provider: ProviderId, model: &str, attempts: u32, error: &ProviderError) {
        guarded("provider_failure", || {
            self.inner.on_failure(provider, model, attempts, error)
        });
    }
}

impl<H> ToolRuntimeHooks for SafeHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_tool_started(&self, call: &ToolCall, context: &ToolExecutionContext) {
        guarded("tool_started", || self.inner.on_tool_started(call, context));
    }

    fn on_tool_finished(
        &self,
        call: &ToolCall,
        context: &ToolExecutionContext,
        outcome: ToolOutcome<'_>,
        elapsed: Duration,
    ) {
        guarded("tool_finished", || {
            self.inner.on_tool_finished(call, context, outcome, elapsed)
        });
    }
}
