//! Metrics-based observability hooks for provider and tool runtime events.
//!
//! ```rust
//! use vobserve::MetricsObservabilityHooks;
//! use vprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! accepts_provider_hooks(&MetricsObservabilityHooks);
//! ```

use std::time::Duration;

use vprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use vtooling::{ToolExecutionContext, ToolOutcome, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, model: &str, _attempt: u32) {
        metrics::counter!(
            "voicelane_provider_attempt_start_total",
            "provider" => provider.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
    }

    fn on_candidate_fallback(
        &self,
        provider: ProviderId,
        from_model: &str,
        _to_model: &str,
        _error: &ProviderError,
    ) {
        metrics::counter!(
            "voicelane_provider_candidate_fallback_total",
            "provider" => provider.to_string(),
            "from_model" => from_model.to_string()
        )
        .increment(1);
    }

    fn on_success(&self, provider: ProviderId, model: &str, attempts: u32) {
        metrics::counter!(
            "voicelane_provider_success_total",
            "provider" => provider.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "voicelane_provider_attempts_per_success",
            "provider" => provider.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(&self, provider: ProviderId, model: &str, _attempts: u32, error: &ProviderError) {
        metrics::counter!(
            "voicelane_provider_failure_total",
            "provider" => provider.to_string(),
            "model" => model.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_tool_finished(
        &self,
        call: &ToolCall,
        context: &ToolExecutionContext,
        outcome: ToolOutcome<'_>,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "voicelane_tool_calls_total",
            "tool" => call.name.clone(),
            "outcome" => outcome.label(),
            "language" => context.language.clone()
        )
        .increment(1);
        metrics::histogram!(
            "voicelane_tool_call_duration_seconds",
            "tool" => call.name.clone(),
            "outcome" => outcome.label()
        )
        .record(elapsed.as_secs_f64());
    }
}
