//! Log lines for provider attempts and tool calls.
//!
//! Tool events carry the session, language and tool round, so one driver's
//! request can be followed across provider and tool logs.
//!
//! ```rust
//! use vobserve::TracingObservabilityHooks;
//! use vtooling::ToolRuntimeHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! accepts_tool_hooks(&TracingObservabilityHooks);
//! ```

use std::time::Duration;

use vprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall};
use vtooling::{ToolExecutionContext, ToolOutcome, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, model: &str, attempt: u32) {
        tracing::debug!(provider = %provider, model, attempt, "provider attempt started");
    }

    fn on_candidate_fallback(
        &self,
        provider: ProviderId,
        from_model: &str,
        to_model: &str,
        error: &ProviderError,
    ) {
        tracing::warn!(
            provider = %provider,
            from_model,
            to_model,
            status = error.status,
            "model unavailable; trying next candidate"
        );
    }

    fn on_success(&self, provider: ProviderId, model: &str, attempts: u32) {
        tracing::info!(provider = %provider, model, attempts, "provider answered");
    }

    fn on_failure(&self, provider: ProviderId, model: &str, attempts: u32, error: &ProviderError) {
        tracing::error!(
            provider = %provider,
            model,
            attempts,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error,
            "provider request failed"
        );
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_tool_started(&self, call: &ToolCall, context: &ToolExecutionContext) {
        tracing::info!(
            tool = %call.name,
            call_id = %call.id,
            session_id = context.session_label(),
            language = %context.language,
            round = context.round,
            "tool call started"
        );
    }

    fn on_tool_finished(
        &self,
        call: &ToolCall,
        context: &ToolExecutionContext,
        outcome: ToolOutcome<'_>,
        elapsed: Duration,
    ) {
        let elapsed_ms = elapsed.as_millis() as u64;
        match outcome {
            ToolOutcome::Answered(result) => tracing::info!(
                tool = %call.name,
                call_id = %call.id,
                session_id = context.session_label(),
                round = context.round,
                output_chars = result.output.chars().count(),
                elapsed_ms,
                "tool call answered"
            ),
            ToolOutcome::Failed(error) => tracing::warn!(
                tool = %call.name,
                call_id = %call.id,
                session_id = context.session_label(),
                round = context.round,
                error_kind = ?error.kind,
                retryable = error.retryable,
                error = %error,
                elapsed_ms,
                "tool call failed"
            ),
        }
    }
}
