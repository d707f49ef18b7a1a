use std::sync::{Arc, Mutex};
use std::time::Duration;

use vcommon::SessionId;
use vprovider::{
    ProviderError, ProviderId, ProviderOperationHooks, ToolCall, execute_with_candidates,
};
use vtooling::{
    ToolError, ToolExecutionContext, ToolExecutionResult, ToolOutcome, ToolRuntimeHooks,
};

use crate::{
    DEFAULT_LOG_DIRECTIVE, MetricsObservabilityHooks, SafeHooks, TracingObservabilityHooks,
    TracingOptions,
};

fn search_call() -> ToolCall {
    ToolCall {
        id: "call-1".to_string(),
        name: "web_search".to_string(),
        arguments: "{\"query\":\"weather in Austin\"}".to_string(),
    }
}

fn session_context() -> ToolExecutionContext {
    ToolExecutionContext::new(SessionId::parse("sess_01HZX3K9ABCDEFGHJKMNPQRSTV"), "es-ES")
        .in_round(2)
}

fn exercise_provider_hooks(hooks: &dyn ProviderOperationHooks) {
    let not_found = ProviderError::remote_status(404, "model not found");
    let unavailable = ProviderError::connectivity("connection reset");

    hooks.on_attempt_start(ProviderId::Anthropic, "claude-new", 1);
    hooks.on_candidate_fallback(ProviderId::Anthropic, "claude-new", "claude-old", &not_found);
    hooks.on_success(ProviderId::Anthropic, "claude-old", 2);
    hooks.on_failure(ProviderId::Gemini, "gemini-2.5-pro", 1, &unavailable);
}

fn exercise_tool_hooks(hooks: &dyn ToolRuntimeHooks, context: &ToolExecutionContext) {
    let call = search_call();
    let answer = ToolExecutionResult::from_call(&call, "Sunny, 31 degrees.");
    let error = ToolError::timeout("search timed out");

    hooks.on_tool_started(&call, context);
    hooks.on_tool_finished(
        &call,
        context,
        ToolOutcome::Answered(&answer),
        Duration::from_millis(20),
    );
    hooks.on_tool_finished(
        &call,
        context,
        ToolOutcome::Failed(&error),
        Duration::from_millis(20),
    );
}

#[test]
fn tracing_hooks_accept_sessions_with_and_without_ids() {
    exercise_provider_hooks(&TracingObservabilityHooks);
    exercise_tool_hooks(&TracingObservabilityHooks, &session_context());
    exercise_tool_hooks(
        &TracingObservabilityHooks,
        &ToolExecutionContext::new(None, "en-US"),
    );
}

#[test]
fn metrics_hooks_record_without_a_recorder() {
    exercise_provider_hooks(&MetricsObservabilityHooks);
    exercise_tool_hooks(&MetricsObservabilityHooks, &session_context());
}

#[derive(Default, Clone)]
struct RecordingHooks {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingHooks {
    fn push(&self, event: String) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl ProviderOperationHooks for RecordingHooks {
    fn on_attempt_start(&self, _provider: ProviderId, model: &str, _attempt: u32) {
        self.push(format!("attempt:{model}"));
    }

    fn on_candidate_fallback(
        &self,
        _provider: ProviderId,
        from_model: &str,
        to_model: &str,
        _error: &ProviderError,
    ) {
        self.push(format!("fallback:{from_model}->{to_model}"));
    }

    fn on_success(&self, _provider: ProviderId, model: &str, attempts: u32) {
        self.push(format!("success:{model}:{attempts}"));
    }

    fn on_failure(&self, _provider: ProviderId, model: &str, _attempts: u32, _error: &ProviderError) {
        self.push(format!("failure:{model}"));
    }
}

impl ToolRuntimeHooks for RecordingHooks {
    fn on_tool_started(&self, call: &ToolCall, context: &ToolExecutionContext) {
        self.push(format!(
            "start:{}:{}:{}:round{}",
            call.name,
            context.session_label(),
            context.language,
            context.round
        ));
    }

    fn on_tool_finished(
        &self,
        call: &ToolCall,
        _context: &ToolExecutionContext,
        outcome: ToolOutcome<'_>,
        _elapsed: Duration,
    ) {
        self.push(format!("{}:{}", outcome.label(), call.name));
    }
}

struct PanickingHooks;

impl ProviderOperationHooks for PanickingHooks {
    fn on_attempt_start(&self, _provider: ProviderId, _model: &str, _attempt: u32) {
        panic!("attempt_start panic");
    }

    fn on_success(&self, _provider: ProviderId, _model: &str, _attempts: u32) {
        panic!("success panic");
    }
}

impl ToolRuntimeHooks for PanickingHooks {
    fn on_tool_started(&self, _call: &ToolCall, _context: &ToolExecutionContext) {
        panic!("start panic");
    }

    fn on_tool_finished(
        &self,
        _call: &ToolCall,
        _context: &ToolExecutionContext,
        _outcome: ToolOutcome<'_>,
        _elapsed: Duration,
    ) {
        panic!("finish panic");
    }
}

#[test]
fn one_safe_wrapper_delegates_both_hook_kinds() {
    let hooks = SafeHooks::new(RecordingHooks::default());

    exercise_provider_hooks(&hooks);
    exercise_tool_hooks(&hooks, &session_context());

    assert_eq!(
        *hooks.inner().events.lock().expect("events lock"),
        vec![
            "attempt:claude-new",
            "fallback:claude-new->claude-old",
            "success:claude-old:2",
            "failure:gemini-2.5-pro",
            "start:web_search:sess_01HZX3K9ABCDEFG:es-ES:round2",
            "answered:web_search",
            "failed:web_search",
        ]
    );
}

#[test]
fn safe_hooks_swallow_panics() {
    let hooks = SafeHooks::new(PanickingHooks);
    exercise_provider_hooks(&hooks);
    exercise_tool_hooks(&hooks, &session_context());
}

#[tokio::test]
async fn safe_hooks_observe_candidate_fallback_sequence() {
    let hooks = SafeHooks::new(RecordingHooks::default());
    let candidates = vec!["claude-new".to_string(), "claude-old".to_string()];

    let outcome = execute_with_candidates(ProviderId::Anthropic, &candidates, &hooks, |model| async move {
        if model == "claude-new" {
            Err(ProviderError::remote_status(404, "missing"))
        } else {
            Ok("answer")
        }
    })
    .await
    .expect("second candidate answers");

    assert_eq!(outcome, ("claude-old".to_string(), "answer"));
    assert_eq!(
        *hooks.inner().events.lock().expect("events lock"),
        vec![
            "attempt:claude-new",
            "fallback:claude-new->claude-old",
            "attempt:claude-old",
            "success:claude-old:2",
        ]
    );
}

#[test]
fn tracing_options_default_to_info() {
    let options = TracingOptions::default();
    assert_eq!(options.default_directive, DEFAULT_LOG_DIRECTIVE);
    assert!(!options.json);
}
