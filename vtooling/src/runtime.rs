//! Executes the tool calls a model asks for during an assistant turn.

use std::sync::Arc;
use std::time::Instant;

use vcommon::BoxFuture;
use vprovider::{ToolCall, ToolSpec};

use crate::{
    NoopToolRuntimeHooks, ToolError, ToolExecutionContext, ToolExecutionResult, ToolOutcome,
    ToolRegistry, ToolRuntimeHooks,
};

pub trait ToolRuntime: Send + Sync {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> BoxFuture<'a, Result<ToolExecutionResult, ToolError>>;

    /// Specs advertised to the model through `ChatRequest::tools`.
    fn tool_specs(&self) -> Vec<ToolSpec>;
}

#[derive(Clone)]
pub struct DefaultToolRuntime {
    registry: Arc<ToolRegistry>,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl DefaultToolRuntime {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Runs the calls of one round in order.
    ///
    /// A failed call becomes a `Tool error: ...` result so the model can still
    /// answer the driver; the round itself never fails.
    pub async fn execute_round(
        &self,
        calls: &[ToolCall],
        context: &ToolExecutionContext,
    ) -> Vec<ToolExecutionResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let result = match self.execute(call.clone(), context.clone()).await {
                Ok(result) => result,
                Err(error) => {
                    tracing::warn!(
                        tool = %call.name,
                        session_id = context.session_label(),
                        round = context.round,
                        error = %error,
                        "tool call failed"
                    );
                    ToolExecutionResult::from_error(call, &error)
                }
            };
            results.push(result);
        }

        results
    }
}

impl Default for DefaultToolRuntime {
    fn default() -> Self {
        Self::new(Arc::new(ToolRegistry::new()))
    }
}

impl ToolRuntime for DefaultToolRuntime {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> BoxFuture<'a, Result<ToolExecutionResult, ToolError>> {
        Box::pin(async move {
            self.hooks.on_tool_started(&tool_call, &context);
            let started = Instant::now();

            let outcome = match self.registry.get(&tool_call.name) {
                Some(tool) => tool
                    .invoke(&tool_call.arguments, &context)
                    .await
                    .map(|output| ToolExecutionResult::from_call(&tool_call, output)),
                None => Err(ToolError::not_found(format!(
                    "tool '{}' is not registered",
                    tool_call.name
                ))),
            }
            .map_err(|error| {
                error
                    .with_tool_name(tool_call.name.clone())
                    .with_tool_call_id(tool_call.id.clone())
            });

            let reported = match &outcome {
                Ok(result) => ToolOutcome::Answered(result),
                Err(error) => ToolOutcome::Failed(error),
            };
            self.hooks
                .on_tool_finished(&tool_call, &context, reported, started.elapsed());

            outcome
        })
    }

    fn tool_specs(&self) -> Vec<ToolSpec> {
        self.registry.specs()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use serde_json::json;
    use vcommon::SessionId;

    use super::*;
    use crate::{Tool, ToolErrorKind};

    /// Answers with the session and language it was called for.
    #[derive(Debug)]
    struct WhereAmITool;

    impl Tool for WhereAmITool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("where_am_i", "Session details", json!({"type": "object"}))
        }

        fn invoke<'a>(
            &'a self,
            args_json: &'a str,
            context: &'a ToolExecutionContext,
        ) -> BoxFuture<'a, Result<String, ToolError>> {
            Box::pin(async move {
                Ok(format!(
                    "session={} language={} args={}",
                    context.session_label(),
                    context.language,
                    args_json
                ))
            })
        }
    }

    #[derive(Debug)]
    struct OfflineMapTool;

    impl Tool for OfflineMapTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("map_lookup", "Always offline", json!({"type": "object"}))
        }

        fn invoke<'a>(
            &'a self,
            _args_json: &'a str,
            _context: &'a ToolExecutionContext,
        ) -> BoxFuture<'a, Result<String, ToolError>> {
            Box::pin(async move { Err(ToolError::execution("map tiles unavailable")) })
        }
    }

    #[derive(Debug, Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl ToolRuntimeHooks for RecordingHooks {
        fn on_tool_started(&self, call: &ToolCall, context: &ToolExecutionContext) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("start:{}:round{}", call.name, context.round));
        }

        fn on_tool_finished(
            &self,
            call: &ToolCall,
            _context: &ToolExecutionContext,
            outcome: ToolOutcome<'_>,
            _elapsed: Duration,
        ) {
            let detail = match outcome {
                ToolOutcome::Answered(_) => String::new(),
                ToolOutcome::Failed(error) => format!(":{:?}", error.kind),
            };
            self.events
                .lock()
                .expect("events lock")
                .push(format!("{}:{}{}", outcome.label(), call.name, detail));
        }
    }

    fn call(id: &str, name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    fn context() -> ToolExecutionContext {
        ToolExecutionContext::new(SessionId::parse("sess-1"), "de-DE")
    }

    #[tokio::test]
    async fn runtime_passes_session_context_to_the_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(WhereAmITool);
        let runtime = DefaultToolRuntime::new(Arc::new(registry));

        let result = runtime
            .execute(call("call_1", "where_am_i", "{}"), context())
            .await
            .expect("execution should succeed");

        assert_eq!(result.tool_call_id, "call_1");
        assert_eq!(result.tool_name, "where_am_i");
        assert_eq!(result.output, "session=sess-1 language=de-DE args={}");
        assert!(!result.is_error());

        let message = result.into_message();
        assert_eq!(message.tool_call_id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found_and_reported_to_hooks() {
        let hooks = Arc::new(RecordingHooks::default());
        let runtime = DefaultToolRuntime::default().with_hooks(hooks.clone());

        let error = runtime
            .execute(call("call_2", "missing", "{}"), context().in_round(3))
            .await
            .expect_err("execution should fail");

        assert_eq!(error.kind, ToolErrorKind::NotFound);
        assert_eq!(error.tool_call_id.as_deref(), Some("call_2"));
        assert_eq!(
            *hooks.events.lock().expect("events lock"),
            vec!["start:missing:round3", "failed:missing:NotFound"]
        );
    }

    #[tokio::test]
    async fn round_turns_failures_into_error_results_and_keeps_order() {
        let mut registry = ToolRegistry::new();
        registry.register(OfflineMapTool);
        registry.register(WhereAmITool);
        let hooks = Arc::new(RecordingHooks::default());
        let runtime = DefaultToolRuntime::new(Arc::new(registry)).with_hooks(hooks.clone());

        let results = runtime
            .execute_round(
                &[
                    call("call_3", "map_lookup", "{}"),
                    call("call_4", "where_am_i", "{}"),
                ],
                &context(),
            )
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].output, "Tool error: map tiles unavailable");
        assert!(results[0].is_error());
        assert_eq!(results[1].tool_call_id, "call_4");
        assert!(!results[1].is_error());
        assert_eq!(
            hooks.events.lock().expect("events lock").last().map(String::as_str),
            Some("answered:where_am_i")
        );
    }

    #[test]
    fn specs_follow_tool_names_and_replace_duplicates() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(WhereAmITool);
        registry.register(OfflineMapTool);
        registry.register(WhereAmITool);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("where_am_i"));

        let runtime = DefaultToolRuntime::new(Arc::new(registry));
        let names = runtime
            .tool_specs()
            .into_iter()
            .map(|spec| spec.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["map_lookup", "where_am_i"]);
    }
}
