//! Model-candidate fallback execution and operational hook contracts.

use std::future::Future;

use crate::{ProviderError, ProviderId};

pub trait ProviderOperationHooks: Send + Sync {
    fn on_attempt_start(&self, _provider: ProviderId, _model: &str, _attempt: u32) {}

    /// A non-last candidate answered "model not found" and the next one will be tried.
    fn on_candidate_fallback(
        &self,
        _provider: ProviderId,
        _from_model: &str,
        _to_model: &str,
        _error: &ProviderError,
    ) {
    }

    fn on_success(&self, _provider: ProviderId, _model: &str, _attempts: u32) {}

    fn on_failure(
        &self,
        _provider: ProviderId,
        _model: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperationHooks;

impl ProviderOperationHooks for NoopOperationHooks {}

/// Tries `candidates` strictly in order.
///
/// Only a model-not-found failure on a non-last candidate advances to the next
/// candidate; any other failure ends the loop. Returns the model that answered
/// together with its output.
pub async fn execute_with_candidates<T, Op, OpFuture>(
    provider: ProviderId,
    candidates: &[String],
    hooks: &dyn ProviderOperationHooks,
    mut execute: Op,
) -> Result<(String, T), ProviderError>
where
    Op: FnMut(String) -> OpFuture,
    OpFuture: Future<Output = Result<T, ProviderError>>,
{
    if candidates.is_empty() {
        return Err(ProviderError::invalid_request(format!(
            "no model candidates for provider '{provider}'"
        )));
    }

    let mut attempt = 0;
    for (index, model) in candidates.iter().enumerate() {
        attempt += 1;
        hooks.on_attempt_start(provider, model, attempt);

        match execute(model.clone()).await {
            Ok(value) => {
                hooks.on_success(provider, model, attempt);
                return Ok((model.clone(), value));
            }
            Err(error) => {
                if error.is_model_not_found()
                    && let Some(next) = candidates.get(index + 1)
                {
                    hooks.on_candidate_fallback(provider, model, next, &error);
                    continue;
                }

                hooks.on_failure(provider, model, attempt, &error);
                return Err(error);
            }
        }
    }

    Err(ProviderError::invalid_request(format!(
        "candidate list for provider '{provider}' was exhausted"
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ProviderErrorKind;

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl RecordingHooks {
        fn events(&self) -> Vec<String> {
            self.events.lock().expect("events lock").clone()
        }

        fn push(&self, event: String) {
            self.events.lock().expect("events lock").push(event);
        }
    }

    impl ProviderOperationHooks for RecordingHooks {
        fn on_attempt_start(&self, provider: ProviderId, model: &str, attempt: u32) {
            self.push(format!("start:{provider}:{model}:{attempt}"));
        }

        fn on_candidate_fallback(
            &self,
            provider: ProviderId,
            from_model: &str,
            to_model: &str,
            _error: &ProviderError,
        ) {
            self.push(format!("fallback:{provider}:{from_model}->{to_model}"));
        }

        fn on_success(&self, provider: ProviderId, model: &str, attempts: u32) {
            self.push(format!("success:{provider}:{model}:{attempts}"));
        }

        fn on_failure(
            &self,
            provider: ProviderId,
            model: &str,
            attempts: u32,
            error: &ProviderError,
        ) {
            self.push(format!("failure:{provider}:{model}:{attempts}:{:?}", error.kind));
        }
    }

    fn candidates(models: &[&str]) -> Vec<String> {
        models.iter().map(|model| model.to_string()).collect()
    }

    #[tokio::test]
    async fn not_found_advances_to_next_candidate_in_order() {
        let hooks = RecordingHooks::default();
        let attempted = Mutex::new(Vec::new());

        let (model, value) = execute_with_candidates(
            ProviderId::Anthropic,
            &candidates(&["model-a", "model-b"]),
            &hooks,
            |model| {
                attempted.lock().expect("attempted lock").push(model.clone());
                async move {
                    if model == "model-a" {
                        Err(ProviderError::remote_status(404, "not found"))
                    } else {
                        Ok("answer")
                    }
                }
            },
        )
        .await
        .expect("second candidate should answer");

        assert_eq!(model, "model-b");
        assert_eq!(value, "answer");
        assert_eq!(
            *attempted.lock().expect("attempted lock"),
            vec!["model-a".to_string(), "model-b".to_string()]
        );
        assert_eq!(
            hooks.events(),
            vec![
                "start:anthropic:model-a:1",
                "fallback:anthropic:model-a->model-b",
                "start:anthropic:model-b:2",
                "success:anthropic:model-b:2",
            ]
        );
    }

    #[tokio::test]
    async fn other_failures_stop_without_trying_later_candidates() {
        let hooks = RecordingHooks::default();
        let attempted = Mutex::new(Vec::new());

        let error = execute_with_candidates::<(), _, _>(
            ProviderId::Anthropic,
            &candidates(&["model-a", "model-b"]),
            &hooks,
            |model| {
                attempted.lock().expect("attempted lock").push(model);
                async move { Err(ProviderError::remote_status(500, "overloaded")) }
            },
        )
        .await
        .expect_err("server error should surface");

        assert_eq!(error.status, Some(500));
        assert!(error.retryable);
        assert_eq!(attempted.lock().expect("attempted lock").len(), 1);
        assert!(
            hooks
                .events()
                .contains(&"failure:anthropic:model-a:1:RemoteStatus".to_string())
        );
    }

    #[tokio::test]
    async fn not_found_on_last_candidate_surfaces() {
        let error = execute_with_candidates::<(), _, _>(
            ProviderId::Anthropic,
            &candidates(&["model-a"]),
            &NoopOperationHooks,
            |_| async move { Err(ProviderError::remote_status(404, "not found")) },
        )
        .await
        .expect_err("last candidate failure should surface");

        assert!(error.is_model_not_found());
        assert!(!error.retryable);
    }

    #[tokio::test]
    async fn empty_candidate_list_is_invalid() {
        let error = execute_with_candidates::<(), _, _>(
            ProviderId::Gemini,
            &[],
            &NoopOperationHooks,
            |_| async move { Ok(()) },
        )
        .await
        .expect_err("no candidates");

        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    }
}
