//! Background queue that persists turns off the caller's path.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use crate::{PersistenceErrorKind, TurnRecord, TurnStore};

/// Owns one worker task that saves queued turns sequentially.
///
/// Failures are logged and dropped; nothing is retried.
#[derive(Debug)]
pub struct TurnWriter {
    sender: Option<UnboundedSender<TurnRecord>>,
    worker: Option<JoinHandle<()>>,
}

impl TurnWriter {
    /// Spawns the worker on the current tokio runtime.
    ///
    /// Outside a runtime the writer is inert and every enqueue is rejected.
    pub fn new(store: Arc<dyn TurnStore>) -> Self {
        match Handle::try_current() {
            Ok(handle) => Self::spawn_on(&handle, store),
            Err(_) => {
                tracing::error!("turn writer created outside a tokio runtime; turns will not be saved");
                Self {
                    sender: None,
                    worker: None,
                }
            }
        }
    }

    pub fn spawn_on(handle: &Handle, store: Arc<dyn TurnStore>) -> Self {
        let (sender, receiver) = unbounded_channel();
        let worker = handle.spawn(run_worker(store, receiver));

        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Queues a turn without waiting. Returns `false` if the worker is gone.
    pub fn enqueue(&self, turn: TurnRecord) -> bool {
        let Some(sender) = self.sender.as_ref() else {
            return false;
        };

        match sender.send(turn) {
            Ok(()) => true,
            Err(rejected) => {
                let turn = rejected.0;
                tracing::error!(
                    speaker = %turn.speaker,
                    session_id = turn.session_id.log_label(),
                    "turn writer stopped; dropping turn"
                );
                false
            }
        }
    }

    /// Closes the queue and waits for already-queued turns to be attempted.
    pub async fn shutdown(mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take()
            && let Err(err) = worker.await
        {
            tracing::error!(error = %err, "turn writer worker ended abnormally");
        }
    }
}

async fn run_worker(store: Arc<dyn TurnStore>, mut receiver: UnboundedReceiver<TurnRecord>) {
    while let Some(turn) = receiver.recv().await {
        let session_id = turn.session_id.log_label();

        match store.save_turn(&turn).await {
            Ok(()) => {
                tracing::debug!(speaker = %turn.speaker, session_id, "turn saved");
            }
            Err(err) if err.kind == PersistenceErrorKind::InvalidTurn => {
                tracing::warn!(speaker = %turn.speaker, session_id, error = %err, "turn rejected before save");
            }
            Err(err) => {
                tracing::error!(
                    speaker = %turn.speaker,
                    session_id,
                    status = err.status,
                    error = %err,
                    "failed to save turn"
                );
            }
        }
    }
}
