//! Ingestion status poller.
//!
//! Tracks one ingestion job from submission to a terminal state:
//!
//! ```text
//! Idle ──start──▶ Polling ──done──▶ Done
//!                    │    ──failed / error──▶ Failed
//!                    └──stop──▶ Idle
//! ```
//!
//! The first status check runs immediately on `start`; later checks follow at
//! a fixed interval. Checks are strictly sequential inside one spawned task,
//! and there are no retries: a transport error ends the loop like `failed`.

use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use ragdesk_core::defaults::INGEST_FAILED_MESSAGE;
use ragdesk_core::{IngestState, IngestStatus, Result};

/// Anything that can report the status of an ingestion task.
#[async_trait]
pub trait IngestStatusSource: Send + Sync {
    async fn ingest_status(&self, task_id: &str) -> Result<IngestStatus>;
}

/// Receives poller notifications.
///
/// `on_progress` fires for every status received, terminal ones included.
/// Exactly one of `on_complete` / `on_failure` fires when the loop ends on its
/// own; neither fires if the poller is stopped first.
pub trait IngestObserver: Send + Sync + 'static {
    fn on_progress(&self, status: &IngestStatus);

    fn on_complete(&self, _status: &IngestStatus) {}

    fn on_failure(&self, _message: &str) {}
}

impl<F> IngestObserver for F
where
    F: Fn(&IngestStatus) + Send + Sync + 'static,
{
    fn on_progress(&self, status: &IngestStatus) {
        self(status)
    }
}

/// Observable poller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling { task_id: String },
    Done { task_id: String },
    Failed { task_id: String, message: String },
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed { .. })
    }
}

/// Polls one ingestion task at a time.
///
/// Dropping the poller aborts any running loop.
pub struct IngestPoller {
    source: Arc<dyn IngestStatusSource>,
    interval: Duration,
    state: Arc<Mutex<PollState>>,
    task: Option<JoinHandle<()>>,
}

impl fmt::Debug for IngestPoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestPoller")
            .field("interval", &self.interval)
            .field("state", &*lock(&self.state))
            .field("running", &self.task.is_some())
            .finish_non_exhaustive()
    }
}

fn lock(state: &Mutex<PollState>) -> MutexGuard<'_, PollState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

impl IngestPoller {
    pub fn new(source: Arc<dyn IngestStatusSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            state: Arc::new(Mutex::new(PollState::Idle)),
            task: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling `task_id`, stopping any loop already running.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start<O: IngestObserver>(&mut self, task_id: impl Into<String>, observer: O) {
        self.stop().await;

        let task_id = task_id.into();
        *lock(&self.state) = PollState::Polling {
            task_id: task_id.clone(),
        };
        info!(task_id = %task_id, interval_ms = self.interval.as_millis() as u64, "Ingestion polling started");

        let source = self.source.clone();
        let state = self.state.clone();
        let interval = self.interval;
        self.task = Some(tokio::spawn(async move {
            poll_until_terminal(source, task_id, observer, interval, state).await;
        }));
    }

    /// Cancel the loop. No observer callback fires after this returns.
    ///
    /// Idempotent; a request already in flight is abandoned.
    pub async fn stop(&mut self) {
        let Some(handle) = self.task.take() else {
            return;
        };
        handle.abort();
        // Wait for the task to unwind so a callback mid-flight cannot outlive us.
        let _ = handle.await;

        let mut state = lock(&self.state);
        if let PollState::Polling { task_id } = &*state {
            debug!(task_id = %task_id, "Ingestion polling stopped");
            *state = PollState::Idle;
        }
    }

    pub fn state(&self) -> PollState {
        lock(&self.state).clone()
    }

    pub fn is_polling(&self) -> bool {
        matches!(*lock(&self.state), PollState::Polling { .. })
    }

    /// Failure message of the last job, if it failed.
    pub fn error(&self) -> Option<String> {
        match &*lock(&self.state) {
            PollState::Failed { message, .. } => Some(message.clone()),
            _ => None,
        }
    }
}

impl Drop for IngestPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}

async fn poll_until_terminal<O: IngestObserver>(
    source: Arc<dyn IngestStatusSource>,
    task_id: String,
    observer: O,
    interval: Duration,
    state: Arc<Mutex<PollState>>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // The first tick completes immediately.
        ticker.tick().await;

        let status = match source.ingest_status(&task_id).await {
            Ok(status) => status,
            Err(err) => {
                warn!(task_id = %task_id, error = %err, "Ingestion status check failed");
                let message = err.user_message();
                *lock(&state) = PollState::Failed {
                    task_id,
                    message: message.clone(),
                };
                observer.on_failure(&message);
                return;
            }
        };

        debug!(task_id = %task_id, status = %status.status, progress = status.progress, "Ingestion status");
        observer.on_progress(&status);

        match status.status {
            IngestState::Done => {
                info!(task_id = %task_id, "Ingestion completed");
                *lock(&state) = PollState::Done { task_id };
                observer.on_complete(&status);
                return;
            }
            IngestState::Failed => {
                let message = status
                    .error
                    .clone()
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| INGEST_FAILED_MESSAGE.to_string());
                warn!(task_id = %task_id, error = %message, "Ingestion failed");
                *lock(&state) = PollState::Failed {
                    task_id,
                    message: message.clone(),
                };
                observer.on_failure(&message);
                return;
            }
            IngestState::Queued | IngestState::Processing => {}
        }
    }
}
