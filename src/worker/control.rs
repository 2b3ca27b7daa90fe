//! Worker lifecycle control — start, pause, resume, shutdown, checkpoints.
//!
//! Control operations mutate the run state under the worker's single state
//! lock and return immediately; the pipeline task acts on them only at its
//! checkpoints (before each asset, and once more after each item's asset
//! loop). A pause issued while a fetch is in flight therefore takes effect at
//! the next checkpoint, not preemptively, and `shutdown()` is cooperative:
//! the worker reaches `Stopped` within one checkpoint interval, not
//! immediately.

use crate::error::{Error, Result};
use crate::types::RunState;

use super::DownloadWorker;

/// What the pipeline should do after observing a checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Checkpoint {
    /// Keep going
    Continue,
    /// Unwind: shutdown was requested
    Shutdown,
}

impl DownloadWorker {
    /// Start the worker: transition to `Running` and spawn the pipeline on
    /// its own task.
    ///
    /// A worker runs its pipeline exactly once. A second `start()` on the
    /// same instance (or any of its clones) fails with
    /// [`Error::AlreadyStarted`] and does not spawn a second run.
    pub async fn start(&self) -> Result<()> {
        if self
            .lifecycle
            .started
            .swap(true, std::sync::atomic::Ordering::SeqCst)
        {
            return Err(Error::AlreadyStarted);
        }

        {
            let mut state = self.lifecycle.state.lock().await;
            *state = RunState::Running;
        }

        tracing::info!(
            collection = %self.descriptor.title,
            title_id = %self.descriptor.title_id,
            "starting download worker"
        );

        let worker = self.clone();
        let handle = tokio::spawn(async move { worker.run().await });
        *self.pipeline_task.lock().await = Some(handle);

        Ok(())
    }

    /// Request `Running → Paused`. Idempotent; a no-op in any other state.
    ///
    /// The pipeline suspends at its next checkpoint and stays suspended until
    /// [`resume`](Self::resume) or [`shutdown`](Self::shutdown).
    pub async fn pause(&self) {
        let mut state = self.lifecycle.state.lock().await;
        if *state == RunState::Running {
            *state = RunState::Paused;
            tracing::info!("pause requested");
        }
    }

    /// Request `Paused → Running` and wake a suspended pipeline. Idempotent.
    pub async fn resume(&self) {
        {
            let mut state = self.lifecycle.state.lock().await;
            if *state != RunState::Paused {
                return;
            }
            *state = RunState::Running;
        }
        tracing::info!("resume requested");
        self.lifecycle.resume.notify_one();
    }

    /// Request shutdown from any non-terminal state. Idempotent.
    ///
    /// Always clears a pause (a paused worker must not deadlock waiting for a
    /// resume that will never come). The worker reaches `Stopped` within one
    /// checkpoint interval; in-flight fetches are not aborted.
    pub async fn shutdown(&self) {
        {
            let mut state = self.lifecycle.state.lock().await;
            match *state {
                RunState::Running | RunState::Paused => {
                    *state = RunState::ShuttingDown;
                }
                RunState::ShuttingDown | RunState::Stopped => return,
            }
        }
        tracing::info!("shutdown requested");
        self.lifecycle.resume.notify_one();
    }

    /// Current run state.
    pub async fn state(&self) -> RunState {
        *self.lifecycle.state.lock().await
    }

    /// Wait for the pipeline task to terminate.
    ///
    /// Returns immediately when the worker was never started or has already
    /// been joined.
    pub async fn join(&self) {
        let handle = self.pipeline_task.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "pipeline task terminated abnormally");
            }
        }
    }

    /// Observe pause/shutdown requests.
    ///
    /// While paused, suspends until a resume or shutdown wakes the task; the
    /// state is re-read after every wake-up, so a stale wake permit merely
    /// loops once more.
    pub(crate) async fn checkpoint(&self) -> Checkpoint {
        loop {
            {
                let state = self.lifecycle.state.lock().await;
                match *state {
                    RunState::Running => return Checkpoint::Continue,
                    RunState::ShuttingDown | RunState::Stopped => return Checkpoint::Shutdown,
                    RunState::Paused => {}
                }
            }
            self.lifecycle.resume.notified().await;
        }
    }
}
