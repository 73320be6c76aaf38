use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant};
use tracing::debug;

use super::controller::SessionController;
use super::intent::SessionIntent;
use super::view::SessionSnapshot;

/// Errors emitted by a `SessionLoop` handle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionLoopError {
    #[error("session loop has shut down")]
    Closed,
    #[error("session loop task failed: {0}")]
    Join(#[from] JoinError),
}

const TICK_PERIOD: Duration = Duration::from_secs(1);
const INTENT_BUFFER: usize = 32;

/// Runs one attempt on its own task: the serialized update loop.
///
/// User intents arrive over a channel; ticks come from a one-second interval
/// that is consulted only while a clock is live and rearmed on every phase
/// change, so no leftover timer deadline from a previous phase can decrement
/// the next phase's clock. Every mutation publishes a fresh snapshot on a
/// watch channel for the presentation layer.
pub struct SessionLoop {
    intents: mpsc::Sender<SessionIntent>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<SessionController>,
}

impl SessionLoop {
    /// Spawn the update loop for the given controller.
    #[must_use]
    pub fn spawn(controller: SessionController) -> Self {
        let (intents, intent_rx) = mpsc::channel(INTENT_BUFFER);
        let (snapshot_tx, snapshots) = watch::channel(controller.snapshot());
        let task = tokio::spawn(run(controller, intent_rx, snapshot_tx));

        Self {
            intents,
            snapshots,
            task,
        }
    }

    /// Enqueue one user intent.
    ///
    /// # Errors
    ///
    /// Returns `SessionLoopError::Closed` if the loop task is gone.
    pub async fn send(&self, intent: SessionIntent) -> Result<(), SessionLoopError> {
        self.intents
            .send(intent)
            .await
            .map_err(|_| SessionLoopError::Closed)
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver the presentation layer can watch for changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the loop and hand the controller back.
    ///
    /// # Errors
    ///
    /// Returns `SessionLoopError::Join` if the loop task panicked.
    pub async fn shutdown(self) -> Result<SessionController, SessionLoopError> {
        let Self {
            intents,
            snapshots,
            task,
        } = self;
        drop(intents);
        drop(snapshots);
        Ok(task.await?)
    }
}

async fn run(
    mut controller: SessionController,
    mut intents: mpsc::Receiver<SessionIntent>,
    snapshots: watch::Sender<SessionSnapshot>,
) -> SessionController {
    let mut ticker = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

    loop {
        tokio::select! {
            maybe_intent = intents.recv() => {
                let Some(intent) = maybe_intent else {
                    debug!("intent channel closed, stopping session loop");
                    break;
                };
                let phase_before = controller.phase();
                let snapshot = controller.apply(intent);
                if controller.phase() != phase_before {
                    // The old phase's partially elapsed second must not leak
                    // into the clock that runs next.
                    ticker.reset();
                }
                snapshots.send_replace(snapshot);
            }
            _ = ticker.tick(), if controller.has_live_clock() => {
                let phase_before = controller.phase();
                let snapshot = controller.tick();
                if controller.phase() != phase_before {
                    ticker.reset();
                }
                snapshots.send_replace(snapshot);
            }
        }
    }

    controller
}
