//! Scheduling driver: the repeating poll loop and its control handle.
//!
//! The driver owns one session's engine state and serializes every poll,
//! automatic or forced, through a single task. Ticks come from a tokio
//! interval; explicit "check now" requests and shutdown arrive over a
//! command channel and are handled between ticks, which gives the mutual
//! exclusion the dedup state needs without any extra locking.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::task::JoinHandle;

use super::poller::{ReminderEngine, TriggerEvent};
use crate::alert::AlertSink;
use crate::clock::Clock;
use crate::store::ScheduleStore;

/// Buffer size for the command channel between DriverHandle and the driver.
const COMMAND_CHANNEL_BUFFER: usize = 32;

/// Default warm-up delay before the first automatic poll.
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(5);

/// Default cadence between automatic polls.
pub const DEFAULT_CADENCE: Duration = Duration::from_secs(30);

/// Errors that can occur when controlling the driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The command channel to the driver task failed.
    #[error("channel error: {0}")]
    ChannelError(String),
}

/// State of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Driver loop is running.
    Running,
    /// Driver loop has stopped.
    Stopped,
}

/// Commands that can be sent to the driver.
enum DriverCommand {
    /// Force a poll right now, bypassing the dedup guard.
    CheckNow {
        response: oneshot::Sender<Option<TriggerEvent>>,
    },
    /// Stop the driver loop.
    Shutdown { response: oneshot::Sender<()> },
}

/// Handle for controlling a running driver.
#[derive(Clone)]
pub struct DriverHandle {
    command_tx: mpsc::Sender<DriverCommand>,
    state: Arc<RwLock<DriverState>>,
}

impl DriverHandle {
    /// Force a poll immediately.
    ///
    /// Always re-announces current matches, even if the same minute already
    /// fired automatically. The resulting event (if any) is also returned so
    /// the caller can display it.
    pub async fn check_now(&self) -> Result<Option<TriggerEvent>, DriverError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(DriverCommand::CheckNow {
                response: response_tx,
            })
            .await
            .map_err(|_| DriverError::ChannelError("failed to send check-now command".into()))?;

        response_rx
            .await
            .map_err(|_| DriverError::ChannelError("failed to receive check-now response".into()))
    }

    /// Stop the driver loop. Called when the owning session ends.
    pub async fn shutdown(&self) -> Result<(), DriverError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(DriverCommand::Shutdown {
                response: response_tx,
            })
            .await
            .map_err(|_| DriverError::ChannelError("failed to send shutdown command".into()))?;

        response_rx
            .await
            .map_err(|_| DriverError::ChannelError("failed to receive shutdown response".into()))
    }

    /// Get the current driver state.
    pub async fn state(&self) -> DriverState {
        *self.state.read().await
    }

    /// Check if the driver loop is running.
    pub async fn is_running(&self) -> bool {
        *self.state.read().await == DriverState::Running
    }
}

/// Per-session reminder driver.
///
/// Owns the engine state plus the store, sink, and clock collaborators for
/// one logged-in session. Nothing here is shared across sessions.
pub struct ReminderDriver {
    engine: ReminderEngine,
    store: Arc<dyn ScheduleStore>,
    sink: Arc<dyn AlertSink>,
    clock: Arc<dyn Clock>,
    warmup: Duration,
    cadence: Duration,
}

impl ReminderDriver {
    /// Create a driver with the default warm-up and cadence.
    pub fn new(
        store: Arc<dyn ScheduleStore>,
        sink: Arc<dyn AlertSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engine: ReminderEngine::new(),
            store,
            sink,
            clock,
            warmup: DEFAULT_WARMUP,
            cadence: DEFAULT_CADENCE,
        }
    }

    /// Set the warm-up delay before the first automatic poll.
    pub fn with_warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }

    /// Set the cadence between automatic polls.
    pub fn with_cadence(mut self, cadence: Duration) -> Self {
        self.cadence = cadence;
        self
    }

    /// Start the driver and return a handle for controlling it.
    pub fn start(self) -> (DriverHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_BUFFER);
        let state = Arc::new(RwLock::new(DriverState::Running));

        let handle = DriverHandle {
            command_tx,
            state: Arc::clone(&state),
        };

        let driver_task = tokio::spawn(async move {
            self.run(command_rx, state).await;
        });

        (handle, driver_task)
    }

    /// Main driver loop.
    async fn run(
        mut self,
        mut command_rx: mpsc::Receiver<DriverCommand>,
        state: Arc<RwLock<DriverState>>,
    ) {
        let first_tick = tokio::time::Instant::now() + self.warmup;
        let mut interval = tokio::time::interval_at(first_tick, self.cadence);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick(false).await;
                }

                Some(command) = command_rx.recv() => {
                    match command {
                        DriverCommand::CheckNow { response } => {
                            let event = self.tick(true).await;
                            let _ = response.send(event);
                        }
                        DriverCommand::Shutdown { response } => {
                            let mut s = state.write().await;
                            *s = DriverState::Stopped;
                            let _ = response.send(());
                            break;
                        }
                    }
                }
            }
        }

        tracing::debug!("Reminder driver stopped");
    }

    /// One poll cycle: read the schedule, compare against the clock, and
    /// dispatch any trigger event to the sink.
    ///
    /// Nothing here is fatal. A failed store read is treated as zero entries
    /// for this tick and retried on the next; sink delivery runs detached so
    /// a hung notification channel cannot stall the loop.
    async fn tick(&mut self, forced: bool) -> Option<TriggerEvent> {
        let entries = match self.store.list().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Schedule read failed, treating as empty this tick");
                Vec::new()
            }
        };

        let now = self.clock.now_minute();
        let event = if forced {
            self.engine.poll_forced(now, &entries)
        } else {
            self.engine.poll(now, &entries)
        };

        if let Some(event) = &event {
            tracing::info!(
                minute = %event.minute,
                medications = event.matched.len(),
                "Reminder fired"
            );

            let sink = Arc::clone(&self.sink);
            let message = event.message();
            tokio::spawn(async move {
                if let Err(e) = sink.notify(&message).await {
                    tracing::warn!(error = %e, "Alert delivery failed");
                }
            });
        }

        event
    }
}
