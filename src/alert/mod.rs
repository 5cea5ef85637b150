//! Alert sinks: where fired reminders go.
//!
//! The engine hands every trigger event to a single [`AlertSink`] chosen at
//! startup; it never knows whether the message ends up on the console, in a
//! desktop notification, or spoken aloud. Sink failures are logged by the
//! caller and never abort polling.

use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Errors that can occur while delivering an alert.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The notifier program could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The notifier program ran but reported failure.
    #[error("{program} exited with {status}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
    },
}

/// Destination for reminder messages.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver one human-readable message.
    ///
    /// Must be safe to call repeatedly from the polling path; errors are
    /// reported to the caller for logging, nothing more.
    async fn notify(&self, message: &str) -> Result<(), SinkError>;
}

/// Run an external notifier command, discarding its output.
async fn run_notifier(program: &str, args: &[&str]) -> Result<(), SinkError> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|source| SinkError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(SinkError::CommandFailed {
            program: program.to_string(),
            status,
        });
    }
    Ok(())
}

/// Sink that prints reminders to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

#[async_trait]
impl AlertSink for ConsoleSink {
    async fn notify(&self, message: &str) -> Result<(), SinkError> {
        println!("Reminder: {}", message);
        Ok(())
    }
}

/// Sink that speaks reminders through the platform speech command.
///
/// Uses `say` on macOS and `spd-say` elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeechSink;

#[async_trait]
impl AlertSink for SpeechSink {
    async fn notify(&self, message: &str) -> Result<(), SinkError> {
        if cfg!(target_os = "macos") {
            run_notifier("say", &[message]).await
        } else {
            run_notifier("spd-say", &[message]).await
        }
    }
}

/// Sink that raises a native desktop notification.
///
/// Uses `osascript` on macOS and `notify-send` elsewhere.
#[derive(Debug, Clone)]
pub struct DesktopSink {
    title: String,
}

impl DesktopSink {
    /// Create a desktop sink with the given notification title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for DesktopSink {
    fn default() -> Self {
        Self::new("Medication Reminder")
    }
}

#[async_trait]
impl AlertSink for DesktopSink {
    async fn notify(&self, message: &str) -> Result<(), SinkError> {
        if cfg!(target_os = "macos") {
            let script = format!(
                "display notification \"{}\" with title \"{}\"",
                message.replace('"', "\\\""),
                self.title.replace('"', "\\\"")
            );
            run_notifier("osascript", &["-e", &script]).await
        } else {
            run_notifier("notify-send", &[&self.title, message]).await
        }
    }
}
