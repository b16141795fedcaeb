//! Polling of long-running server-side tasks.

use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::transport::Transport;
use log::debug;
use serde::Deserialize;
use std::io::Write;
use std::thread;
use std::time::Duration;

/// Delay between two status fetches.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

const SUCCESS: &str = "success";

/// Snapshot of a server-side task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Task {
    pub uuid: String,
    pub status: String,
    pub active: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub operation: String,
}

impl Task {
    /// Re-fetches this task and updates it in place.
    pub fn refresh<T: Transport>(&mut self, client: &ApiClient<T>) -> Result<()> {
        let raw = client.get_task(&self.uuid)?;
        let task = serde_json::from_value(raw)
            .map_err(|e| Error::Schema(format!("task {}: {}", self.uuid, e)))?;
        *self = task;
        Ok(())
    }

    /// Progress line printed while the task is running.
    pub fn progress_line(&self) -> String {
        format!("{} - {}", self.operation, self.status)
    }

    /// Final line; the message is appended only for non-success outcomes.
    pub fn terminal_line(&self) -> String {
        match &self.message {
            Some(message) if self.status != SUCCESS => {
                format!("{} - {} ({})", self.operation, self.status, message)
            }
            _ => self.progress_line(),
        }
    }
}

/// Polls a task until it is no longer active.
pub struct TaskWatcher {
    interval: Duration,
}

impl TaskWatcher {
    pub fn new(interval: Duration) -> Self {
        TaskWatcher { interval }
    }

    /// Fetches `uuid` until `active` is false, printing one line per fetch.
    ///
    /// There is no iteration limit; the loop ends only when the server
    /// reports the task inactive or a fetch fails.
    pub fn watch<T: Transport, W: Write>(
        &self,
        client: &ApiClient<T>,
        uuid: &str,
        mut out: W,
    ) -> Result<Task> {
        let mut task = Task {
            uuid: uuid.to_string(),
            status: String::new(),
            active: true,
            message: None,
            operation: String::new(),
        };

        loop {
            task.refresh(client)?;
            if !task.active {
                writeln!(out, "{}", task.terminal_line())?;
                return Ok(task);
            }

            writeln!(out, "{}", task.progress_line())?;
            out.flush()?;
            debug!("Task {} still active, waiting {:?}", task.uuid, self.interval);
            thread::sleep(self.interval);
        }
    }
}

impl Default for TaskWatcher {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: &str, message: Option<&str>) -> Task {
        Task {
            uuid: "t-1".to_string(),
            status: status.to_string(),
            active: false,
            message: message.map(str::to_string),
            operation: "power on vm".to_string(),
        }
    }

    #[test]
    fn test_terminal_line_success_omits_message() {
        assert_eq!(
            task("success", Some("done")).terminal_line(),
            "power on vm - success"
        );
    }

    #[test]
    fn test_terminal_line_error_includes_message() {
        assert_eq!(
            task("error", Some("disk full")).terminal_line(),
            "power on vm - error (disk full)"
        );
    }

    #[test]
    fn test_terminal_line_error_without_message() {
        assert_eq!(task("error", None).terminal_line(), "power on vm - error");
    }

    #[test]
    fn test_deserialize_null_message() {
        let task: Task = serde_json::from_str(
            r#"{"uuid":"t","status":"running","active":true,"message":null,"operation":"op"}"#,
        )
        .unwrap();
        assert!(task.active);
        assert_eq!(task.message, None);
    }
}
