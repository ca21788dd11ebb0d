use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::io::outbox::{self, OutboxEntry};
use crate::model::TaskStatus;

/// A secondary, best-effort alert about a task event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    TaskCreated {
        task_name: String,
        project_name: String,
    },
    CommentAdded {
        task_name: String,
        comment: String,
    },
    TaskUpdated {
        task_name: String,
        old_status: TaskStatus,
        new_status: TaskStatus,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::TaskCreated { .. } => "task_created",
            Notification::CommentAdded { .. } => "comment_added",
            Notification::TaskUpdated { .. } => "task_updated",
        }
    }

    /// One-line chat message
    pub fn summary(&self) -> String {
        match self {
            Notification::TaskCreated {
                task_name,
                project_name,
            } => format!("New task \"{}\" in {}", task_name, project_name),
            Notification::CommentAdded { task_name, comment } => {
                format!("New comment on \"{}\": {}", task_name, comment)
            }
            Notification::TaskUpdated {
                task_name,
                old_status,
                new_status,
            } => format!("\"{}\" moved from {} to {}", task_name, old_status, new_status),
        }
    }

    fn fields(&self) -> Vec<(String, String)> {
        match self {
            Notification::TaskCreated {
                task_name,
                project_name,
            } => vec![
                ("Task".into(), task_name.clone()),
                ("Project".into(), project_name.clone()),
            ],
            Notification::CommentAdded { task_name, .. } => {
                vec![("Task".into(), task_name.clone())]
            }
            Notification::TaskUpdated {
                task_name,
                old_status,
                new_status,
            } => vec![
                ("Task".into(), task_name.clone()),
                ("From".into(), old_status.to_string()),
                ("To".into(), new_status.to_string()),
            ],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("could not write outbox: {0}")]
    Outbox(#[from] std::io::Error),
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook returned status {0}")]
    Status(u16),
}

pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Appends notifications to `notifications.log` in the data directory
pub struct OutboxNotifier {
    data_dir: PathBuf,
}

impl OutboxNotifier {
    pub fn new(data_dir: &Path) -> Self {
        OutboxNotifier {
            data_dir: data_dir.to_path_buf(),
        }
    }
}

impl Notifier for OutboxNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let entry = OutboxEntry {
            timestamp: Utc::now(),
            kind: notification.kind().to_string(),
            summary: notification.summary(),
            fields: notification.fields(),
        };
        outbox::append(&self.data_dir, &entry)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: String,
    #[serde(flatten)]
    notification: &'a Notification,
}

/// Posts notifications as JSON to a chat incoming-webhook URL
pub struct WebhookNotifier {
    url: String,
    client: reqwest::blocking::Client,
}

impl WebhookNotifier {
    pub fn new(url: String, timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        WebhookNotifier { url, client }
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            text: notification.summary(),
            notification,
        };
        let response = self.client.post(&self.url).json(&payload).send()?;
        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Delivers to every inner notifier; reports the first failure after trying all
pub struct FanoutNotifier {
    inner: Vec<Box<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new(inner: Vec<Box<dyn Notifier>>) -> Self {
        FanoutNotifier { inner }
    }
}

impl Notifier for FanoutNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut first_err = None;
        for notifier in &self.inner {
            if let Err(e) = notifier.notify(notification)
                && first_err.is_none()
            {
                first_err = Some(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
