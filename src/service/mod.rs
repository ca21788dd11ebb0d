//! The remote procedure boundary.
//!
//! Views never touch storage, identity or delivery directly; they call
//! through these traits. The backend owns identifiers, timestamps,
//! referential integrity and cascading deletes.

pub mod notify;

use std::path::Path;
use std::time::Duration;

use crate::io::session::LocalAuth;
use crate::io::store::{LocalBackend, StoreError};
use crate::model::{
    Comment, Config, NewProject, NewTask, Project, ProjectId, ProjectPatch, Task, TaskId,
    TaskPatch, User,
};

pub use notify::{
    FanoutNotifier, Notification, Notifier, NotifyError, OutboxNotifier, WebhookNotifier,
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("not logged in")]
    Unauthenticated,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Project, task and comment CRUD
pub trait Backend {
    /// All projects, oldest first
    fn list_projects(&self) -> Result<Vec<Project>, ServiceError>;
    fn create_project(&self, input: NewProject) -> Result<Project, ServiceError>;
    fn update_project(&self, id: &ProjectId, patch: ProjectPatch)
    -> Result<Project, ServiceError>;
    /// Also deletes the project's tasks and their comments
    fn delete_project(&self, id: &ProjectId) -> Result<(), ServiceError>;

    fn list_tasks(&self, project: &ProjectId) -> Result<Vec<Task>, ServiceError>;
    fn create_task(&self, input: NewTask) -> Result<Task, ServiceError>;
    fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Task, ServiceError>;
    fn delete_task(&self, id: &TaskId) -> Result<(), ServiceError>;

    /// Comments on a task, oldest first
    fn list_comments(&self, task: &TaskId) -> Result<Vec<Comment>, ServiceError>;
    fn create_comment(&self, task: &TaskId, text: &str) -> Result<Comment, ServiceError>;
}

/// Identity provider behind the session gate
pub trait Auth {
    fn current_user(&self) -> Result<Option<User>, ServiceError>;
    fn login(&self, user: User) -> Result<User, ServiceError>;
    fn logout(&self) -> Result<(), ServiceError>;
}

/// Everything a view needs to talk to the outside world
pub struct Client {
    pub backend: Box<dyn Backend>,
    pub auth: Box<dyn Auth>,
    pub notifier: Box<dyn Notifier>,
}

impl Client {
    pub fn new(
        backend: Box<dyn Backend>,
        auth: Box<dyn Auth>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Client {
            backend,
            auth,
            notifier,
        }
    }

    /// Wire up the file-backed services rooted at `data_dir`
    pub fn local(data_dir: &Path, config: &Config) -> Self {
        let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
        if config.notify.outbox {
            notifiers.push(Box::new(OutboxNotifier::new(data_dir)));
        }
        if let Some(url) = &config.notify.webhook_url {
            notifiers.push(Box::new(WebhookNotifier::new(
                url.clone(),
                Duration::from_secs(config.notify.timeout_secs),
            )));
        }
        Client {
            backend: Box::new(LocalBackend::new(data_dir)),
            auth: Box::new(LocalAuth::new(data_dir)),
            notifier: Box::new(FanoutNotifier::new(notifiers)),
        }
    }

    /// Send a secondary notification. Failure is logged and otherwise ignored;
    /// it never affects the primary mutation that preceded it.
    pub fn notify_best_effort(&self, notification: &Notification) {
        match self.notifier.notify(notification) {
            Ok(()) => tracing::debug!(event = notification.kind(), "notification sent"),
            Err(e) => tracing::warn!(
                event = notification.kind(),
                error = %e,
                "failed to send notification"
            ),
        }
    }
}
