//! Service doubles for view tests: a real store in a temp dir behind a
//! switch that can make every call fail, and a recording notifier.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tempfile::TempDir;

use crate::io::session::LocalAuth;
use crate::io::store::{LocalBackend, StoreError};
use crate::model::{
    Comment, NewProject, NewTask, Project, ProjectId, ProjectPatch, Task, TaskId, TaskPatch,
    TaskStatus, User,
};
use crate::service::{
    Backend, Client, Notification, Notifier, NotifyError, ServiceError,
};

#[derive(Default)]
pub struct Switches {
    pub fail_backend: Cell<bool>,
    pub fail_notify: Cell<bool>,
    /// Mutating backend calls attempted
    pub mutations: Cell<usize>,
    pub sent: RefCell<Vec<Notification>>,
}

fn outage() -> ServiceError {
    ServiceError::Store(StoreError::Read {
        path: "store.json".into(),
        source: std::io::Error::other("backend unavailable"),
    })
}

struct FlakyBackend {
    inner: LocalBackend,
    switches: Rc<Switches>,
}

impl FlakyBackend {
    fn check(&self) -> Result<(), ServiceError> {
        if self.switches.fail_backend.get() {
            Err(outage())
        } else {
            Ok(())
        }
    }

    fn mutation(&self) -> Result<(), ServiceError> {
        self.switches.mutations.set(self.switches.mutations.get() + 1);
        self.check()
    }
}

impl Backend for FlakyBackend {
    fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        self.check()?;
        self.inner.list_projects()
    }
    fn create_project(&self, input: NewProject) -> Result<Project, ServiceError> {
        self.mutation()?;
        self.inner.create_project(input)
    }
    fn update_project(
        &self,
        id: &ProjectId,
        patch: ProjectPatch,
    ) -> Result<Project, ServiceError> {
        self.mutation()?;
        self.inner.update_project(id, patch)
    }
    fn delete_project(&self, id: &ProjectId) -> Result<(), ServiceError> {
        self.mutation()?;
        self.inner.delete_project(id)
    }
    fn list_tasks(&self, project: &ProjectId) -> Result<Vec<Task>, ServiceError> {
        self.check()?;
        self.inner.list_tasks(project)
    }
    fn create_task(&self, input: NewTask) -> Result<Task, ServiceError> {
        self.mutation()?;
        self.inner.create_task(input)
    }
    fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Task, ServiceError> {
        self.mutation()?;
        self.inner.update_task(id, patch)
    }
    fn delete_task(&self, id: &TaskId) -> Result<(), ServiceError> {
        self.mutation()?;
        self.inner.delete_task(id)
    }
    fn list_comments(&self, task: &TaskId) -> Result<Vec<Comment>, ServiceError> {
        self.check()?;
        self.inner.list_comments(task)
    }
    fn create_comment(&self, task: &TaskId, text: &str) -> Result<Comment, ServiceError> {
        self.mutation()?;
        self.inner.create_comment(task, text)
    }
}

struct RecordingNotifier {
    switches: Rc<Switches>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        if self.switches.fail_notify.get() {
            return Err(NotifyError::Status(503));
        }
        self.switches.sent.borrow_mut().push(notification.clone());
        Ok(())
    }
}

pub struct Harness {
    pub client: Client,
    pub switches: Rc<Switches>,
    pub tmp: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let switches = Rc::new(Switches::default());
        let client = Client::new(
            Box::new(FlakyBackend {
                inner: LocalBackend::new(tmp.path()),
                switches: switches.clone(),
            }),
            Box::new(LocalAuth::new(tmp.path())),
            Box::new(RecordingNotifier {
                switches: switches.clone(),
            }),
        );
        Harness {
            client,
            switches,
            tmp,
        }
    }

    pub fn login(&self) -> User {
        self.client
            .auth
            .login(User::new("Ada", Some("ada@example.com".into())))
            .unwrap()
    }

    /// Seed a project directly through the backend (not counted as a UI action)
    pub fn project(&self, name: &str) -> Project {
        let project = self
            .client
            .backend
            .create_project(NewProject {
                name: name.to_string(),
                ..Default::default()
            })
            .unwrap();
        self.reset_counts();
        project
    }

    pub fn task(&self, project: &Project, name: &str, status: TaskStatus) -> Task {
        let task = self
            .client
            .backend
            .create_task(NewTask {
                project_id: project.id.clone(),
                name: name.to_string(),
                description: None,
                due_date: None,
                status,
            })
            .unwrap();
        self.reset_counts();
        task
    }

    pub fn reset_counts(&self) {
        self.switches.mutations.set(0);
    }

    pub fn mutations(&self) -> usize {
        self.switches.mutations.get()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.switches.sent.borrow().clone()
    }
}
