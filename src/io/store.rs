use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::atomic_write;
use super::lock::{LockError, StoreLock};
use crate::model::{
    Comment, CommentId, NewProject, NewTask, Project, ProjectId, ProjectPatch, Task, TaskId,
    TaskPatch,
};
use crate::service::{Backend, ServiceError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// ID counters. Never decremented, so IDs are not reused after a delete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counters {
    #[serde(default)]
    pub project: u32,
    #[serde(default)]
    pub task: u32,
    #[serde(default)]
    pub comment: u32,
}

/// Contents of store.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub counters: Counters,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl StoreData {
    fn next_project_id(&mut self) -> ProjectId {
        self.counters.project += 1;
        ProjectId(format!("P-{:03}", self.counters.project))
    }

    fn next_task_id(&mut self) -> TaskId {
        self.counters.task += 1;
        TaskId(format!("T-{:03}", self.counters.task))
    }

    fn next_comment_id(&mut self) -> CommentId {
        self.counters.comment += 1;
        CommentId(format!("C-{:03}", self.counters.comment))
    }

    fn project_mut(&mut self, id: &ProjectId) -> Result<&mut Project, ServiceError> {
        self.projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ServiceError::ProjectNotFound(id.clone()))
    }

    fn task_mut(&mut self, id: &TaskId) -> Result<&mut Task, ServiceError> {
        self.tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| ServiceError::TaskNotFound(id.clone()))
    }
}

pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join("store.json")
}

/// Read store.json. A missing file is an empty store.
pub fn read_store(data_dir: &Path) -> Result<StoreData, StoreError> {
    let path = store_path(data_dir);
    if !path.exists() {
        return Ok(StoreData::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| StoreError::Read {
        path: path.clone(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| StoreError::Parse { path, source: e })
}

pub fn write_store(data_dir: &Path, data: &StoreData) -> Result<(), StoreError> {
    let path = store_path(data_dir);
    let json = serde_json::to_string_pretty(data)?;
    atomic_write(&path, json.as_bytes()).map_err(|e| StoreError::Write { path, source: e })
}

/// File-backed implementation of the backend contract.
///
/// Every call re-reads store.json; mutations hold the directory lock across
/// read-modify-write.
pub struct LocalBackend {
    data_dir: PathBuf,
}

impl LocalBackend {
    pub fn new(data_dir: &Path) -> Self {
        LocalBackend {
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read(&self) -> Result<StoreData, ServiceError> {
        Ok(read_store(&self.data_dir)?)
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut StoreData) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::Write {
            path: self.data_dir.clone(),
            source: e,
        })?;
        let _lock = StoreLock::acquire_default(&self.data_dir).map_err(StoreError::from)?;
        let mut data = self.read()?;
        let out = f(&mut data)?;
        write_store(&self.data_dir, &data)?;
        Ok(out)
    }
}

fn require(value: &str, field: &'static str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        Err(ServiceError::MissingField(field))
    } else {
        Ok(())
    }
}

impl Backend for LocalBackend {
    fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        Ok(self.read()?.projects)
    }

    fn create_project(&self, input: NewProject) -> Result<Project, ServiceError> {
        require(&input.name, "project name")?;
        let project = self.mutate(|data| {
            let project = Project {
                id: data.next_project_id(),
                name: input.name,
                description: input.description,
                start_date: input.start_date,
                end_date: input.end_date,
            };
            data.projects.push(project.clone());
            Ok(project)
        })?;
        tracing::info!(id = %project.id, "project created");
        Ok(project)
    }

    fn update_project(
        &self,
        id: &ProjectId,
        patch: ProjectPatch,
    ) -> Result<Project, ServiceError> {
        if let Some(name) = &patch.name {
            require(name, "project name")?;
        }
        self.mutate(|data| {
            let project = data.project_mut(id)?;
            patch.apply(project);
            Ok(project.clone())
        })
    }

    fn delete_project(&self, id: &ProjectId) -> Result<(), ServiceError> {
        self.mutate(|data| {
            let before = data.projects.len();
            data.projects.retain(|p| &p.id != id);
            if data.projects.len() == before {
                return Err(ServiceError::ProjectNotFound(id.clone()));
            }
            let doomed: Vec<TaskId> = data
                .tasks
                .iter()
                .filter(|t| &t.project_id == id)
                .map(|t| t.id.clone())
                .collect();
            data.tasks.retain(|t| &t.project_id != id);
            data.comments.retain(|c| !doomed.contains(&c.task_id));
            tracing::info!(id = %id, tasks = doomed.len(), "project deleted");
            Ok(())
        })
    }

    fn list_tasks(&self, project: &ProjectId) -> Result<Vec<Task>, ServiceError> {
        let data = self.read()?;
        if !data.projects.iter().any(|p| &p.id == project) {
            return Err(ServiceError::ProjectNotFound(project.clone()));
        }
        Ok(data
            .tasks
            .into_iter()
            .filter(|t| &t.project_id == project)
            .collect())
    }

    fn create_task(&self, input: NewTask) -> Result<Task, ServiceError> {
        require(&input.name, "task name")?;
        let task = self.mutate(|data| {
            if !data.projects.iter().any(|p| p.id == input.project_id) {
                return Err(ServiceError::ProjectNotFound(input.project_id.clone()));
            }
            let task = Task {
                id: data.next_task_id(),
                project_id: input.project_id,
                name: input.name,
                description: input.description,
                due_date: input.due_date,
                status: input.status,
            };
            data.tasks.push(task.clone());
            Ok(task)
        })?;
        tracing::info!(id = %task.id, project = %task.project_id, "task created");
        Ok(task)
    }

    fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Task, ServiceError> {
        if let Some(name) = &patch.name {
            require(name, "task name")?;
        }
        self.mutate(|data| {
            let task = data.task_mut(id)?;
            patch.apply(task);
            Ok(task.clone())
        })
    }

    fn delete_task(&self, id: &TaskId) -> Result<(), ServiceError> {
        self.mutate(|data| {
            let before = data.tasks.len();
            data.tasks.retain(|t| &t.id != id);
            if data.tasks.len() == before {
                return Err(ServiceError::TaskNotFound(id.clone()));
            }
            data.comments.retain(|c| &c.task_id != id);
            Ok(())
        })
    }

    fn list_comments(&self, task: &TaskId) -> Result<Vec<Comment>, ServiceError> {
        let data = self.read()?;
        if !data.tasks.iter().any(|t| &t.id == task) {
            return Err(ServiceError::TaskNotFound(task.clone()));
        }
        let mut comments: Vec<Comment> = data
            .comments
            .into_iter()
            .filter(|c| &c.task_id == task)
            .collect();
        comments.sort_by_key(|c| c.timestamp);
        Ok(comments)
    }

    fn create_comment(&self, task: &TaskId, text: &str) -> Result<Comment, ServiceError> {
        require(text, "comment")?;
        self.mutate(|data| {
            if !data.tasks.iter().any(|t| &t.id == task) {
                return Err(ServiceError::TaskNotFound(task.clone()));
            }
            let comment = Comment {
                id: data.next_comment_id(),
                task_id: task.clone(),
                text: text.to_string(),
                timestamp: Utc::now(),
            };
            data.comments.push(comment.clone());
            Ok(comment)
        })
    }
}
