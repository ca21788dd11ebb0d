use crate::model::{Project, ProjectId};
use crate::service::Client;

use super::Outcome;
use super::feedback::Feedback;
use super::listing::Listing;

/// The projects screen: every project plus a pending delete confirmation
#[derive(Debug, Default)]
pub struct ProjectList {
    pub projects: Listing<Project>,
    /// Project awaiting delete confirmation
    pub pending_delete: Option<Project>,
    pub deleting: bool,
}

impl ProjectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reload(&mut self, client: &Client, feedback: &mut Feedback) -> bool {
        self.projects
            .load("projects", feedback, || client.backend.list_projects())
    }

    pub fn find(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.items.iter().find(|p| &p.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Project> {
        self.projects.items.get(index)
    }

    pub fn request_delete(&mut self, project: &Project) {
        self.pending_delete = Some(project.clone());
    }

    pub fn cancel_delete(&mut self) {
        if !self.deleting {
            self.pending_delete = None;
        }
    }

    /// Delete the pending project. On failure the confirmation stays open.
    pub fn confirm_delete(&mut self, client: &Client, feedback: &mut Feedback) -> Outcome {
        if self.deleting {
            return Outcome::Unchanged;
        }
        let Some(project) = self.pending_delete.clone() else {
            return Outcome::Unchanged;
        };

        self.deleting = true;
        let result = client.backend.delete_project(&project.id);
        self.deleting = false;

        match result {
            Ok(()) => {
                self.pending_delete = None;
                feedback.success("Project deleted successfully");
                self.reload(client, feedback);
                Outcome::Applied
            }
            Err(e) => {
                feedback.failure("delete project", &e);
                Outcome::Failed
            }
        }
    }
}
