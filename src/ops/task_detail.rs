use crate::model::{Comment, Task, TaskPatch, TaskStatus};
use crate::service::{Client, Notification, ServiceError};

use super::Outcome;
use super::feedback::Feedback;
use super::listing::Listing;

/// A single task with its comment thread.
///
/// `task` is a snapshot taken from the board. After any mutation the board
/// reloads and hands the fresh list to `sync`, which replaces the snapshot.
#[derive(Debug)]
pub struct TaskDetail {
    pub task: Task,
    pub comments: Listing<Comment>,
    /// Text in the add-comment box
    pub comment_input: String,
    pub posting: bool,
    pub updating: bool,
    pub confirm_delete: bool,
    pub deleting: bool,
}

impl TaskDetail {
    /// Open on a task snapshot and fetch its comments
    pub fn open(task: Task, client: &Client, feedback: &mut Feedback) -> Self {
        let mut detail = TaskDetail {
            task,
            comments: Listing::default(),
            comment_input: String::new(),
            posting: false,
            updating: false,
            confirm_delete: false,
            deleting: false,
        };
        detail.reload_comments(client, feedback);
        detail
    }

    pub fn reload_comments(&mut self, client: &Client, feedback: &mut Feedback) -> bool {
        let id = self.task.id.clone();
        self.comments
            .load("comments", feedback, || client.backend.list_comments(&id))
    }

    /// Replace the snapshot from a freshly loaded task list. Returns false
    /// if the task no longer exists and the detail should close.
    pub fn sync(&mut self, tasks: &[Task]) -> bool {
        match tasks.iter().find(|t| t.id == self.task.id) {
            Some(task) => {
                self.task = task.clone();
                true
            }
            None => false,
        }
    }

    /// Move the task to another status. Picking the current status is a no-op.
    pub fn change_status(
        &mut self,
        status: TaskStatus,
        client: &Client,
        feedback: &mut Feedback,
    ) -> Outcome {
        if self.updating || status == self.task.status {
            return Outcome::Unchanged;
        }
        match self.set_status(status, client, true) {
            Ok(()) => {
                feedback.success("Task updated!");
                Outcome::Applied
            }
            Err(e) => {
                feedback.failure("update task", &e);
                Outcome::Failed
            }
        }
    }

    /// Put the task back to To-Do. Always issues the update, even when the
    /// task is already To-Do. Cancelling sends no notification.
    pub fn cancel(&mut self, client: &Client, feedback: &mut Feedback) -> Outcome {
        if self.updating {
            return Outcome::Unchanged;
        }
        match self.set_status(TaskStatus::Todo, client, false) {
            Ok(()) => {
                feedback.success("Task cancelled (moved to To-Do)");
                Outcome::Applied
            }
            Err(e) => {
                feedback.failure("cancel task", &e);
                Outcome::Failed
            }
        }
    }

    fn set_status(
        &mut self,
        status: TaskStatus,
        client: &Client,
        notify: bool,
    ) -> Result<(), ServiceError> {
        let old = self.task.status;
        self.updating = true;
        let result = client
            .backend
            .update_task(&self.task.id, TaskPatch::status(status));
        self.updating = false;

        let updated = result?;
        self.task = updated;
        if notify && old != status {
            client.notify_best_effort(&Notification::TaskUpdated {
                task_name: self.task.name.clone(),
                old_status: old,
                new_status: status,
            });
        }
        Ok(())
    }

    /// Post the comment box. Blank text issues no call.
    pub fn add_comment(&mut self, client: &Client, feedback: &mut Feedback) -> Outcome {
        if self.posting {
            return Outcome::Unchanged;
        }
        let text = self.comment_input.trim().to_string();
        if text.is_empty() {
            return Outcome::Invalid;
        }

        self.posting = true;
        let result = client.backend.create_comment(&self.task.id, &text);
        self.posting = false;

        match result {
            Ok(comment) => {
                client.notify_best_effort(&Notification::CommentAdded {
                    task_name: self.task.name.clone(),
                    comment: comment.text,
                });
                self.comment_input.clear();
                feedback.success("Comment added!");
                self.reload_comments(client, feedback);
                Outcome::Applied
            }
            Err(e) => {
                feedback.failure("add comment", &e);
                Outcome::Failed
            }
        }
    }

    pub fn request_delete(&mut self) {
        self.confirm_delete = true;
    }

    pub fn cancel_delete(&mut self) {
        if !self.deleting {
            self.confirm_delete = false;
        }
    }

    /// Delete the task. On `Applied` the caller closes the detail and
    /// reloads the board.
    pub fn confirm_delete(&mut self, client: &Client, feedback: &mut Feedback) -> Outcome {
        if !self.confirm_delete || self.deleting {
            return Outcome::Unchanged;
        }
        self.deleting = true;
        let result = client.backend.delete_task(&self.task.id);
        self.deleting = false;

        match result {
            Ok(()) => {
                self.confirm_delete = false;
                feedback.success("Task deleted successfully");
                Outcome::Applied
            }
            Err(e) => {
                feedback.failure("delete task", &e);
                Outcome::Failed
            }
        }
    }
}
