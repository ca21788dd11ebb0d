use chrono::NaiveDate;

use crate::model::{NewProject, NewTask, Project, ProjectPatch, Task, TaskPatch, TaskStatus};
use crate::service::{Client, Notification, ServiceError};
use crate::util::unicode;

use super::Outcome;
use super::feedback::Feedback;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// `YYYY-MM-DD`
    Date,
    /// One of the three status labels; cycled rather than typed
    Status,
}

/// One form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    /// Byte offset of the edit cursor
    pub cursor: usize,
}

impl Field {
    fn new(label: &'static str, kind: FieldKind, required: bool, value: String) -> Self {
        let cursor = value.len();
        Field {
            label,
            kind,
            required,
            value,
            cursor,
        }
    }

    pub fn text(label: &'static str, required: bool, value: impl Into<String>) -> Self {
        Self::new(label, FieldKind::Text, required, value.into())
    }

    fn date(label: &'static str, required: bool, value: Option<NaiveDate>) -> Self {
        let value = value.map(|d| d.to_string()).unwrap_or_default();
        Self::new(label, FieldKind::Date, required, value)
    }

    fn status(label: &'static str, value: TaskStatus) -> Self {
        Self::new(label, FieldKind::Status, true, value.label().to_string())
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn insert_char(&mut self, c: char) {
        if self.kind == FieldKind::Status {
            return;
        }
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.value, self.cursor) {
            self.value.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.value, self.cursor) {
            self.value.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.value, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.value, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Step a status selector forward or back
    pub fn cycle(&mut self, forward: bool) {
        if self.kind != FieldKind::Status {
            return;
        }
        let current = TaskStatus::parse_status(&self.value).unwrap_or_default();
        let next = if forward {
            current.next()
        } else {
            current.prev()
        };
        self.set(next.label());
    }

    fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0}: expected a date like 2025-06-30")]
    BadDate(&'static str),
    #[error("unknown status: {0}")]
    BadStatus(String),
}

/// Entity returned by a create dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    Project(Project),
    Task(Task),
}

/// Which mutation a dialog performs, with the snapshot it was opened from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    CreateProject,
    EditProject(Project),
    ExtendProject(Project),
    CreateTask(Project),
    ModifyTask(Task),
    ExtendTask(Task),
}

const NAME: &str = "Name";
const DESCRIPTION: &str = "Description";
const START: &str = "Start date";
const END: &str = "End date";
const DUE: &str = "Due date";
const STATUS: &str = "Status";

/// A modal form that performs exactly one remote mutation on submit.
///
/// Forms are always built from the snapshot handed to the constructor, so
/// re-opening a dialog never shows values from a previously edited entity.
#[derive(Debug, Clone)]
pub struct Dialog {
    pub kind: DialogKind,
    pub fields: Vec<Field>,
    pub focus: usize,
    /// Submit control disabled while the call is outstanding
    pub submitting: bool,
    /// Validation message shown inline
    pub error: Option<String>,
    /// Set after a create dialog succeeds
    pub created: Option<Created>,
}

impl Dialog {
    fn build(kind: DialogKind, fields: Vec<Field>) -> Self {
        Dialog {
            kind,
            fields,
            focus: 0,
            submitting: false,
            error: None,
            created: None,
        }
    }

    pub fn create_project() -> Self {
        Self::build(
            DialogKind::CreateProject,
            vec![
                Field::text(NAME, true, ""),
                Field::text(DESCRIPTION, false, ""),
                Field::date(START, false, None),
                Field::date(END, false, None),
            ],
        )
    }

    pub fn edit_project(project: &Project) -> Self {
        Self::build(
            DialogKind::EditProject(project.clone()),
            vec![
                Field::text(NAME, true, project.name.clone()),
                Field::text(
                    DESCRIPTION,
                    false,
                    project.description.clone().unwrap_or_default(),
                ),
            ],
        )
    }

    pub fn extend_project(project: &Project) -> Self {
        Self::build(
            DialogKind::ExtendProject(project.clone()),
            vec![
                Field::date(START, false, project.start_date),
                Field::date(END, false, project.end_date),
            ],
        )
    }

    pub fn create_task(project: &Project) -> Self {
        Self::build(
            DialogKind::CreateTask(project.clone()),
            vec![
                Field::text(NAME, true, ""),
                Field::text(DESCRIPTION, false, ""),
                Field::date(DUE, false, None),
                Field::status(STATUS, TaskStatus::Todo),
            ],
        )
    }

    pub fn modify_task(task: &Task) -> Self {
        Self::build(
            DialogKind::ModifyTask(task.clone()),
            vec![
                Field::text(NAME, true, task.name.clone()),
                Field::text(
                    DESCRIPTION,
                    false,
                    task.description.clone().unwrap_or_default(),
                ),
            ],
        )
    }

    pub fn extend_task(task: &Task) -> Self {
        Self::build(
            DialogKind::ExtendTask(task.clone()),
            vec![Field::date(DUE, true, task.due_date)],
        )
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            DialogKind::CreateProject => "New Project",
            DialogKind::EditProject(_) => "Edit Project",
            DialogKind::ExtendProject(_) => "Extend Project Dates",
            DialogKind::CreateTask(_) => "New Task",
            DialogKind::ModifyTask(_) => "Modify Task",
            DialogKind::ExtendTask(_) => "Extend Due Date",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (&self.kind, self.submitting) {
            (DialogKind::CreateProject, false) => "Create Project",
            (DialogKind::CreateTask(_), false) => "Create Task",
            (DialogKind::ExtendProject(_), false) => "Save Dates",
            (DialogKind::ExtendTask(_), false) => "Extend Date",
            (DialogKind::EditProject(_) | DialogKind::ModifyTask(_), false) => "Save Changes",
            (DialogKind::CreateProject | DialogKind::CreateTask(_), true) => "Creating...",
            (DialogKind::ExtendTask(_), true) => "Extending...",
            (_, true) => "Saving...",
        }
    }

    fn success_message(&self) -> &'static str {
        match self.kind {
            DialogKind::CreateProject => "Project created successfully!",
            DialogKind::EditProject(_) => "Project updated successfully!",
            DialogKind::ExtendProject(_) => "Project dates updated successfully!",
            DialogKind::CreateTask(_) => "Task created successfully!",
            DialogKind::ModifyTask(_) => "Task updated successfully!",
            DialogKind::ExtendTask(_) => "Due date extended successfully!",
        }
    }

    fn failure_action(&self) -> &'static str {
        match self.kind {
            DialogKind::CreateProject => "create project",
            DialogKind::EditProject(_) => "update project",
            DialogKind::ExtendProject(_) => "update project dates",
            DialogKind::CreateTask(_) => "create task",
            DialogKind::ModifyTask(_) => "update task",
            DialogKind::ExtendTask(_) => "extend due date",
        }
    }

    pub fn field(&self, label: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.label == label)
    }

    pub fn field_mut(&mut self, label: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.label == label)
    }

    /// Current value of a field; empty for fields this dialog lacks
    pub fn value(&self, label: &str) -> &str {
        self.field(label).map_or("", |f| f.value.as_str())
    }

    /// Set a field by label. Returns false if the dialog has no such field.
    pub fn set(&mut self, label: &str, value: impl Into<String>) -> bool {
        match self.field_mut(label) {
            Some(field) => {
                field.set(value);
                true
            }
            None => false,
        }
    }

    pub fn focused_mut(&mut self) -> &mut Field {
        let idx = self.focus.min(self.fields.len().saturating_sub(1));
        &mut self.fields[idx]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Client-side checks: required fields present, dates well-formed
    pub fn validate(&self) -> Result<(), FormError> {
        for field in &self.fields {
            if field.required && field.is_blank() {
                return Err(FormError::Required(field.label));
            }
            match field.kind {
                FieldKind::Date => {
                    parse_date(field)?;
                }
                FieldKind::Status => {
                    parse_status(field)?;
                }
                FieldKind::Text => {}
            }
        }
        Ok(())
    }

    /// Validate, then issue the mutation.
    ///
    /// On `Applied` the caller closes the dialog and reloads its list. On
    /// `Failed` or `Invalid` the dialog stays open with its input untouched.
    pub fn submit(&mut self, client: &Client, feedback: &mut Feedback) -> Outcome {
        if self.submitting {
            return Outcome::Unchanged;
        }
        if let Err(e) = self.validate() {
            self.error = Some(e.to_string());
            return Outcome::Invalid;
        }
        self.error = None;

        self.submitting = true;
        let result = self.perform(client);
        self.submitting = false;

        match result {
            Ok(created) => {
                self.created = created;
                feedback.success(self.success_message());
                Outcome::Applied
            }
            Err(e) => {
                feedback.failure(self.failure_action(), &e);
                Outcome::Failed
            }
        }
    }

    fn perform(&self, client: &Client) -> Result<Option<Created>, ServiceError> {
        let backend = client.backend.as_ref();
        match &self.kind {
            DialogKind::CreateProject => {
                let project = backend.create_project(NewProject {
                    name: self.trimmed(NAME),
                    description: self.optional(DESCRIPTION),
                    start_date: self.date(START),
                    end_date: self.date(END),
                })?;
                return Ok(Some(Created::Project(project)));
            }
            DialogKind::EditProject(project) => {
                backend.update_project(
                    &project.id,
                    ProjectPatch {
                        name: Some(self.trimmed(NAME)),
                        description: Some(self.optional(DESCRIPTION)),
                        ..Default::default()
                    },
                )?;
            }
            DialogKind::ExtendProject(project) => {
                backend.update_project(
                    &project.id,
                    ProjectPatch {
                        start_date: Some(self.date(START)),
                        end_date: Some(self.date(END)),
                        ..Default::default()
                    },
                )?;
            }
            DialogKind::CreateTask(project) => {
                let task = backend.create_task(NewTask {
                    project_id: project.id.clone(),
                    name: self.trimmed(NAME),
                    description: self.optional(DESCRIPTION),
                    due_date: self.date(DUE),
                    status: self
                        .field(STATUS)
                        .and_then(|f| TaskStatus::parse_status(&f.value))
                        .unwrap_or_default(),
                })?;
                client.notify_best_effort(&Notification::TaskCreated {
                    task_name: task.name.clone(),
                    project_name: project.name.clone(),
                });
                return Ok(Some(Created::Task(task)));
            }
            DialogKind::ModifyTask(task) => {
                backend.update_task(
                    &task.id,
                    TaskPatch {
                        name: Some(self.trimmed(NAME)),
                        description: Some(self.optional(DESCRIPTION)),
                        ..Default::default()
                    },
                )?;
            }
            DialogKind::ExtendTask(task) => {
                backend.update_task(
                    &task.id,
                    TaskPatch {
                        due_date: Some(self.date(DUE)),
                        ..Default::default()
                    },
                )?;
            }
        }
        Ok(None)
    }

    fn trimmed(&self, label: &str) -> String {
        self.value(label).trim().to_string()
    }

    fn optional(&self, label: &str) -> Option<String> {
        let value = self.value(label).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Only called after `validate` succeeded
    fn date(&self, label: &str) -> Option<NaiveDate> {
        self.field(label).and_then(|f| parse_date(f).ok().flatten())
    }
}

fn parse_date(field: &Field) -> Result<Option<NaiveDate>, FormError> {
    let value = field.value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FormError::BadDate(field.label))
}

fn parse_status(field: &Field) -> Result<TaskStatus, FormError> {
    TaskStatus::parse_status(&field.value).ok_or_else(|| FormError::BadStatus(field.value.clone()))
}

/// Field labels, for callers that fill dialogs programmatically
pub mod labels {
    pub const NAME: &str = super::NAME;
    pub const DESCRIPTION: &str = super::DESCRIPTION;
    pub const START: &str = super::START;
    pub const END: &str = super::END;
    pub const DUE: &str = super::DUE;
    pub const STATUS: &str = super::STATUS;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::Harness;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_project_then_reload_shows_name() {
        let h = Harness::new();
        let mut feedback = Feedback::new();
        let mut dialog = Dialog::create_project();
        dialog.set(NAME, "Website relaunch");
        dialog.set(START, "2025-05-01");

        assert_eq!(dialog.submit(&h.client, &mut feedback), Outcome::Applied);
        assert_eq!(
            feedback.latest().unwrap().message,
            "Project created successfully!"
        );
        assert!(matches!(&dialog.created, Some(Created::Project(p)) if p.name == "Website relaunch"));

        let projects = h.client.backend.list_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Website relaunch");
        assert_eq!(projects[0].start_date, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert!(projects[0].description.is_none());
    }

    #[test]
    fn blank_required_field_issues_no_call() {
        let h = Harness::new();
        let project = h.project("Web");
        let task = h.task(&project, "Copy", TaskStatus::Todo);
        let mut feedback = Feedback::new();

        let mut dialogs = vec![
            Dialog::create_project(),
            Dialog::edit_project(&project),
            Dialog::create_task(&project),
            Dialog::modify_task(&task),
            Dialog::extend_task(&task),
        ];
        for dialog in &mut dialogs {
            for field in dialog.fields.iter_mut().filter(|f| f.required) {
                if field.kind != FieldKind::Status {
                    field.set("   ");
                }
            }
            assert_eq!(dialog.submit(&h.client, &mut feedback), Outcome::Invalid);
            assert!(dialog.error.as_deref().unwrap().ends_with("is required"));
        }
        assert_eq!(h.mutations(), 0);
        assert!(feedback.latest().is_none());
    }

    #[test]
    fn malformed_date_blocks_submission() {
        let h = Harness::new();
        let mut feedback = Feedback::new();
        let mut dialog = Dialog::create_project();
        dialog.set(NAME, "Web");
        dialog.set(END, "30/06/2025");
        assert_eq!(dialog.submit(&h.client, &mut feedback), Outcome::Invalid);
        assert_eq!(
            dialog.error.as_deref(),
            Some("End date: expected a date like 2025-06-30")
        );
        assert_eq!(h.mutations(), 0);
    }

    #[test]
    fn failure_keeps_form_and_reports() {
        let h = Harness::new();
        let mut feedback = Feedback::new();
        h.switches.fail_backend.set(true);

        let mut dialog = Dialog::create_project();
        dialog.set(NAME, "Web");
        dialog.set(DESCRIPTION, "Relaunch");
        assert_eq!(dialog.submit(&h.client, &mut feedback), Outcome::Failed);

        assert_eq!(
            feedback.latest().unwrap().message,
            "Failed to create project"
        );
        assert_eq!(dialog.value(NAME), "Web");
        assert_eq!(dialog.value(DESCRIPTION), "Relaunch");
        assert!(!dialog.submitting);
        assert_eq!(h.mutations(), 1);
    }

    #[test]
    fn submitting_dialog_ignores_second_submit() {
        let h = Harness::new();
        let mut feedback = Feedback::new();
        let mut dialog = Dialog::create_project();
        dialog.set(NAME, "Web");
        dialog.submitting = true;
        assert_eq!(dialog.submit(&h.client, &mut feedback), Outcome::Unchanged);
        assert_eq!(h.mutations(), 0);
    }

    #[test]
    fn edit_dialogs_prepopulate_from_their_own_snapshot() {
        let h = Harness::new();
        let mut a = h.project("Alpha");
        a.description = Some("first".into());
        a.start_date = NaiveDate::from_ymd_opt(2025, 1, 1);
        let b = h.project("Beta");

        let edit_a = Dialog::edit_project(&a);
        assert_eq!(edit_a.value(NAME), "Alpha");
        assert_eq!(edit_a.value(DESCRIPTION), "first");

        let edit_b = Dialog::edit_project(&b);
        assert_eq!(edit_b.value(NAME), "Beta");
        assert_eq!(edit_b.value(DESCRIPTION), "");

        let extend_a = Dialog::extend_project(&a);
        assert_eq!(extend_a.value(START), "2025-01-01");
        assert_eq!(extend_a.value(END), "");
        let extend_b = Dialog::extend_project(&b);
        assert_eq!(extend_b.value(START), "");
    }

    #[test]
    fn edit_project_updates_name_and_clears_description() {
        let h = Harness::new();
        let mut feedback = Feedback::new();
        let mut dialog = Dialog::create_project();
        dialog.set(NAME, "Web");
        dialog.set(DESCRIPTION, "old");
        dialog.submit(&h.client, &mut feedback);
        let project = h.client.backend.list_projects().unwrap().remove(0);

        let mut edit = Dialog::edit_project(&project);
        edit.set(NAME, "  Web v2 ");
        edit.set(DESCRIPTION, "");
        assert_eq!(edit.submit(&h.client, &mut feedback), Outcome::Applied);

        let project = h.client.backend.list_projects().unwrap().remove(0);
        assert_eq!(project.name, "Web v2");
        assert!(project.description.is_none());
    }

    #[test]
    fn extend_project_sets_both_dates() {
        let h = Harness::new();
        let mut feedback = Feedback::new();
        let project = h.project("Web");
        let mut dialog = Dialog::extend_project(&project);
        dialog.set(START, "2025-05-01");
        dialog.set(END, "2025-08-31");
        assert_eq!(dialog.submit(&h.client, &mut feedback), Outcome::Applied);
        assert_eq!(
            feedback.latest().unwrap().message,
            "Project dates updated successfully!"
        );

        let project = h.client.backend.list_projects().unwrap().remove(0);
        assert_eq!(project.name, "Web");
        assert_eq!(project.end_date, NaiveDate::from_ymd_opt(2025, 8, 31));
    }

    #[test]
    fn create_task_notifies_with_project_name() {
        let h = Harness::new();
        let mut feedback = Feedback::new();
        let project = h.project("Web");
        let mut dialog = Dialog::create_task(&project);
        dialog.set(NAME, "Write copy");
        dialog.focus = 3;
        dialog.focused_mut().cycle(true);
        assert_eq!(dialog.value(STATUS), "In Progress");

        assert_eq!(dialog.submit(&h.client, &mut feedback), Outcome::Applied);
        let tasks = h.client.backend.list_tasks(&project.id).unwrap();
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        assert_eq!(
            h.sent(),
            vec![Notification::TaskCreated {
                task_name: "Write copy".into(),
                project_name: "Web".into(),
            }]
        );
    }

    #[test]
    fn notification_failure_does_not_affect_create() {
        let h = Harness::new();
        let mut feedback = Feedback::new();
        let project = h.project("Web");
        h.switches.fail_notify.set(true);

        let mut dialog = Dialog::create_task(&project);
        dialog.set(NAME, "Write copy");
        assert_eq!(dialog.submit(&h.client, &mut feedback), Outcome::Applied);
        assert_eq!(
            feedback.latest().unwrap().message,
            "Task created successfully!"
        );
        assert!(!feedback.has_errors());
        assert_eq!(h.client.backend.list_tasks(&project.id).unwrap().len(), 1);
    }

    #[test]
    fn extend_task_requires_date() {
        let h = Harness::new();
        let mut feedback = Feedback::new();
        let project = h.project("Web");
        let task = h.task(&project, "Copy", TaskStatus::Todo);

        let mut dialog = Dialog::extend_task(&task);
        assert_eq!(dialog.submit(&h.client, &mut feedback), Outcome::Invalid);
        assert_eq!(dialog.error.as_deref(), Some("Due date is required"));

        dialog.set(DUE, "2025-09-15");
        assert_eq!(dialog.submit(&h.client, &mut feedback), Outcome::Applied);
        let task = h.client.backend.list_tasks(&project.id).unwrap().remove(0);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 9, 15));
    }

    #[test]
    fn modify_task_keeps_status() {
        let h = Harness::new();
        let mut feedback = Feedback::new();
        let project = h.project("Web");
        let task = h.task(&project, "Copy", TaskStatus::Completed);

        let mut dialog = Dialog::modify_task(&task);
        dialog.set(NAME, "Final copy");
        dialog.set(DESCRIPTION, "Landing page");
        assert_eq!(dialog.submit(&h.client, &mut feedback), Outcome::Applied);

        let task = h.client.backend.list_tasks(&project.id).unwrap().remove(0);
        assert_eq!(task.name, "Final copy");
        assert_eq!(task.description.as_deref(), Some("Landing page"));
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn field_editing_respects_graphemes() {
        let mut field = Field::text("Name", true, "cafe\u{301}");
        field.backspace();
        assert_eq!(field.value, "caf");
        field.move_left();
        field.insert_char('X');
        assert_eq!(field.value, "caXf");
        field.home();
        field.delete();
        assert_eq!(field.value, "aXf");
        field.end();
        assert_eq!(field.cursor, field.value.len());
    }

    #[test]
    fn status_field_ignores_typing() {
        let mut field = Field::status("Status", TaskStatus::Completed);
        field.insert_char('x');
        assert_eq!(field.value, "Completed");
        field.cycle(true);
        assert_eq!(field.value, "To-Do");
        field.cycle(false);
        assert_eq!(field.value, "Completed");
    }

    #[test]
    fn focus_wraps() {
        let mut dialog = Dialog::create_project();
        dialog.focus_prev();
        assert_eq!(dialog.focus, 3);
        dialog.focus_next();
        assert_eq!(dialog.focus, 0);
    }
}
