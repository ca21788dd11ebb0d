use serde::Serialize;

use crate::io::outbox::OutboxEntry;
use crate::model::{Comment, Project, Task, TaskStatus, User};
use crate::util::unicode::{display_width, pad_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardJson<'a> {
    pub project: &'a Project,
    pub columns: Vec<ColumnJson<'a>>,
}

#[derive(Serialize)]
pub struct ColumnJson<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct TaskDetailJson<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub project_name: &'a str,
    pub comments: &'a [Comment],
}

#[derive(Serialize)]
pub struct NotificationJson<'a> {
    pub timestamp: String,
    pub event: &'a str,
    pub summary: &'a str,
}

#[derive(Serialize)]
pub struct WhoamiJson<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn board_to_json<'a>(project: &'a Project, columns: &[Vec<&'a Task>; 3]) -> BoardJson<'a> {
    BoardJson {
        project,
        columns: TaskStatus::ALL
            .iter()
            .zip(columns.iter())
            .map(|(status, tasks)| ColumnJson {
                status: *status,
                tasks: tasks.clone(),
            })
            .collect(),
    }
}

pub fn notification_to_json(entry: &OutboxEntry) -> NotificationJson<'_> {
    NotificationJson {
        timestamp: entry.timestamp.to_rfc3339(),
        event: &entry.kind,
        summary: &entry.summary,
    }
}

pub fn user_to_json(user: &User) -> WhoamiJson<'_> {
    WhoamiJson {
        name: &user.name,
        email: user.email.as_deref(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn status_char(status: TaskStatus) -> char {
    match status {
        TaskStatus::Todo => ' ',
        TaskStatus::InProgress => '>',
        TaskStatus::Completed => 'x',
    }
}

/// `P-001  Website relaunch  (2025-05-01 - 2025-08-31)`
pub fn format_project_line(project: &Project) -> String {
    let mut line = format!("{}  {}", project.id, project.name);
    if let Some(range) = project.date_range() {
        line.push_str(&format!("  ({})", range));
    }
    line
}

/// `[>] T-004 Write copy  due 2025-06-30`
pub fn format_task_line(task: &Task) -> String {
    let mut line = format!("[{}] {} {}", status_char(task.status), task.id, task.name);
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", due));
    }
    line
}

/// Project header plus one section per status column
pub fn format_board(project: &Project, columns: &[Vec<&Task>; 3]) -> Vec<String> {
    let mut lines = vec![format!("== {} ({}) ==", project.name, project.id)];
    if let Some(desc) = &project.description {
        lines.push(desc.clone());
    }
    if let Some(range) = project.date_range() {
        lines.push(range);
    }
    for (status, tasks) in TaskStatus::ALL.iter().zip(columns.iter()) {
        lines.push(String::new());
        lines.push(format!("-- {} ({}) --", status, tasks.len()));
        for task in tasks {
            lines.push(format_task_line(task));
        }
    }
    lines
}

pub fn format_task_detail(task: &Task, project_name: &str, comments: &[Comment]) -> Vec<String> {
    let mut lines = vec![format!("{} {}", task.id, task.name)];
    let rows = [
        ("project", Some(project_name.to_string())),
        ("status", Some(task.status.to_string())),
        ("due", task.due_date.map(|d| d.to_string())),
    ];
    let key_w = rows.iter().map(|(k, _)| display_width(k)).max().unwrap_or(0) + 1;
    for (key, value) in rows {
        if let Some(value) = value {
            lines.push(format!("{} {}", pad_to_width(&format!("{}:", key), key_w), value));
        }
    }
    if let Some(desc) = &task.description {
        lines.push(String::new());
        for line in desc.lines() {
            lines.push(format!("  {}", line));
        }
    }

    lines.push(String::new());
    if comments.is_empty() {
        lines.push("no comments".to_string());
    } else {
        lines.push(format!("comments ({}):", comments.len()));
        for comment in comments {
            lines.push(format!(
                "  {}  {}",
                comment.timestamp.format("%Y-%m-%d %H:%M"),
                comment.text
            ));
        }
    }
    lines
}

pub fn format_notification(entry: &OutboxEntry) -> String {
    format!(
        "{}  {:<13}  {}",
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        entry.kind,
        entry.summary
    )
}
