//! Integration tests for the `tf` CLI.
//!
//! Each test gets its own data and config directories, runs `tf` as a
//! subprocess, and verifies stdout and/or the resulting store.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Get the path to the built `tf` binary.
fn tf_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tf");
    path
}

/// Isolated data + config directories for one test
struct Env {
    tmp: TempDir,
}

impl Env {
    fn new() -> Self {
        Env {
            tmp: TempDir::new().unwrap(),
        }
    }

    fn data_dir(&self) -> PathBuf {
        self.tmp.path().join("data")
    }

    fn config_home(&self) -> PathBuf {
        self.tmp.path().join("config")
    }

    /// Run `tf` with the given args, returning (stdout, stderr, success).
    fn run(&self, args: &[&str]) -> (String, String, bool) {
        let output = Command::new(tf_bin())
            .arg("-D")
            .arg(self.data_dir())
            .args(args)
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.tmp.path().join("xdg-data"))
            .env_remove("TASKFLOW_DATA_DIR")
            .env_remove("TASKFLOW_LOG")
            .output()
            .expect("failed to run tf");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        (stdout, stderr, output.status.success())
    }

    /// Run `tf` expecting success, return stdout.
    fn ok(&self, args: &[&str]) -> String {
        let (stdout, stderr, success) = self.run(args);
        if !success {
            panic!(
                "tf {:?} failed:\nstdout: {}\nstderr: {}",
                args, stdout, stderr
            );
        }
        stdout
    }

    /// Run `tf` expecting failure, return stderr.
    fn err(&self, args: &[&str]) -> String {
        let (stdout, stderr, success) = self.run(args);
        if success {
            panic!("tf {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
        }
        stderr
    }

    fn logged_in() -> Self {
        let env = Env::new();
        env.ok(&["login", "--name", "Ada", "--email", "ada@example.com"]);
        env
    }

    /// Run a create command and return the ID it printed last
    fn create(&self, args: &[&str]) -> String {
        let out = self.ok(args);
        out.lines().last().unwrap_or_default().trim().to_string()
    }
}

fn board_json(env: &Env, project: &str) -> serde_json::Value {
    let out = env.ok(&["board", project, "--json"]);
    serde_json::from_str(&out).unwrap()
}

fn column_names(board: &serde_json::Value, column: usize) -> Vec<String> {
    board["columns"][column]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

fn outbox_exists(data_dir: &Path) -> bool {
    data_dir.join("notifications.log").exists()
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[test]
fn test_login_and_whoami() {
    let env = Env::new();
    let out = env.ok(&["login", "--name", "Ada", "--email", "ada@example.com"]);
    assert!(out.contains("logged in as Ada"));

    let out = env.ok(&["whoami"]);
    assert_eq!(out.trim(), "Ada <ada@example.com>");

    let out = env.ok(&["whoami", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["name"], "Ada");
}

#[test]
fn test_commands_require_session() {
    let env = Env::new();
    let stderr = env.err(&["projects"]);
    assert!(stderr.contains("not logged in"));
    assert!(stderr.contains("tf login"));
}

#[test]
fn test_blank_login_is_rejected() {
    let env = Env::new();
    let stderr = env.err(&["login", "--name", "  "]);
    assert!(stderr.contains("Failed to log in"));
    env.err(&["whoami"]);
}

#[test]
fn test_logout_ends_session() {
    let env = Env::logged_in();
    let out = env.ok(&["logout"]);
    assert!(out.contains("logged out"));
    env.err(&["projects"]);
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[test]
fn test_project_new_and_list() {
    let env = Env::logged_in();
    assert!(env.ok(&["projects"]).contains("no projects"));

    let id = env.create(&[
        "project",
        "new",
        "Website",
        "--start",
        "2025-05-01",
        "--end",
        "2025-08-31",
    ]);
    assert_eq!(id, "P-001");

    let out = env.ok(&["projects"]);
    assert!(out.contains("P-001  Website  (2025-05-01 - 2025-08-31)"));
}

#[test]
fn test_project_blank_name_creates_nothing() {
    let env = Env::logged_in();
    let stderr = env.err(&["project", "new", ""]);
    assert!(stderr.contains("Name is required"));
    assert!(env.ok(&["projects"]).contains("no projects"));
}

#[test]
fn test_project_bad_date_creates_nothing() {
    let env = Env::logged_in();
    let stderr = env.err(&["project", "new", "Website", "--start", "next week"]);
    assert!(stderr.contains("expected a date"));
    assert!(env.ok(&["projects"]).contains("no projects"));
}

#[test]
fn test_project_edit_keeps_unspecified_fields() {
    let env = Env::logged_in();
    let id = env.create(&["project", "new", "Website", "--description", "Relaunch"]);
    env.ok(&["project", "edit", &id, "--name", "Website v2"]);

    let out = env.ok(&["projects", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed[0]["name"], "Website v2");
    assert_eq!(parsed[0]["description"], "Relaunch");
}

#[test]
fn test_project_extend_sets_end_date() {
    let env = Env::logged_in();
    let id = env.create(&["project", "new", "Website", "--start", "2025-05-01"]);
    env.ok(&["project", "extend", &id, "--end", "2025-12-31"]);
    assert!(env.ok(&["projects"]).contains("2025-05-01 - 2025-12-31"));
}

#[test]
fn test_project_delete_without_yes_is_cancelled() {
    let env = Env::logged_in();
    let id = env.create(&["project", "new", "Website"]);
    // stdin is closed, so the prompt reads no answer
    let out = env.ok(&["project", "delete", &id]);
    assert!(out.contains("cancelled"));
    assert!(env.ok(&["projects"]).contains("Website"));
}

#[test]
fn test_project_delete_cascades() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    let task = env.create(&["task", "new", &project, "Copy"]);
    env.ok(&["comment", &task, "First draft"]);

    let out = env.ok(&["project", "delete", &project, "--yes"]);
    assert!(out.contains("Project deleted successfully"));
    assert!(env.ok(&["projects"]).contains("no projects"));
    let stderr = env.err(&["task", "show", &task]);
    assert!(stderr.contains("task not found"));
}

#[test]
fn test_unknown_project_errors() {
    let env = Env::logged_in();
    let stderr = env.err(&["board", "P-404"]);
    assert!(stderr.contains("project not found: P-404"));
}

// ---------------------------------------------------------------------------
// Board and tasks
// ---------------------------------------------------------------------------

#[test]
fn test_board_groups_by_status() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    env.ok(&["task", "new", &project, "Copy"]);
    env.ok(&["task", "new", &project, "Hero", "--status", "in-progress"]);
    env.ok(&["task", "new", &project, "Domain", "--status", "done"]);

    let board = board_json(&env, &project);
    assert_eq!(column_names(&board, 0), vec!["Copy"]);
    assert_eq!(column_names(&board, 1), vec!["Hero"]);
    assert_eq!(column_names(&board, 2), vec!["Domain"]);
    assert_eq!(board["columns"][1]["status"], "In Progress");

    let out = env.ok(&["board", &project]);
    assert!(out.contains("-- To-Do (1) --"));
    assert!(out.contains("[>] T-002 Hero"));
    assert!(out.contains("[x] T-003 Domain"));
}

#[test]
fn test_task_status_moves_column() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    let task = env.create(&["task", "new", &project, "Copy"]);

    let out = env.ok(&["task", "status", &task, "in-progress"]);
    assert!(out.contains("Task updated!"));
    let board = board_json(&env, &project);
    assert!(column_names(&board, 0).is_empty());
    assert_eq!(column_names(&board, 1), vec!["Copy"]);

    let out = env.ok(&["task", "status", &task, "In Progress"]);
    assert!(out.contains("already In Progress"));
}

#[test]
fn test_task_cancel_returns_to_todo() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    let task = env.create(&["task", "new", &project, "Copy", "--status", "completed"]);

    let out = env.ok(&["task", "cancel", &task]);
    assert!(out.contains("Task cancelled (moved to To-Do)"));
    let board = board_json(&env, &project);
    assert_eq!(column_names(&board, 0), vec!["Copy"]);

    // Already To-Do: still succeeds
    let out = env.ok(&["task", "cancel", &task]);
    assert!(out.contains("Task cancelled (moved to To-Do)"));

    // Cancelling records no status notification
    let out = env.ok(&["notifications"]);
    assert!(!out.contains("task_updated"));
}

#[test]
fn test_task_unknown_status_errors() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    let task = env.create(&["task", "new", &project, "Copy"]);
    let stderr = env.err(&["task", "status", &task, "blocked"]);
    assert!(stderr.contains("unknown status 'blocked'"));
}

#[test]
fn test_task_edit_and_extend() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    let task = env.create(&["task", "new", &project, "Copy", "--description", "Landing page"]);

    env.ok(&["task", "edit", &task, "--name", "Final copy"]);
    env.ok(&["task", "extend", &task, "2025-06-30"]);

    let out = env.ok(&["task", "show", &task, "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["name"], "Final copy");
    assert_eq!(parsed["description"], "Landing page");
    assert_eq!(parsed["due_date"], "2025-06-30");
    assert_eq!(parsed["project_name"], "Website");
}

#[test]
fn test_task_extend_requires_date() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    let task = env.create(&["task", "new", &project, "Copy"]);
    let stderr = env.err(&["task", "extend", &task, ""]);
    assert!(stderr.contains("Due date is required"));
}

#[test]
fn test_task_delete() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    let task = env.create(&["task", "new", &project, "Copy"]);

    let out = env.ok(&["task", "delete", &task, "-y"]);
    assert!(out.contains("Task deleted successfully"));
    let board = board_json(&env, &project);
    assert!(column_names(&board, 0).is_empty());
}

// ---------------------------------------------------------------------------
// Comments and notifications
// ---------------------------------------------------------------------------

#[test]
fn test_comment_shows_in_detail() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    let task = env.create(&["task", "new", &project, "Copy"]);

    let out = env.ok(&["comment", &task, "Looks good"]);
    assert!(out.contains("Comment added!"));

    let out = env.ok(&["task", "show", &task]);
    assert!(out.contains("comments (1):"));
    assert!(out.contains("Looks good"));
}

#[test]
fn test_blank_comment_is_rejected() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    let task = env.create(&["task", "new", &project, "Copy"]);

    env.err(&["comment", &task, "   "]);
    assert!(env.ok(&["task", "show", &task]).contains("no comments"));
}

#[test]
fn test_notifications_are_recorded() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    let task = env.create(&["task", "new", &project, "Copy"]);
    env.ok(&["comment", &task, "Looks good"]);
    env.ok(&["task", "status", &task, "done"]);
    assert!(outbox_exists(&env.data_dir()));

    let out = env.ok(&["notifications"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    // Newest first
    assert!(lines[0].contains("task_updated"));
    assert!(lines[0].contains("\"Copy\" moved from To-Do to Completed"));
    assert!(lines[1].contains("New comment on \"Copy\": Looks good"));
    assert!(lines[2].contains("New task \"Copy\" in Website"));

    let out = env.ok(&["notifications", "--json", "--limit", "1"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["event"], "task_updated");
}

#[test]
fn test_unreachable_webhook_does_not_fail_mutations() {
    let env = Env::logged_in();
    let out = env.ok(&["config", "webhook", "http://127.0.0.1:9/hook"]);
    assert!(out.contains("webhook set to"));

    let project = env.create(&["project", "new", "Website"]);
    let task = env.create(&["task", "new", &project, "Copy"]);
    assert_eq!(task, "T-001");
    let out = env.ok(&["comment", &task, "Ping"]);
    assert!(out.contains("Comment added!"));

    // The outbox still records what the webhook missed
    assert!(env.ok(&["notifications"]).contains("New comment on \"Copy\": Ping"));

    let out = env.ok(&["config", "webhook", "--clear"]);
    assert!(out.contains("webhook cleared"));
}

#[test]
fn test_prune_with_huge_days_errors_cleanly() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    env.create(&["task", "new", &project, "Copy"]);

    let stderr = env.err(&["notifications", "prune", "--days", "200000000"]);
    assert!(stderr.contains("earliest supported date"));
    assert!(!stderr.contains("panicked"));
    assert_eq!(env.ok(&["notifications"]).lines().count(), 1);
}

#[test]
fn test_prune_rejects_negative_days() {
    let env = Env::logged_in();
    let project = env.create(&["project", "new", "Website"]);
    env.create(&["task", "new", &project, "Copy"]);

    let stderr = env.err(&["notifications", "prune", "--days=-1"]);
    assert!(!stderr.contains("panicked"));
    assert!(env.ok(&["notifications"]).contains("New task \"Copy\" in Website"));

    let out = env.ok(&["notifications", "prune", "--days", "0"]);
    assert!(out.contains("pruned"));
}
