mod session;
pub use session::{cmd_login, cmd_logout, cmd_whoami};

use std::error::Error;
use std::path::PathBuf;

use chrono::{Duration, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{config_io, outbox};
use crate::model::{Project, ProjectId, Task, TaskId, TaskStatus};
use crate::ops::dialog::labels;
use crate::ops::{
    Board, Created, Dialog, Feedback, Outcome, ProjectList, SessionGate, TaskDetail, ToastKind,
};
use crate::service::{Client, ServiceError};

/// What every handler needs: the service client, where data lives, and
/// the output mode
pub struct Context {
    pub client: Client,
    pub data_dir: PathBuf,
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(command: Commands, ctx: &Context) -> Result<(), Box<dyn Error>> {
    match command {
        // Login is the only command that runs without a session
        Commands::Login(args) => cmd_login(args, ctx),
        other => {
            require_session(ctx)?;
            run(other, ctx)
        }
    }
}

fn run(command: Commands, ctx: &Context) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Login(args) => cmd_login(args, ctx),
        Commands::Logout => cmd_logout(ctx),
        Commands::Whoami => cmd_whoami(ctx),
        Commands::Projects => cmd_projects(ctx),
        Commands::Project(cmd) => match cmd.action {
            ProjectAction::New(args) => cmd_project_new(args, ctx),
            ProjectAction::Edit(args) => cmd_project_edit(args, ctx),
            ProjectAction::Extend(args) => cmd_project_extend(args, ctx),
            ProjectAction::Delete(args) => cmd_project_delete(args, ctx),
        },
        Commands::Board(args) => cmd_board(args, ctx),
        Commands::Task(cmd) => match cmd.action {
            TaskAction::New(args) => cmd_task_new(args, ctx),
            TaskAction::Show(args) => cmd_task_show(args, ctx),
            TaskAction::Edit(args) => cmd_task_edit(args, ctx),
            TaskAction::Extend(args) => cmd_task_extend(args, ctx),
            TaskAction::Status(args) => cmd_task_status(args, ctx),
            TaskAction::Cancel(args) => cmd_task_cancel(args, ctx),
            TaskAction::Delete(args) => cmd_task_delete(args, ctx),
        },
        Commands::Comment(args) => cmd_comment(args, ctx),
        Commands::Notifications(cmd) => match cmd.action {
            None => cmd_notifications_list(cmd.limit, ctx),
            Some(NotificationsAction::Prune(args)) => cmd_notifications_prune(args, ctx),
        },
        Commands::Config(cmd) => match cmd.action {
            ConfigAction::Webhook(args) => cmd_config_webhook(args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_session(ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut gate = SessionGate::new();
    let mut feedback = Feedback::new();
    gate.resolve(ctx.client.auth.as_ref(), &mut feedback);
    match gate.require_user() {
        Ok(_) => Ok(()),
        Err(e) => Err(format!("{} (run `tf login --name <NAME>`)", e).into()),
    }
}

/// Print success toasts; turn the last failure toast into the command error
fn finish(feedback: &mut Feedback, json: bool) -> Result<(), Box<dyn Error>> {
    let mut failure = None;
    for toast in feedback.drain() {
        match toast.kind {
            ToastKind::Success if !json => println!("{}", toast.message),
            ToastKind::Success => {}
            ToastKind::Error => failure = Some(toast.message),
        }
    }
    match failure {
        Some(message) => Err(message.into()),
        None => Ok(()),
    }
}

/// Submit a filled dialog the way the TUI would
fn submit(mut dialog: Dialog, ctx: &Context) -> Result<Dialog, Box<dyn Error>> {
    let mut feedback = Feedback::new();
    if dialog.submit(&ctx.client, &mut feedback) == Outcome::Invalid {
        let message = dialog.error.take().unwrap_or_else(|| "invalid input".into());
        return Err(message.into());
    }
    finish(&mut feedback, ctx.json)?;
    Ok(dialog)
}

fn print_created(dialog: &Dialog, json: bool) -> Result<(), Box<dyn Error>> {
    match (&dialog.created, json) {
        (Some(Created::Project(p)), true) => println!("{}", serde_json::to_string_pretty(p)?),
        (Some(Created::Task(t)), true) => println!("{}", serde_json::to_string_pretty(t)?),
        (Some(Created::Project(p)), false) => println!("{}", p.id),
        (Some(Created::Task(t)), false) => println!("{}", t.id),
        (None, _) => {}
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, Box<dyn Error>> {
    eprint!("{} [y/n] ", prompt);
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn load_projects(ctx: &Context) -> Result<ProjectList, Box<dyn Error>> {
    let mut list = ProjectList::new();
    let mut feedback = Feedback::new();
    list.reload(&ctx.client, &mut feedback);
    finish(&mut feedback, true)?;
    Ok(list)
}

fn find_project(id: &str, ctx: &Context) -> Result<Project, Box<dyn Error>> {
    let id = ProjectId::from(id);
    let list = load_projects(ctx)?;
    list.find(&id)
        .cloned()
        .ok_or_else(|| ServiceError::ProjectNotFound(id).into())
}

fn load_board(project: Project, ctx: &Context) -> Result<Board, Box<dyn Error>> {
    let mut board = Board::new(project);
    let mut feedback = Feedback::new();
    board.reload(&ctx.client, &mut feedback);
    finish(&mut feedback, true)?;
    Ok(board)
}

/// Locate a task and its project by walking every board
fn find_task(id: &str, ctx: &Context) -> Result<(Project, Task), Box<dyn Error>> {
    let id = TaskId::from(id);
    for project in load_projects(ctx)?.projects.items {
        let board = load_board(project, ctx)?;
        if let Some(task) = board.find_task(&id) {
            return Ok((board.project.clone(), task.clone()));
        }
    }
    Err(ServiceError::TaskNotFound(id).into())
}

fn open_detail(task: Task, ctx: &Context) -> Result<(TaskDetail, Feedback), Box<dyn Error>> {
    let mut feedback = Feedback::new();
    let detail = TaskDetail::open(task, &ctx.client, &mut feedback);
    finish(&mut feedback, true)?;
    Ok((detail, feedback))
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

fn cmd_projects(ctx: &Context) -> Result<(), Box<dyn Error>> {
    let list = load_projects(ctx)?;
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&list.projects.items)?);
    } else if list.projects.is_empty() {
        println!("no projects");
    } else {
        for project in &list.projects.items {
            println!("{}", format_project_line(project));
        }
    }
    Ok(())
}

fn cmd_project_new(args: ProjectNewArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut dialog = Dialog::create_project();
    dialog.set(labels::NAME, args.name);
    if let Some(description) = args.description {
        dialog.set(labels::DESCRIPTION, description);
    }
    if let Some(start) = args.start {
        dialog.set(labels::START, start);
    }
    if let Some(end) = args.end {
        dialog.set(labels::END, end);
    }
    let dialog = submit(dialog, ctx)?;
    print_created(&dialog, ctx.json)
}

fn cmd_project_edit(args: ProjectEditArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let project = find_project(&args.id, ctx)?;
    let mut dialog = Dialog::edit_project(&project);
    if let Some(name) = args.name {
        dialog.set(labels::NAME, name);
    }
    if let Some(description) = args.description {
        dialog.set(labels::DESCRIPTION, description);
    }
    submit(dialog, ctx)?;
    Ok(())
}

fn cmd_project_extend(args: ProjectExtendArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let project = find_project(&args.id, ctx)?;
    let mut dialog = Dialog::extend_project(&project);
    if let Some(start) = args.start {
        dialog.set(labels::START, start);
    }
    if let Some(end) = args.end {
        dialog.set(labels::END, end);
    }
    submit(dialog, ctx)?;
    Ok(())
}

fn cmd_project_delete(args: DeleteArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut list = load_projects(ctx)?;
    let id = ProjectId::from(args.id.as_str());
    let project = list
        .find(&id)
        .cloned()
        .ok_or(ServiceError::ProjectNotFound(id))?;

    if !args.yes
        && !confirm(&format!(
            "Delete project \"{}\" with all its tasks and comments?",
            project.name
        ))?
    {
        println!("cancelled");
        return Ok(());
    }

    let mut feedback = Feedback::new();
    list.request_delete(&project);
    list.confirm_delete(&ctx.client, &mut feedback);
    finish(&mut feedback, ctx.json)
}

fn cmd_board(args: BoardArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let project = find_project(&args.project, ctx)?;
    let board = load_board(project, ctx)?;
    let columns = board.columns();
    if ctx.json {
        let out = board_to_json(&board.project, &columns);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_board(&board.project, &columns) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

fn cmd_task_new(args: TaskNewArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let project = find_project(&args.project, ctx)?;
    let mut dialog = Dialog::create_task(&project);
    dialog.set(labels::NAME, args.name);
    if let Some(description) = args.description {
        dialog.set(labels::DESCRIPTION, description);
    }
    if let Some(due) = args.due {
        dialog.set(labels::DUE, due);
    }
    if let Some(status) = args.status {
        let status = TaskStatus::parse_status(&status)
            .ok_or_else(|| format!("unknown status '{}' (expected: todo, in-progress, completed)", status))?;
        dialog.set(labels::STATUS, status.label());
    }
    let dialog = submit(dialog, ctx)?;
    print_created(&dialog, ctx.json)
}

fn cmd_task_show(args: TaskIdArg, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let (project, task) = find_task(&args.id, ctx)?;
    let (detail, _) = open_detail(task, ctx)?;
    if ctx.json {
        let out = TaskDetailJson {
            task: &detail.task,
            project_name: &project.name,
            comments: &detail.comments.items,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_task_detail(&detail.task, &project.name, &detail.comments.items) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_task_edit(args: TaskEditArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let (_, task) = find_task(&args.id, ctx)?;
    let mut dialog = Dialog::modify_task(&task);
    if let Some(name) = args.name {
        dialog.set(labels::NAME, name);
    }
    if let Some(description) = args.description {
        dialog.set(labels::DESCRIPTION, description);
    }
    submit(dialog, ctx)?;
    Ok(())
}

fn cmd_task_extend(args: TaskExtendArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let (_, task) = find_task(&args.id, ctx)?;
    let mut dialog = Dialog::extend_task(&task);
    dialog.set(labels::DUE, args.due);
    submit(dialog, ctx)?;
    Ok(())
}

fn cmd_task_status(args: TaskStatusArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let status = TaskStatus::parse_status(&args.status).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: todo, in-progress, completed)",
            args.status
        )
    })?;
    let (_, task) = find_task(&args.id, ctx)?;
    let (mut detail, mut feedback) = open_detail(task, ctx)?;
    if detail.change_status(status, &ctx.client, &mut feedback) == Outcome::Unchanged {
        if !ctx.json {
            println!("{} is already {}", detail.task.id, status);
        }
        return Ok(());
    }
    finish(&mut feedback, ctx.json)
}

fn cmd_task_cancel(args: TaskIdArg, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let (_, task) = find_task(&args.id, ctx)?;
    let (mut detail, mut feedback) = open_detail(task, ctx)?;
    detail.cancel(&ctx.client, &mut feedback);
    finish(&mut feedback, ctx.json)
}

fn cmd_task_delete(args: DeleteArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let (_, task) = find_task(&args.id, ctx)?;
    if !args.yes && !confirm(&format!("Delete task \"{}\" and its comments?", task.name))? {
        println!("cancelled");
        return Ok(());
    }
    let (mut detail, mut feedback) = open_detail(task, ctx)?;
    detail.request_delete();
    detail.confirm_delete(&ctx.client, &mut feedback);
    finish(&mut feedback, ctx.json)
}

fn cmd_comment(args: CommentArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let (_, task) = find_task(&args.task, ctx)?;
    let (mut detail, mut feedback) = open_detail(task, ctx)?;
    detail.comment_input = args.text;
    if detail.add_comment(&ctx.client, &mut feedback) == Outcome::Invalid {
        return Err(ServiceError::MissingField("comment text").into());
    }
    finish(&mut feedback, ctx.json)
}

// ---------------------------------------------------------------------------
// Notifications and config
// ---------------------------------------------------------------------------

fn cmd_notifications_list(limit: usize, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let entries = outbox::read_entries(&ctx.data_dir, Some(limit));
    if ctx.json {
        let out: Vec<_> = entries.iter().map(notification_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if entries.is_empty() {
        println!("no notifications");
    } else {
        for entry in &entries {
            println!("{}", format_notification(entry));
        }
    }
    Ok(())
}

fn cmd_notifications_prune(args: PruneArgs, ctx: &Context) -> Result<(), Box<dyn Error>> {
    let cutoff = Utc::now()
        .checked_sub_signed(Duration::days(i64::from(args.days)))
        .ok_or_else(|| format!("--days {} reaches past the earliest supported date", args.days))?;
    let removed = outbox::prune_before(&ctx.data_dir, cutoff)?;
    println!("pruned {} notification(s)", removed);
    Ok(())
}

fn cmd_config_webhook(args: WebhookArgs) -> Result<(), Box<dyn Error>> {
    let url = match (args.url.as_deref(), args.clear) {
        (Some(_), true) => return Err("give a URL or --clear, not both".into()),
        (None, false) => return Err("give a URL, or --clear to remove the webhook".into()),
        (url, _) => url,
    };
    let path = config_io::config_path();
    let mut doc = config_io::read_config_doc(&path)?;
    config_io::set_webhook_url(&mut doc, url);
    config_io::write_config_doc(&path, &doc)?;
    match url {
        Some(url) => println!("webhook set to {}", url),
        None => println!("webhook cleared"),
    }
    Ok(())
}
