use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tf", about = concat!("taskflow v", env!("CARGO_PKG_VERSION"), " - projects, tasks and a three-column board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in as a user
    Login(LoginArgs),
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List all projects
    Projects,
    /// Create, edit, extend or delete a project
    Project(ProjectCmd),
    /// Show a project's tasks in three status columns
    Board(BoardArgs),
    /// Create, inspect or change a task
    Task(TaskCmd),
    /// Add a comment to a task
    Comment(CommentArgs),
    /// Show sent notifications, or prune old ones
    Notifications(NotificationsCmd),
    /// Change settings in config.toml
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LoginArgs {
    /// Display name
    #[arg(long)]
    pub name: String,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectCmd {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project
    New(ProjectNewArgs),
    /// Change a project's name or description
    Edit(ProjectEditArgs),
    /// Change a project's start or end date
    Extend(ProjectExtendArgs),
    /// Delete a project with all its tasks and comments
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ProjectNewArgs {
    /// Project name
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Args)]
pub struct ProjectEditArgs {
    /// Project ID
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    /// New description (empty string clears it)
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ProjectExtendArgs {
    /// Project ID
    pub id: String,
    /// Start date (YYYY-MM-DD, empty string clears it)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD, empty string clears it)
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// ID to delete
    pub id: String,
    /// Skip confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args)]
pub struct BoardArgs {
    /// Project ID
    pub project: String,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task in a project
    New(TaskNewArgs),
    /// Show a task with its comments
    Show(TaskIdArg),
    /// Change a task's name or description
    Edit(TaskEditArgs),
    /// Set a task's due date
    Extend(TaskExtendArgs),
    /// Move a task to another status
    Status(TaskStatusArgs),
    /// Move a task back to To-Do
    Cancel(TaskIdArg),
    /// Delete a task with its comments
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct TaskNewArgs {
    /// Project ID
    pub project: String,
    /// Task name
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Initial status (todo, in-progress, completed)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct TaskIdArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct TaskEditArgs {
    /// Task ID
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    /// New description (empty string clears it)
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct TaskExtendArgs {
    /// Task ID
    pub id: String,
    /// New due date (YYYY-MM-DD)
    pub due: String,
}

#[derive(Args)]
pub struct TaskStatusArgs {
    /// Task ID
    pub id: String,
    /// todo, in-progress or completed
    pub status: String,
}

#[derive(Args)]
pub struct CommentArgs {
    /// Task ID
    pub task: String,
    /// Comment text
    pub text: String,
}

// ---------------------------------------------------------------------------
// Notifications and config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct NotificationsCmd {
    #[command(subcommand)]
    pub action: Option<NotificationsAction>,
    /// Show at most N entries, newest first
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(Subcommand)]
pub enum NotificationsAction {
    /// Drop entries older than N days
    Prune(PruneArgs),
}

#[derive(Args)]
pub struct PruneArgs {
    #[arg(long, default_value_t = 30)]
    pub days: u32,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set or clear the webhook notifications are posted to
    Webhook(WebhookArgs),
}

#[derive(Args)]
pub struct WebhookArgs {
    /// Webhook URL (omit with --clear)
    pub url: Option<String>,
    /// Remove the webhook
    #[arg(long)]
    pub clear: bool,
}
