use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::cli::handlers::Context;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::watcher::StoreWatcher;
use crate::model::{Config, Project, ProjectId, Task, TaskId, TaskStatus, User};
use crate::ops::feedback::TOAST_TTL;
use crate::ops::{
    Board, Created, Dialog, DialogKind, Feedback, Field, Outcome, ProjectList, Session, SessionGate,
    TaskDetail,
};
use crate::service::Client;

use super::input;
use super::render;
use super::theme::Theme;

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Session gate: no user yet
    Login,
    Projects,
    /// Board for `App::board`
    Board,
    /// Detail for `App::detail`, on top of the board
    Detail,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// A mutation dialog has focus
    Dialog,
    /// A delete confirmation is open
    Confirm,
    /// Typing into the detail's comment box
    Comment,
}

/// Name and email inputs on the login screen
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub fields: [Field; 2],
    pub focus: usize,
}

impl Default for LoginForm {
    fn default() -> Self {
        LoginForm {
            fields: [Field::text("Name", true, ""), Field::text("Email", false, "")],
            focus: 0,
        }
    }
}

impl LoginForm {
    pub fn focused_mut(&mut self) -> &mut Field {
        &mut self.fields[self.focus]
    }

    pub fn user(&self) -> User {
        let email = self.fields[1].value.trim();
        User::new(
            self.fields[0].value.trim(),
            (!email.is_empty()).then(|| email.to_string()),
        )
    }
}

/// Main application state
pub struct App {
    pub client: Client,
    pub data_dir: PathBuf,
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub show_help: bool,
    pub gate: SessionGate,
    pub login: LoginForm,
    pub projects: ProjectList,
    pub project_cursor: usize,
    pub board: Option<Board>,
    /// Focused status column on the board
    pub board_column: usize,
    /// Cursor within each column
    pub board_cursors: [usize; 3],
    pub detail: Option<TaskDetail>,
    pub dialog: Option<Dialog>,
    pub feedback: Feedback,
}

impl App {
    pub fn new(client: Client, data_dir: PathBuf, config: &Config) -> Self {
        App {
            client,
            data_dir,
            view: View::Login,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            show_help: false,
            gate: SessionGate::new(),
            login: LoginForm::default(),
            projects: ProjectList::new(),
            project_cursor: 0,
            board: None,
            board_column: 0,
            board_cursors: [0; 3],
            detail: None,
            dialog: None,
            feedback: Feedback::new(),
        }
    }

    /// Resolve the session, then land on the projects screen or the login form
    pub fn start(&mut self) {
        let session = self
            .gate
            .resolve(self.client.auth.as_ref(), &mut self.feedback);
        if matches!(session, Session::SignedIn(_)) {
            self.show_projects();
        } else {
            self.view = View::Login;
        }
    }

    pub fn submit_login(&mut self) {
        let user = self.login.user();
        if self
            .gate
            .login(self.client.auth.as_ref(), user, &mut self.feedback)
        {
            self.login = LoginForm::default();
            self.show_projects();
        }
    }

    pub fn logout(&mut self) {
        self.gate.logout(self.client.auth.as_ref(), &mut self.feedback);
        if self.gate.user().is_none() {
            self.board = None;
            self.detail = None;
            self.dialog = None;
            self.mode = Mode::Navigate;
            self.view = View::Login;
        }
    }

    // -- projects -------------------------------------------------------

    pub fn show_projects(&mut self) {
        self.board = None;
        self.detail = None;
        self.view = View::Projects;
        self.reload_projects();
    }

    pub fn reload_projects(&mut self) {
        self.projects.reload(&self.client, &mut self.feedback);
        self.project_cursor = clamp(self.project_cursor, self.projects.projects.len());
        if let Some(board) = &mut self.board {
            board.update_project(&self.projects.projects.items);
        }
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.projects.get(self.project_cursor)
    }

    pub fn request_project_delete(&mut self) {
        if let Some(project) = self.selected_project().cloned() {
            self.projects.request_delete(&project);
            self.mode = Mode::Confirm;
        }
    }

    // -- board ----------------------------------------------------------

    pub fn open_board(&mut self, project: Project) {
        let same = self
            .board
            .as_ref()
            .is_some_and(|b| b.project.id == project.id);
        if !same {
            self.board_column = 0;
            self.board_cursors = [0; 3];
        }
        self.detail = None;
        self.board = Some(Board::new(project));
        self.view = View::Board;
        self.reload_board();
    }

    /// Re-fetch the board, then refresh or close the open detail
    pub fn reload_board(&mut self) {
        let Some(board) = &mut self.board else {
            return;
        };
        board.reload(&self.client, &mut self.feedback);
        let columns = board.columns();
        for (cursor, column) in self.board_cursors.iter_mut().zip(columns.iter()) {
            *cursor = clamp(*cursor, column.len());
        }
        if let Some(detail) = &mut self.detail
            && !detail.sync(&board.tasks.items)
        {
            self.close_detail();
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let board = self.board.as_ref()?;
        let status = TaskStatus::ALL[self.board_column];
        board
            .column(status)
            .get(self.board_cursors[self.board_column])
            .copied()
    }

    /// Point the board cursor at a task (after it changed column)
    fn focus_task(&mut self, id: &TaskId) {
        let Some(board) = &self.board else {
            return;
        };
        let Some(task) = board.find_task(id) else {
            return;
        };
        let col = task.status.column();
        if let Some(pos) = board.column(task.status).iter().position(|t| &t.id == id) {
            self.board_column = col;
            self.board_cursors[col] = pos;
        }
    }

    // -- detail ---------------------------------------------------------

    pub fn open_detail(&mut self) {
        if let Some(task) = self.selected_task().cloned() {
            self.detail = Some(TaskDetail::open(task, &self.client, &mut self.feedback));
            self.view = View::Detail;
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.view = View::Board;
        if self.mode == Mode::Comment || self.mode == Mode::Confirm {
            self.mode = Mode::Navigate;
        }
    }

    pub fn change_status(&mut self, status: TaskStatus) {
        let Some(detail) = &mut self.detail else {
            return;
        };
        if detail.change_status(status, &self.client, &mut self.feedback) == Outcome::Applied {
            let id = detail.task.id.clone();
            self.reload_board();
            self.focus_task(&id);
        }
    }

    pub fn cancel_task(&mut self) {
        let Some(detail) = &mut self.detail else {
            return;
        };
        if detail.cancel(&self.client, &mut self.feedback) == Outcome::Applied {
            let id = detail.task.id.clone();
            self.reload_board();
            self.focus_task(&id);
        }
    }

    pub fn submit_comment(&mut self) {
        if let Some(detail) = &mut self.detail
            && detail.add_comment(&self.client, &mut self.feedback) == Outcome::Applied
        {
            self.mode = Mode::Navigate;
        }
    }

    pub fn request_task_delete(&mut self) {
        if let Some(detail) = &mut self.detail {
            detail.request_delete();
            self.mode = Mode::Confirm;
        }
    }

    // -- confirmations --------------------------------------------------

    pub fn confirm(&mut self) {
        match self.view {
            View::Projects => {
                let outcome = self.projects.confirm_delete(&self.client, &mut self.feedback);
                if outcome == Outcome::Applied {
                    self.project_cursor = clamp(self.project_cursor, self.projects.projects.len());
                    self.mode = Mode::Navigate;
                }
            }
            View::Detail => {
                let Some(detail) = &mut self.detail else {
                    self.mode = Mode::Navigate;
                    return;
                };
                if detail.confirm_delete(&self.client, &mut self.feedback) == Outcome::Applied {
                    self.close_detail();
                    self.reload_board();
                }
            }
            View::Login | View::Board => self.mode = Mode::Navigate,
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.projects.cancel_delete();
        if let Some(detail) = &mut self.detail {
            detail.cancel_delete();
        }
        self.mode = Mode::Navigate;
    }

    // -- dialogs --------------------------------------------------------

    pub fn open_dialog(&mut self, dialog: Dialog) {
        self.dialog = Some(dialog);
        self.mode = Mode::Dialog;
    }

    pub fn close_dialog(&mut self) {
        if self.dialog.as_ref().is_some_and(|d| d.submitting) {
            return;
        }
        self.dialog = None;
        self.mode = Mode::Navigate;
    }

    /// Submit the open dialog; on success close it and reload what it touched
    pub fn submit_dialog(&mut self) {
        let Some(dialog) = &mut self.dialog else {
            return;
        };
        if dialog.submit(&self.client, &mut self.feedback) != Outcome::Applied {
            return;
        }
        let kind = dialog.kind.clone();
        let created = dialog.created.take();
        self.dialog = None;
        self.mode = Mode::Navigate;

        match (kind, created) {
            (DialogKind::CreateProject, Some(Created::Project(project))) => {
                self.reload_projects();
                if let Some(pos) = self
                    .projects
                    .projects
                    .items
                    .iter()
                    .position(|p| p.id == project.id)
                {
                    self.project_cursor = pos;
                }
            }
            (DialogKind::CreateTask(_), Some(Created::Task(task))) => {
                self.reload_board();
                self.focus_task(&task.id);
            }
            (
                DialogKind::CreateProject
                | DialogKind::EditProject(_)
                | DialogKind::ExtendProject(_),
                _,
            ) => self.reload_projects(),
            _ => self.reload_board(),
        }
    }

    // -- background -----------------------------------------------------

    /// The store changed underneath us (another process wrote it)
    pub fn on_store_changed(&mut self) {
        match self.view {
            View::Login => self.start(),
            View::Projects => self.reload_projects(),
            View::Board | View::Detail => {
                self.reload_projects();
                let gone = self.board.as_ref().is_some_and(|b| {
                    self.projects.projects.loaded && self.projects.find(&b.project.id).is_none()
                });
                if gone {
                    self.show_projects();
                } else {
                    self.reload_board();
                    if let Some(detail) = &mut self.detail {
                        detail.reload_comments(&self.client, &mut self.feedback);
                    }
                }
            }
        }
    }

    pub fn tick(&mut self) {
        self.feedback.expire(TOAST_TTL);
    }
}

fn clamp(cursor: usize, len: usize) -> usize {
    if len == 0 { 0 } else { cursor.min(len - 1) }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    if app.view != View::Projects {
        return;
    }
    let Some(state) = read_ui_state(&app.data_dir) else {
        return;
    };
    app.project_cursor = clamp(state.project_cursor, app.projects.projects.len());

    if state.screen == "projects" {
        return;
    }
    let Some(project) = state
        .project
        .as_deref()
        .and_then(|id| app.projects.find(&ProjectId::from(id)))
        .cloned()
    else {
        return;
    };
    app.open_board(project);
    app.board_column = state.board_column.min(2);
    app.board_cursors[app.board_column] = state.board_cursor;
    app.reload_board();

    if state.screen == "detail"
        && let Some(id) = state.task.as_deref()
    {
        app.focus_task(&TaskId::from(id));
        if app.selected_task().is_some_and(|t| t.id.as_str() == id) {
            app.open_detail();
        }
    }
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    let screen = match app.view {
        View::Login | View::Projects => "projects",
        View::Board => "board",
        View::Detail => "detail",
    };
    let state = UiState {
        screen: screen.to_string(),
        project: app.board.as_ref().map(|b| b.project.id.to_string()),
        task: app.detail.as_ref().map(|d| d.task.id.to_string()),
        project_cursor: app.project_cursor,
        board_column: app.board_column,
        board_cursor: app.board_cursors[app.board_column],
    };
    if let Err(e) = write_ui_state(&app.data_dir, &state) {
        tracing::debug!(error = %e, "could not save UI state");
    }
}

/// Run the TUI application
pub fn run(ctx: Context, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let Context {
        client, data_dir, ..
    } = ctx;
    std::fs::create_dir_all(&data_dir)?;

    let mut app = App::new(client, data_dir, config);
    app.start();
    restore_ui_state(&mut app);

    let watcher = match StoreWatcher::start(&app.data_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "store watcher unavailable");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        app.tick();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if let Some(watcher) = watcher
            && !watcher.poll().is_empty()
            && app.mode == Mode::Navigate
        {
            tracing::debug!("store changed on disk, reloading");
            app.on_store_changed();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
