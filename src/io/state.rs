use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Which screen is showing ("projects", "board", "detail")
    pub screen: String,
    /// Selected project ID, if a board was open
    #[serde(default)]
    pub project: Option<String>,
    /// Selected task ID, if a detail was open
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub project_cursor: usize,
    #[serde(default)]
    pub board_column: usize,
    #[serde(default)]
    pub board_cursor: usize,
}

/// Read .state.json from the data directory
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let path = data_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = data_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
