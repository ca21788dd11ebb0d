//! View state machines.
//!
//! Each view follows the same cycle: fetch the full list, render it, mutate
//! through one remote call, then re-fetch. Nothing here renders; the TUI and
//! the CLI both drive these types.

pub mod board;
pub mod dialog;
pub mod feedback;
pub mod listing;
pub mod project_list;
pub mod session_gate;
pub mod task_detail;

#[cfg(test)]
pub mod test_support;

pub use board::Board;
pub use dialog::{Created, Dialog, DialogKind, Field, FieldKind, FormError};
pub use feedback::{Feedback, Toast, ToastKind};
pub use listing::Listing;
pub use project_list::ProjectList;
pub use session_gate::{Session, SessionGate};
pub use task_detail::TaskDetail;

/// Result of a user action that may issue a remote mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation succeeded; the owning list must be reloaded
    Applied,
    /// The remote call failed; state is as it was before the action
    Failed,
    /// Client-side validation blocked the call
    Invalid,
    /// Nothing to do (control disabled, or value unchanged)
    Unchanged,
}

impl Outcome {
    pub fn applied(self) -> bool {
        self == Outcome::Applied
    }
}
