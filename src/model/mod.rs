pub mod comment;
pub mod config;
pub mod project;
pub mod task;
pub mod user;

pub use comment::*;
pub use config::*;
pub use project::*;
pub use task::*;
pub use user::*;
