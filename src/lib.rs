pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod service;
pub mod tui;
pub mod util;
