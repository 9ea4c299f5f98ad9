//! Terminal front end: view models, rendering and line commands.

pub mod commands;
pub mod presentation;
pub mod terminal;

pub use commands::Command;
pub use presentation::{Locale, ViewRenderer};
pub use terminal::TerminalRenderer;
