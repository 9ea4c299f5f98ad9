//! Wolfpack Player crate.
//!
//! Client engine for one werewolf game: ports, application services,
//! infrastructure adapters and the terminal front end.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod runner;
pub mod ui;

pub use application::session::GameSession;
pub use config::{ClientConfig, ConfigError};
pub use ui::presentation;
