//! Application layer: the client engine.
//!
//! - `store` / `sync`: the single authoritative snapshot and how it is refreshed
//! - `policy`: which action surfaces the local participant gets
//! - `selection`: per-activation target choices and the discussion draft
//! - `submitter`: typed action submission
//! - `notifications` / `chat`: push event routing and the chat log
//! - `auto_pass`: automatic night pass for roles without an ability
//! - `session`: a facade wiring all of the above for one game

pub mod auto_pass;
pub mod chat;
pub mod notifications;
pub mod policy;
pub mod selection;
pub mod session;
pub mod store;
pub mod submitter;
pub mod sync;
