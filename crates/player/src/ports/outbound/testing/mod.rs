//! Test utilities for outbound ports
//!
//! Hand-written doubles for outbound port traits. These are available to
//! other crates when the `testing` feature is enabled.
//!
//! ```ignore
//! use wolfpack_player::ports::outbound::testing::FakeGameApi;
//! ```

#[cfg(any(test, feature = "testing"))]
mod fake_game_api;

#[cfg(any(test, feature = "testing"))]
pub use fake_game_api::{FakeGameApi, ScriptedFetch};
