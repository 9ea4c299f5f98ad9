//! Shared vocabulary types.
//!
//! `Phase` and `Role` are closed enumerations. Display strings belong to the
//! presentation layer; these types only know their wire names.

mod phase;
mod role;
mod session;

pub use phase::{Activation, Phase};
pub use role::Role;
pub use session::LocalSession;
