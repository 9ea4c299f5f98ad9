//! Presentation layer - view models and the renderer seam

pub mod labels;
pub mod view_model;

pub use labels::Locale;
pub use view_model::{derive_view, GameView};

use crate::application::chat::ChatEntry;

/// Where views end up. The terminal front end is one implementation; tests
/// use a recording one.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &GameView);

    fn render_chat(&self, entry: &ChatEntry);

    /// A one-line status or error message for the user.
    fn notify(&self, message: &str);
}
