//! Editor module - Explicit editor state, edit actions and playback.
//!
//! The editor is a reducer: an [`EditorState`] revision plus an
//! [`EditAction`] gives the next revision. Nothing is global, and the encoder
//! only ever sees the frames and configuration handed to it.
//!
//! ```rust
//! use led_matrix_studio::editor::{EditAction, EditorState};
//! use led_matrix_studio::schema::{Project, Shape};
//!
//! let state = EditorState::new(Project::new("demo"));
//! let state = state
//!     .apply(EditAction::ApplyShape(Shape::Heart))
//!     .apply(EditAction::DuplicateFrame)
//!     .apply(EditAction::Invert);
//!
//! assert_eq!(state.project().frames.len(), 2);
//! ```

mod playback;
mod state;

pub use playback::Playback;
pub use state::{EditAction, EditorState};
