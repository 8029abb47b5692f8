//! Engine state: the named region repositories, canvas, groups and focus,
//! plus the refresh/clear/visibility/cursor/geometry operations that turn
//! that state into frames for the render dispatcher.

pub mod engine;
pub mod error;
pub mod focus;

pub use engine::Engine;
pub use error::StateError;
pub use focus::FocusRing;
