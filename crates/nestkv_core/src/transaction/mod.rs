//! Transaction frames and their undo logs.
//!
//! Mutations are applied eagerly to the live store. Each active
//! transaction level owns a [`Frame`] recording the pre-image of every key
//! it touched, so that:
//! - **Commit** appends the frame's records to the enclosing frame, or drops
//!   them when no enclosing frame exists (the work is already live)
//! - **Rollback** replays the frame's [`UndoRecord`]s newest-first
//!
//! The enclosing frame only captured pre-images for keys it touched itself,
//! so it must take over a committed child's records to be able to roll back
//! past the child's work.

mod frame;

pub use frame::{Frame, UndoRecord};
