//! Mentor conversation history.
//!
//! The [`ConversationRegistry`] is created once at startup and handed to the
//! HTTP handlers through the application state. History lives only in
//! memory and is lost on restart.

mod models;
mod registry;

pub use models::{Role, Turn};
pub use registry::ConversationRegistry;
