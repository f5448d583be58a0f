//! Request handlers for the chat and classifier services.

pub mod chat;
pub mod health;
pub mod predict;
