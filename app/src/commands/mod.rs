//! Command handlers.

pub mod atlas;
pub mod catalog;
pub mod settings;
