//! Data models for prompter.
//!
//! This module contains the core data structures shared by the store and the
//! protocol layer.

mod prompt;

pub use prompt::{PromptQuery, PromptRecord};
