//! Storage layer.
//!
//! Prompt records live in a directory of markdown files, one file per record,
//! fronted by an in-memory cache. See [`prompt`].

pub mod prompt;
