//! Template rendering engine.
//!
//! Resolves placeholders in prompt content at request time.

mod template_renderer;

pub use template_renderer::{render, render_on, try_render};
