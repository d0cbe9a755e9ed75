//! Template renderer implementation.
//!
//! Supports two kinds of actions inside `{{ ... }}`:
//! - Argument references: `{{ .name }}`
//! - The `date` builtin: `{{ date }}` renders the current local date as
//!   `YYYY-MM-DD`
//!
//! Anything else is a render error. [`render`] swallows errors and hands back
//! the original content, so a broken template is served as plain text.

use chrono::{Local, NaiveDate};
use regex::Regex;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::LazyLock;

use crate::{Error, Result};

/// Opening marker of a template action.
const ACTION_OPEN: &str = "{{";

/// Date format used by the `date` builtin.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Matches one action, capturing its trimmed body.
static ACTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}").unwrap_or_else(|_| unreachable!()));

/// Matches an argument reference body: `.identifier`.
static ARGUMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.([A-Za-z_][A-Za-z0-9_]*)$").unwrap_or_else(|_| unreachable!()));

/// Renders prompt content with the given arguments.
///
/// Never fails: on any error the original content is returned unchanged.
#[must_use]
pub fn render<S: BuildHasher>(content: &str, arguments: &HashMap<String, String, S>) -> String {
    match try_render(content, arguments) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::debug!(error = %e, "Template rendering failed, serving original content");
            content.to_string()
        },
    }
}

/// Renders prompt content, reporting errors instead of falling back.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for an unclosed action, an unknown
/// function, or a reference to an argument that was not supplied.
pub fn try_render<S: BuildHasher>(
    content: &str,
    arguments: &HashMap<String, String, S>,
) -> Result<String> {
    render_on(content, arguments, Local::now().date_naive())
}

/// Renders with a fixed date for the `date` builtin.
///
/// # Errors
///
/// Same as [`try_render`].
pub fn render_on<S: BuildHasher>(
    content: &str,
    arguments: &HashMap<String, String, S>,
    today: NaiveDate,
) -> Result<String> {
    if !content.contains(ACTION_OPEN) {
        return Ok(content.to_string());
    }

    let mut output = String::with_capacity(content.len());
    let mut last = 0;

    for captures in ACTION_PATTERN.captures_iter(content) {
        let Some(action) = captures.get(0) else {
            continue;
        };
        let literal = &content[last..action.start()];
        check_literal(literal)?;
        output.push_str(literal);

        let body = captures.get(1).map_or("", |m| m.as_str());
        output.push_str(&evaluate(body, arguments, today)?);
        last = action.end();
    }

    let tail = &content[last..];
    check_literal(tail)?;
    output.push_str(tail);

    Ok(output)
}

/// A literal segment must not hold the start of another action.
fn check_literal(literal: &str) -> Result<()> {
    if literal.contains(ACTION_OPEN) {
        return Err(Error::InvalidInput("unclosed template action".to_string()));
    }
    Ok(())
}

fn evaluate<S: BuildHasher>(
    body: &str,
    arguments: &HashMap<String, String, S>,
    today: NaiveDate,
) -> Result<String> {
    if body == "date" {
        return Ok(today.format(DATE_FORMAT).to_string());
    }

    if let Some(name) = ARGUMENT_PATTERN.captures(body).and_then(|c| c.get(1)) {
        return arguments
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| Error::InvalidInput(format!("missing argument '{}'", name.as_str())));
    }

    Err(Error::InvalidInput(format!("unsupported template action '{body}'")))
}
