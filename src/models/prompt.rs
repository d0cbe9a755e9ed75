//! Prompt record models.
//!
//! A [`PromptRecord`] is a named text template with metadata. Its identifier
//! is always derived from its name, so two records with the same name are the
//! same record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A persisted prompt template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Storage identifier. Recomputed from `name` on every write.
    #[serde(default)]
    pub id: String,
    /// Unique programmatic name used to invoke the prompt.
    pub name: String,
    /// Human-readable display title.
    #[serde(default)]
    pub title: String,
    /// Human-readable explanation of what the prompt is for.
    #[serde(default)]
    pub description: String,
    /// Names of the arguments the prompt accepts, in declaration order.
    #[serde(default)]
    pub arguments: Vec<String>,
    /// The prompt body, possibly containing `{{ .argument }}` placeholders.
    #[serde(default)]
    pub content: String,
    /// Categorization tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl PromptRecord {
    /// Creates a new record with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            content: content.into(),
            ..Self::default()
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the argument names.
    #[must_use]
    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the identifier this record is stored under.
    #[must_use]
    pub fn derived_id(&self) -> &str {
        &self.name
    }
}

/// Filter descriptor for listing prompts.
///
/// Only "select all" is used by the server. The name and range fields are
/// accepted so callers can build richer queries, but the store ignores them
/// and `list` always returns every cached record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptQuery {
    /// Select every record.
    pub all: bool,
    /// Name prefix (ignored).
    pub name_starts_with: Option<String>,
    /// Name substring (ignored).
    pub name_contains: Option<String>,
    /// First index of a range (ignored).
    pub index_from: Option<usize>,
    /// Last index of a range (ignored).
    pub index_to: Option<usize>,
}

impl PromptQuery {
    /// A query selecting every record.
    #[must_use]
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_id_from_name() {
        let record = PromptRecord::new("code-review", "Review {{ .code }}");
        assert_eq!(record.id, "code-review");
        assert_eq!(record.derived_id(), "code-review");
        assert_eq!(record.content, "Review {{ .code }}");
    }

    #[test]
    fn test_builders() {
        let record = PromptRecord::new("p", "c")
            .with_title("Title")
            .with_description("Desc")
            .with_arguments(["b", "a"])
            .with_tags(["z", "y", "z"]);

        assert_eq!(record.title, "Title");
        assert_eq!(record.description, "Desc");
        assert_eq!(record.arguments, vec!["b", "a"]);
        assert_eq!(record.tags.iter().collect::<Vec<_>>(), vec!["y", "z"]);
    }

    #[test]
    fn test_query_all() {
        let query = PromptQuery::all();
        assert!(query.all);
        assert!(query.name_starts_with.is_none());
    }
}
