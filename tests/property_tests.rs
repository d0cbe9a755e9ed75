//! Property-based tests for rendering and prompt files.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Rendering never alters content without actions
//! - Rendering substitutes every supplied argument
//! - Broken templates come back verbatim
//! - Prompt files parse back into the record that was written

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use prompter::PromptRecord;
use prompter::rendering::render;
use prompter::storage::prompt::front_matter;
use std::collections::HashMap;

proptest! {
    /// Property: content without `{{` is returned unchanged.
    #[test]
    fn prop_render_plain_text_is_identity(content in "[^{]*") {
        let args = HashMap::from([("name".to_string(), "value".to_string())]);
        prop_assert_eq!(render(&content, &args), content);
    }

    /// Property: every argument reference is replaced by its value.
    #[test]
    fn prop_render_substitutes_arguments(
        key in "[a-z][a-z0-9_]{0,10}",
        value in "[^{}]{0,30}",
        prefix in "[^{}]{0,20}",
        suffix in "[^{}]{0,20}",
    ) {
        let content = format!("{prefix}{{{{ .{key} }}}}{suffix}");
        let args = HashMap::from([(key, value.clone())]);
        prop_assert_eq!(render(&content, &args), format!("{prefix}{value}{suffix}"));
    }

    /// Property: an unclosed action returns the input verbatim.
    #[test]
    fn prop_render_unclosed_is_verbatim(prefix in "[^{}]{0,30}", rest in "[^{}]{0,30}") {
        let content = format!("{prefix}{{{{{rest}");
        prop_assert_eq!(render(&content, &HashMap::new()), content);
    }

    /// Property: a missing argument returns the input verbatim.
    #[test]
    fn prop_render_missing_argument_is_verbatim(key in "[a-z]{1,10}") {
        let content = format!("Hello {{{{ .{key} }}}}!");
        prop_assert_eq!(render(&content, &HashMap::new()), content);
    }

    /// Property: serialized records parse back equal, modulo body trimming.
    #[test]
    fn prop_front_matter_roundtrip(
        name in "[a-z][a-z0-9_-]{0,20}",
        title in "[A-Za-z0-9 ]{0,30}",
        description in "[A-Za-z0-9 .,]{0,60}",
        arguments in prop::collection::vec("[a-z]{1,8}", 0..4),
        tags in prop::collection::btree_set("[a-z]{1,8}", 0..4),
        content in "[A-Za-z0-9 {}.\n-]{0,200}",
    ) {
        let mut record = PromptRecord::new(name, content)
            .with_title(title)
            .with_description(description)
            .with_arguments(arguments);
        record.tags = tags;

        let text = front_matter::serialize(&record).unwrap();
        let parsed = front_matter::parse(&text).unwrap();

        record.content = record.content.trim().to_string();
        prop_assert_eq!(parsed, record);
    }

    /// Property: the parser never panics on arbitrary input.
    #[test]
    fn prop_front_matter_parse_total(text in ".{0,300}") {
        let _ = front_matter::parse(&text);
    }
}
