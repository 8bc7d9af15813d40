//! Request path templates
//!
//! Child stream paths carry `{name}` placeholders (for example
//! `/v3/analyze/profiles/{profile_id}`) that are filled from the
//! [`ParentContext`] derived from a parent record.

use crate::error::{Error, Result};
use crate::partition::ParentContext;
use crate::types::scalar_to_string;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Regex for matching path placeholders: {name}
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("valid placeholder regex")
});

/// Render a path template for `stream` using the parent context
///
/// Every placeholder must resolve to a scalar context value; the first one
/// that does not is reported as a missing field of the child stream.
pub fn render_path(stream: &str, template: &str, ctx: Option<&ParentContext>) -> Result<String> {
    let mut missing = None;

    let rendered = PLACEHOLDER_REGEX.replace_all(template, |cap: &Captures<'_>| {
        let name = &cap[1];
        match ctx
            .and_then(|c| c.get(name))
            .and_then(scalar_to_string)
        {
            Some(value) => value,
            None => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(field) => Err(Error::missing_field(stream, field)),
        None => Ok(rendered.into_owned()),
    }
}

/// Names of all placeholders in a template, in order of appearance
pub fn placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Check if a path contains placeholders
pub fn has_placeholders(template: &str) -> bool {
    PLACEHOLDER_REGEX.is_match(template)
}
