//! Tests for request parameter builders

use super::*;
use crate::config::TapConfig;
use crate::error::{Error, ErrorKind};
use crate::pagination::PageCursor;
use crate::partition::ParentContext;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn config() -> TapConfig {
    TapConfig {
        api_account_secret: Some("s1".to_string()),
        survey_id: Some("42".to_string()),
        limit: 2,
        ..Default::default()
    }
}

fn token(s: &str) -> PageCursor {
    PageCursor::new(s).unwrap()
}

// ============================================================================
// SurveyResponseParams Tests
// ============================================================================

#[test]
fn test_first_page_base_params() {
    let builder = SurveyResponseParams::new(vec![]);
    let ctx = builder.build(&config(), None, None, None).unwrap();

    assert_eq!(ctx.get("id"), Some("42"));
    assert_eq!(ctx.get("limit"), Some("2"));
    assert_eq!(ctx.get("expand[profile]"), Some("all"));
    assert_eq!(ctx.get("before"), None);
    assert_eq!(ctx.get("after"), None);
    assert!(ctx.context.is_none());
}

#[test]
fn test_default_limit() {
    let config = TapConfig {
        survey_id: Some("42".to_string()),
        ..Default::default()
    };
    let ctx = SurveyResponseParams::new(vec![])
        .build(&config, None, None, None)
        .unwrap();
    assert_eq!(ctx.get("limit"), Some("50"));
}

#[test]
fn test_missing_selector_is_configuration_error() {
    let mut config = config();
    config.survey_id = None;
    let err = SurveyResponseParams::new(vec![])
        .build(&config, None, None, None)
        .unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { ref field } if field == "survey_id"));
    assert_eq!(err.kind(), ErrorKind::Configuration);

    config.survey_id = Some(String::new());
    assert!(SurveyResponseParams::new(vec![])
        .build(&config, None, None, None)
        .is_err());
}

#[test]
fn test_bookmark_sets_lower_bound() {
    let bookmark = json!("2024-01-05T00:00:00Z");
    let ctx = SurveyResponseParams::new(vec![])
        .build(&config(), Some(&bookmark), None, None)
        .unwrap();
    assert_eq!(ctx.get("after"), Some("2024-01-05T00:00:00Z"));
}

#[test]
fn test_created_after_overrides_bookmark() {
    let mut config = config();
    config.created_after = Some("2023-06-01T00:00:00Z".to_string());
    let bookmark = json!("2024-01-05T00:00:00Z");

    let ctx = SurveyResponseParams::new(vec![])
        .build(&config, Some(&bookmark), None, None)
        .unwrap();
    assert_eq!(ctx.get("after"), Some("2023-06-01T00:00:00Z"));
}

#[test]
fn test_token_overrides_created_before() {
    let mut config = config();
    config.created_before = Some("2024-02-01T00:00:00Z".to_string());
    let builder = SurveyResponseParams::new(vec![]);

    let first = builder.build(&config, None, None, None).unwrap();
    assert_eq!(first.get("before"), Some("2024-02-01T00:00:00Z"));

    let next = builder
        .build(&config, None, None, Some(&token("tok1")))
        .unwrap();
    assert_eq!(next.get("before"), Some("tok1"));
}

#[test_case(None, None, None, None, None ; "nothing")]
#[test_case(Some("B"), None, None, None, Some("B") ; "bookmark only")]
#[test_case(Some("B"), Some("A"), None, None, Some("A") ; "override beats bookmark")]
#[test_case(None, Some("A"), Some("C"), Some("T"), Some("A") ; "token leaves after alone")]
fn test_after_precedence(
    bookmark: Option<&str>,
    created_after: Option<&str>,
    created_before: Option<&str>,
    next: Option<&str>,
    expected_after: Option<&str>,
) {
    let mut config = config();
    config.created_after = created_after.map(String::from);
    config.created_before = created_before.map(String::from);
    let bookmark = bookmark.map(|b| json!(b));
    let next = next.map(token);

    let ctx = SurveyResponseParams::new(vec![])
        .build(&config, bookmark.as_ref(), None, next.as_ref())
        .unwrap();
    assert_eq!(ctx.get("after"), expected_after);
}

#[test]
fn test_numeric_bookmark() {
    let bookmark = json!(1_700_000_000);
    let ctx = SurveyResponseParams::new(vec![])
        .build(&config(), Some(&bookmark), None, None)
        .unwrap();
    assert_eq!(ctx.get("after"), Some("1700000000"));
}

#[test]
fn test_context_merged_into_base_params() {
    let parent = ParentContext::new("p").with_string("profile_id", "prof-1");
    let ctx = SurveyResponseParams::new(vec![])
        .build(&config(), None, Some(&parent), None)
        .unwrap();
    assert_eq!(ctx.get("profile_id"), Some("prof-1"));
    assert_eq!(ctx.context.as_ref(), Some(&parent));
}

#[test]
fn test_context_cannot_override_bounds() {
    let parent = ParentContext::new("p").with_string("after", "from-parent");
    let bookmark = json!("2024-01-05T00:00:00Z");
    let ctx = SurveyResponseParams::new(vec![])
        .build(&config(), Some(&bookmark), Some(&parent), None)
        .unwrap();
    assert_eq!(ctx.get("after"), Some("2024-01-05T00:00:00Z"));
}

// ============================================================================
// ContextParams Tests
// ============================================================================

#[test]
fn test_context_params_skip_path_keys() {
    let parent = ParentContext::new("p")
        .with_string("profile_id", "prof-1")
        .with_string("survey", "42");
    let builder = ContextParams::new(vec!["profile_id".to_string()]);

    let ctx = builder.build(&config(), None, Some(&parent), None).unwrap();
    assert_eq!(ctx.get("profile_id"), None);
    assert_eq!(ctx.get("survey"), Some("42"));
    assert_eq!(ctx.params.len(), 1);
    assert_eq!(ctx.context.as_ref(), Some(&parent));
}

#[test]
fn test_context_params_ignore_config() {
    let ctx = ContextParams::default()
        .build(&config(), Some(&json!("x")), None, Some(&token("t")))
        .unwrap();
    assert!(ctx.params.is_empty());
}

// ============================================================================
// RequestContext Tests
// ============================================================================

#[test]
fn test_request_context_set_replaces() {
    let mut ctx = RequestContext::new();
    ctx.set("before", "a");
    ctx.set("before", "b");
    assert_eq!(ctx.get("before"), Some("b"));
    assert_eq!(ctx.params.len(), 1);
}
