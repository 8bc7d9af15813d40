//! Tests for partition module

use super::*;
use crate::error::Error;
use serde_json::json;

// ============================================================================
// ParentContext Tests
// ============================================================================

#[test]
fn test_parent_context_new() {
    let ctx = ParentContext::new("p1");
    assert_eq!(ctx.id, "p1");
    assert!(ctx.values.is_empty());
}

#[test]
fn test_parent_context_values() {
    let ctx = ParentContext::new("p1")
        .with_value("count", 3)
        .with_string("profile_id", "abc");

    assert_eq!(ctx.get("count"), Some(&json!(3)));
    assert_eq!(ctx.get_string("profile_id"), Some("abc"));
    assert_eq!(ctx.get_string("count"), None);

    let keys: Vec<&String> = ctx.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["count", "profile_id"]);
}

// ============================================================================
// ParentRouter Tests
// ============================================================================

#[test]
fn test_derive_context_nested_key() {
    let router = ParentRouter::new("survey_response_profiles", "profile.id", "profile_id");
    let record = json!({"id": "r1", "profile": {"id": "prof-9", "browser_l": "en"}});

    let ctx = router.derive_context(&record).unwrap();
    assert_eq!(ctx.id, "prof-9");
    assert_eq!(ctx.get_string("profile_id"), Some("prof-9"));
    assert_eq!(ctx.values.len(), 1);
}

#[test]
fn test_derive_context_numeric_key() {
    let router = ParentRouter::new("children", "id", "parent_id");
    let ctx = router.derive_context(&json!({"id": 17})).unwrap();
    assert_eq!(ctx.id, "17");
    assert_eq!(ctx.get("parent_id"), Some(&json!(17)));
}

#[test]
fn test_derive_context_missing_field() {
    let router = ParentRouter::new("survey_response_profiles", "profile.id", "profile_id");

    for record in [
        json!({"id": "r1"}),
        json!({"id": "r1", "profile": null}),
        json!({"id": "r1", "profile": {"id": null}}),
        json!({"id": "r1", "profile": {"id": ""}}),
        json!({"id": "r1", "profile": {"id": {"nested": true}}}),
    ] {
        let err = router.derive_context(&record).unwrap_err();
        assert!(
            matches!(err, Error::MissingField { ref stream, ref field }
                if stream == "survey_response_profiles" && field == "profile.id"),
            "unexpected error for {record}: {err}"
        );
    }
}

#[test]
fn test_router_accessors() {
    let router = ParentRouter::new("child", "profile.id", "profile_id");
    assert_eq!(router.parent_key(), "profile.id");
    assert_eq!(router.context_key(), "profile_id");
}
