//! Tests for pagination module

use super::*;
use crate::error::Error;
use serde_json::json;
use test_case::test_case;

// ============================================================================
// PageCursor Tests
// ============================================================================

#[test]
fn test_page_cursor_rejects_empty() {
    assert!(PageCursor::new("").is_none());
    let cursor = PageCursor::new("tok1").unwrap();
    assert_eq!(cursor.as_str(), "tok1");
    assert_eq!(cursor.to_string(), "tok1");
}

#[test]
fn test_next_page_accessors() {
    let next = NextPage::Continue(PageCursor::new("t").unwrap());
    assert!(!next.is_done());
    assert_eq!(next.cursor().map(PageCursor::as_str), Some("t"));

    assert!(NextPage::Done.is_done());
    assert!(NextPage::Done.cursor().is_none());
}

// ============================================================================
// CursorPaginator Tests
// ============================================================================

#[test_case(json!({"responses": [], "cursor": {"before": "tok1"}}), Some("tok1") ; "cursor present")]
#[test_case(json!({"responses": [], "cursor": {"before": 1234}}), Some("1234") ; "numeric cursor")]
#[test_case(json!({"responses": [], "cursor": {}}), None ; "empty cursor object")]
#[test_case(json!({"responses": []}), None ; "no cursor object")]
#[test_case(json!({"cursor": {"before": ""}}), None ; "empty token")]
#[test_case(json!({"cursor": {"before": null}}), None ; "null token")]
#[test_case(json!({"cursor": "tok1"}), None ; "cursor not an object")]
fn test_cursor_next_token(body: serde_json::Value, expected: Option<&str>) {
    let paginator = CursorPaginator::default();
    assert_eq!(
        paginator.next_token(&body).as_ref().map(PageCursor::as_str),
        expected
    );
}

#[test]
fn test_cursor_custom_path() {
    let paginator = CursorPaginator::new("$.meta.next");
    let body = json!({"meta": {"next": "abc"}});
    assert_eq!(paginator.next_token(&body), PageCursor::new("abc"));
}

#[test]
fn test_cursor_advance_tracks_state() {
    let paginator = CursorPaginator::default();
    let mut state = PaginationState::new();

    let next = paginator
        .advance("s", &json!({"cursor": {"before": "tok1"}}), 2, &mut state)
        .unwrap();
    assert_eq!(next, NextPage::Continue(PageCursor::new("tok1").unwrap()));
    assert_eq!(state.pages, 1);
    assert_eq!(state.total_fetched, 2);
    assert!(!state.done);

    let next = paginator
        .advance("s", &json!({"cursor": {}}), 1, &mut state)
        .unwrap();
    assert!(next.is_done());
    assert_eq!(state.pages, 2);
    assert_eq!(state.total_fetched, 3);
    assert!(state.done);
}

#[test]
fn test_cursor_repeated_token_is_error() {
    let paginator = CursorPaginator::default();
    let mut state = PaginationState::new();
    let body = json!({"cursor": {"before": "same"}});

    paginator.advance("s", &body, 1, &mut state).unwrap();
    let err = paginator.advance("s", &body, 1, &mut state).unwrap_err();
    assert!(matches!(err, Error::PaginationLoop { ref cursor, .. } if cursor == "same"));
    assert!(state.done);
}

// ============================================================================
// NoPaginator Tests
// ============================================================================

#[test]
fn test_no_paginator_single_page() {
    let paginator = NoPaginator;
    let mut state = PaginationState::new();
    let body = json!({"cursor": {"before": "ignored"}});

    assert!(paginator.next_token(&body).is_none());
    let next = paginator.advance("s", &body, 1, &mut state).unwrap();
    assert!(next.is_done());
    assert!(state.done);
}
