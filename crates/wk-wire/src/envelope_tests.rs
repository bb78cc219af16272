// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn request_rejects_empty_name() {
    let req = IpcRequest::new("", Value::Null);
    assert!(req.validate().is_err());
}

#[test]
fn request_accepts_nonempty_name() {
    let req = IpcRequest::new("getUser", serde_json::json!({"id": "u1"}));
    assert!(req.validate().is_ok());
}

#[test]
fn ok_response_has_zero_code() {
    let resp = IpcResponse::ok(serde_json::json!({"id": "u1"}));
    assert!(resp.is_success());
    assert_eq!(resp.category, None);
}

#[test]
fn error_response_carries_category_and_code() {
    let err = KitError::rate_limit("too many requests");
    let resp = IpcResponse::from_error(&err, None);
    assert_eq!(resp.code, 429);
    assert_eq!(resp.category, Some(ErrorCategory::RateLimit));
    assert!(!resp.is_success());
}

#[test]
fn error_response_omits_stack_when_not_debug() {
    let err = KitError::internal("boom");
    let resp = IpcResponse::from_error(&err, None);
    let json = serde_json::to_value(&resp).unwrap();
    assert!(json.get("stack").is_none());
}

#[test]
fn from_kit_error_matches_from_error() {
    let err = KitError::not_found("window missing");
    let via_from: IpcResponse = err.clone().into();
    let via_ctor = IpcResponse::from_error(&err, None);
    assert_eq!(via_from, via_ctor);
}

#[test]
fn error_response_includes_stack_in_debug_mode() {
    let err = KitError::internal("boom");
    let resp = IpcResponse::from_error(&err, Some("at foo()".to_string()));
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["stack"], "at foo()");
}
