// SPDX-License-Identifier: MIT

use super::*;
use async_trait::async_trait;
use serde_json::json;
use wk_core::SystemClock;

struct EchoHandler;

#[async_trait]
impl IpcHandler for EchoHandler {
    async fn call(&self, _context: &serde_json::Value, payload: serde_json::Value) -> Result<serde_json::Value, KitError> {
        Ok(payload)
    }
}

struct FailingHandler;

#[async_trait]
impl IpcHandler for FailingHandler {
    async fn call(&self, _context: &serde_json::Value, _payload: serde_json::Value) -> Result<serde_json::Value, KitError> {
        Err(KitError::permission("nope"))
    }
}

struct SchemaHandler(serde_json::Value);

#[async_trait]
impl IpcHandler for SchemaHandler {
    async fn call(&self, _context: &serde_json::Value, payload: serde_json::Value) -> Result<serde_json::Value, KitError> {
        Ok(payload)
    }

    fn payload_schema(&self) -> Option<&serde_json::Value> {
        Some(&self.0)
    }
}

fn router() -> IpcRouter {
    IpcRouter::new(SystemClock, RouterConfig::default())
}

#[tokio::test]
async fn successful_call_returns_a_zero_code_envelope() {
    let router = router();
    router.register("echo", Arc::new(EchoHandler)).unwrap();

    let response = router.handle(IpcRequest::new("echo", json!(42)), None).await;

    assert_eq!(response.code, 0);
    assert_eq!(response.data, json!(42));
}

#[tokio::test]
async fn missing_handler_is_not_found() {
    let router = router();
    let response = router.handle(IpcRequest::new("nope", json!(null)), None).await;
    assert_eq!(response.category, Some(wk_core::ErrorCategory::NotFound));
}

#[tokio::test]
async fn blank_name_is_a_validation_error() {
    let router = router();
    let response = router.handle(IpcRequest::new("  ", json!(null)), None).await;
    assert_eq!(response.category, Some(wk_core::ErrorCategory::Validation));
}

#[tokio::test]
async fn handler_error_is_propagated_with_its_category() {
    let router = router();
    router.register("denied", Arc::new(FailingHandler)).unwrap();
    let response = router.handle(IpcRequest::new("denied", json!(null)), None).await;
    assert_eq!(response.category, Some(wk_core::ErrorCategory::Permission));
}

#[tokio::test]
async fn schema_violation_is_a_validation_error() {
    let router = router();
    let schema = json!({"type": "object", "required": ["name"]});
    router.register("typed", Arc::new(SchemaHandler(schema))).unwrap();

    let response = router.handle(IpcRequest::new("typed", json!({})), None).await;

    assert_eq!(response.category, Some(wk_core::ErrorCategory::Validation));
}

#[tokio::test]
async fn schema_violation_reports_structured_issues_in_details() {
    let router = router();
    let schema = json!({"type": "object", "required": ["name"]});
    router.register("typed", Arc::new(SchemaHandler(schema))).unwrap();

    let response = router.handle(IpcRequest::new("typed", json!({})), None).await;

    let issues = response.details.unwrap()["issues"].as_array().unwrap().clone();
    assert_eq!(issues.len(), 1);
    assert!(issues[0]["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn rate_limit_denies_past_the_configured_budget() {
    let router = IpcRouter::new(
        SystemClock,
        RouterConfig { default_rate_limit: RateLimitConfig { limit: 1, interval: std::time::Duration::from_secs(60) }, ..Default::default() },
    );
    router.register("echo", Arc::new(EchoHandler)).unwrap();
    let sender = SenderId::new(1);

    let first = router.handle(IpcRequest::new("echo", json!(1)), Some(sender)).await;
    let second = router.handle(IpcRequest::new("echo", json!(1)), Some(sender)).await;

    assert_eq!(first.code, 0);
    assert_eq!(second.category, Some(wk_core::ErrorCategory::RateLimit));
}

#[tokio::test]
async fn unregister_removes_the_handler() {
    let router = router();
    router.register("echo", Arc::new(EchoHandler)).unwrap();
    router.unregister("echo");

    let response = router.handle(IpcRequest::new("echo", json!(1)), None).await;
    assert_eq!(response.category, Some(wk_core::ErrorCategory::NotFound));
}
