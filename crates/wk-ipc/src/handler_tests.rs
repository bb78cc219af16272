// SPDX-License-Identifier: MIT

use super::*;
use serde_json::json;

struct EchoHandler;

#[async_trait]
impl IpcHandler for EchoHandler {
    async fn call(&self, _context: &Value, payload: Value) -> Result<Value, KitError> {
        Ok(payload)
    }
}

#[tokio::test]
async fn default_hooks_have_no_schema_or_rate_limit_override() {
    let handler = EchoHandler;
    assert!(handler.payload_schema().is_none());
    assert!(handler.rate_limit().is_none());
    assert_eq!(handler.call(&json!({}), json!(42)).await.unwrap(), json!(42));
}
