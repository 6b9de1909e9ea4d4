use serde::{Deserialize, Serialize};

pub const PROCESSED_STATUS_CODE: u16 = 200;
pub const PROCESSED_BODY: &str = "Processed";

/// Acknowledgment returned to the Lambda host after a batch is handled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    /// JSON-encoded body, so `Processed` is carried as `"Processed"`.
    pub body: String,
}

impl Response {
    pub fn processed() -> Self {
        Self {
            status_code: PROCESSED_STATUS_CODE,
            body: serde_json::Value::from(PROCESSED_BODY).to_string(),
        }
    }
}
