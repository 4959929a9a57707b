// Response envelope shared by every `/api/*` endpoint.
//
// `{ "success": bool, "data"?: T, "message"?: string }`

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// The `{success, data?, message?}` wrapper all API responses conform to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Reply of an action endpoint. Only `success` and `message` matter; any
/// `data` payload the service attaches is skipped.
pub type Ack = ApiResponse<IgnoredAny>;

impl<T> ApiResponse<T> {
    /// The server message, or `fallback` when it is missing or empty.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_owned()
    }

    /// `data` if the server reported success and sent a payload.
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_without_data_or_message() {
        let res: ApiResponse<()> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(res.success);
        assert_eq!(res.data, None);
        assert_eq!(res.message, None);
    }

    #[test]
    fn ack_skips_any_data_payload() {
        let res: Ack =
            serde_json::from_str(r#"{"success": true, "message": "ok", "data": {"job": 1}}"#)
                .unwrap();
        assert!(res.success);
        assert_eq!(res.message_or("done"), "ok");

        let res: Ack = serde_json::from_str(r#"{"success": false, "data": [1, "two"]}"#).unwrap();
        assert!(!res.success);

        let res: Ack = serde_json::from_str(r#"{"success": true, "data": null}"#).unwrap();
        assert!(res.data.is_none());
    }

    #[test]
    fn message_or_falls_back_on_empty() {
        let res: ApiResponse<()> =
            serde_json::from_str(r#"{"success": false, "message": ""}"#).unwrap();
        assert_eq!(res.message_or("failed"), "failed");

        let res: ApiResponse<()> =
            serde_json::from_str(r#"{"success": false, "message": "boom"}"#).unwrap();
        assert_eq!(res.message_or("failed"), "boom");
    }

    #[test]
    fn into_data_requires_success() {
        let res: ApiResponse<Vec<u8>> =
            serde_json::from_str(r#"{"success": false, "data": [1, 2]}"#).unwrap();
        assert_eq!(res.into_data(), None);

        let res: ApiResponse<Vec<u8>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2]}"#).unwrap();
        assert_eq!(res.into_data(), Some(vec![1, 2]));
    }
}
