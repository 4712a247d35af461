// Controller seam between the HTTP dispatch layer and the download manager.
//
// The dispatcher never looks inside a reply beyond its `status` field; the
// rest of the envelope belongs to the front-end contract.
pub mod library;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use library::LibraryControllers;

/// Named arguments parsed from a POST request body.
pub type ActionArgs = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Warning,
    Error,
}

/// Result envelope every controller returns. A reply with `status: "error"`
/// is surfaced to the client as HTTP 502 with this envelope as the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerReply {
    pub status: ReplyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ControllerReply {
    pub fn success(data: Value) -> Self {
        Self {
            status: ReplyStatus::Success,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Success,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Warning,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Error,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == ReplyStatus::Error
    }
}

/// Business-logic operations the dispatcher routes to.
///
/// The HTTP layer treats these as black boxes: it spreads the decoded request
/// body into `args` and serializes whatever comes back.
#[async_trait]
pub trait Controllers: Send + Sync {
    /// Follow a show, optionally marking the episode already watched.
    async fn add(&self, args: ActionArgs) -> ControllerReply;

    /// Unfollow a show, or clear the whole followed set.
    async fn delete(&self, args: ActionArgs) -> ControllerReply;

    /// Search the catalog by keyword.
    async fn search(&self, args: ActionArgs) -> ControllerReply;

    /// Weekly broadcast calendar.
    async fn cal(&self) -> ControllerReply;

    /// Read the whole config (`name` = None), read one key (`value` = None),
    /// or write one key.
    async fn config(&self, name: Option<String>, value: Option<String>) -> ControllerReply;

    /// Prepare downloads for a followed show.
    async fn download_prepare(&self, args: ActionArgs) -> ControllerReply;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_serializes_without_empty_fields() {
        let reply = ControllerReply::success(json!({"count": 1}));
        let text = serde_json::to_string(&reply).unwrap();
        assert!(text.contains("\"status\":\"success\""));
        assert!(!text.contains("message"));
    }

    #[test]
    fn test_error_reply_is_error() {
        assert!(ControllerReply::error("boom").is_error());
        assert!(!ControllerReply::warning("meh").is_error());
    }
}
