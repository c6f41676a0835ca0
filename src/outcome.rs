use crate::error::ConsoleError;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const REQUEST_ERROR_MESSAGE: &str =
    "Request error, if the problem persist please contact support.";

/// Body of a response: parsed JSON when possible, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Json(Value),
    Text(String),
}

impl Content {
    pub fn to_pretty_string(&self) -> String {
        match self {
            Content::Json(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
            Content::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOutcome {
    pub content: Content,
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
    pub redirected: bool,
    pub headers: BTreeMap<String, String>,
    pub url: String,
}

/// Result of one send.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// The server answered, whatever the status.
    Response(ResponseOutcome),
    /// The request could not be completed or its response could not be read.
    Failed { message: String },
    /// The input was invalid; nothing was sent.
    Rejected { message: String },
}

impl RequestOutcome {
    pub fn failed() -> Self {
        RequestOutcome::Failed {
            message: REQUEST_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn rejected(err: &ConsoleError) -> Self {
        RequestOutcome::Rejected {
            message: err.to_string(),
        }
    }

    pub fn ok(&self) -> bool {
        matches!(self, RequestOutcome::Response(r) if r.ok)
    }

    /// `None` when nothing was sent.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestOutcome::Response(r) => Some(r.status),
            RequestOutcome::Failed { .. } => Some(StatusCode::BAD_REQUEST.as_u16()),
            RequestOutcome::Rejected { .. } => None,
        }
    }

    pub fn status_text(&self) -> Option<&str> {
        match self {
            RequestOutcome::Response(r) => Some(&r.status_text),
            RequestOutcome::Failed { .. } => StatusCode::BAD_REQUEST.canonical_reason(),
            RequestOutcome::Rejected { .. } => None,
        }
    }

    pub fn content(&self) -> Content {
        match self {
            RequestOutcome::Response(r) => r.content.clone(),
            RequestOutcome::Failed { message } | RequestOutcome::Rejected { message } => {
                Content::Text(message.clone())
            }
        }
    }

    pub fn kind(&self) -> StatusKind {
        match self.status() {
            Some(status) => StatusKind::from_status(status),
            None => StatusKind::Error,
        }
    }

    /// Flat JSON view with the keys a documentation page expects.
    pub fn to_json(&self) -> Value {
        match self {
            RequestOutcome::Response(r) => {
                serde_json::to_value(r).unwrap_or(Value::Null)
            }
            RequestOutcome::Failed { message } => serde_json::json!({
                "content": message,
                "ok": false,
                "status": self.status(),
                "statusText": self.status_text(),
            }),
            RequestOutcome::Rejected { message } => serde_json::json!({
                "content": message,
                "ok": false,
                "sent": false,
            }),
        }
    }
}

/// Status class used to color the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Redirect,
    Error,
}

impl StatusKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            100..=199 => StatusKind::Info,
            200..=299 => StatusKind::Success,
            300..=399 => StatusKind::Redirect,
            _ => StatusKind::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16) -> RequestOutcome {
        RequestOutcome::Response(ResponseOutcome {
            content: Content::Json(json!({"id": 7})),
            ok: (200..300).contains(&status),
            status,
            status_text: "OK".to_string(),
            redirected: false,
            headers: BTreeMap::from([(
                "content-type".to_string(),
                "application/json".to_string(),
            )]),
            url: "http://localhost/pets/7".to_string(),
        })
    }

    #[test]
    fn failed_should_report_bad_request() {
        let outcome = RequestOutcome::failed();
        assert!(!outcome.ok());
        assert_eq!(outcome.status(), Some(400));
        assert_eq!(outcome.status_text(), Some("Bad Request"));
        assert_eq!(outcome.content(), Content::Text(REQUEST_ERROR_MESSAGE.to_string()));
        assert_eq!(outcome.kind(), StatusKind::Error);
    }

    #[test]
    fn rejected_should_carry_error_message() {
        let err = ConsoleError::NoServer;
        let outcome = RequestOutcome::rejected(&err);
        assert!(!outcome.ok());
        assert_eq!(outcome.status(), None);
        assert_eq!(outcome.content(), Content::Text(err.to_string()));
    }

    #[test]
    fn to_json_should_use_camel_case_keys() {
        let value = response(200).to_json();
        assert_eq!(
            value,
            json!({
                "content": {"id": 7},
                "ok": true,
                "status": 200,
                "statusText": "OK",
                "redirected": false,
                "headers": {"content-type": "application/json"},
                "url": "http://localhost/pets/7",
            })
        );

        let value = RequestOutcome::failed().to_json();
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["status"], json!(400));
        assert_eq!(value["statusText"], json!("Bad Request"));
    }

    #[test]
    fn kind_should_follow_status_class() {
        assert_eq!(response(101).kind(), StatusKind::Info);
        assert_eq!(response(204).kind(), StatusKind::Success);
        assert_eq!(response(302).kind(), StatusKind::Redirect);
        assert_eq!(response(404).kind(), StatusKind::Error);
        assert_eq!(response(503).kind(), StatusKind::Error);
    }

    #[test]
    fn content_should_pretty_print_json() {
        let content = Content::Json(json!({"a": 1}));
        assert_eq!(content.to_pretty_string(), "{\n  \"a\": 1\n}");
        assert_eq!(Content::Text("raw".to_string()).to_pretty_string(), "raw");
    }
}
