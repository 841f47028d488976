//! The result of one completion attempt, as the renderer sees it.

use serde::{Deserialize, Serialize};

/// Outcome of a completion request.
///
/// Every failure of the completion API lands in one of the three error
/// variants; nothing else escapes the invoker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompletionOutcome {
    /// The model answered. `reply_text` is already trimmed and may be empty.
    Ok { reply_text: String },
    /// The prompt does not fit the model's context window.
    TooLong { status_text: String },
    /// The API rejected the request for another reason.
    InvalidRequest { status_text: String },
    /// Network, auth, rate limit, malformed response, ...
    OtherError { status_text: String },
}

impl CompletionOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, CompletionOutcome::Ok { .. })
    }

    pub fn reply_text(&self) -> Option<&str> {
        match self {
            CompletionOutcome::Ok { reply_text } => Some(reply_text),
            _ => None,
        }
    }

    pub fn status_text(&self) -> Option<&str> {
        match self {
            CompletionOutcome::Ok { .. } => None,
            CompletionOutcome::TooLong { status_text }
            | CompletionOutcome::InvalidRequest { status_text }
            | CompletionOutcome::OtherError { status_text } => Some(status_text),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionOutcome::Ok { .. } => "ok",
            CompletionOutcome::TooLong { .. } => "too_long",
            CompletionOutcome::InvalidRequest { .. } => "invalid_request",
            CompletionOutcome::OtherError { .. } => "other_error",
        }
    }
}
