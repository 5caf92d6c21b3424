use serde::{Deserialize, Serialize};

/// Body of the chat POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Backend reply. In practice exactly one field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// What the reply means for the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKind {
    Answer(String),
    ServerError(String),
}

impl ChatReply {
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            error: None,
            response: Some(text.into()),
        }
    }

    pub fn server_error(text: impl Into<String>) -> Self {
        Self {
            error: Some(text.into()),
            response: None,
        }
    }

    /// A non-empty `error` wins over `response`; an empty one counts as
    /// absent. A reply with neither is unusable.
    pub fn into_kind(self) -> Option<ReplyKind> {
        match (self.error, self.response) {
            (Some(error), _) if !error.is_empty() => Some(ReplyKind::ServerError(error)),
            (_, Some(response)) => Some(ReplyKind::Answer(response)),
            (_, None) => None,
        }
    }
}
