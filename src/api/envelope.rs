use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const HEALTH_MESSAGE: &str = "Service is running";
pub const NOT_FOUND_MESSAGE: &str = "Not Found";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// The uniform body of every endpoint response.
///
/// Successful calls carry `result`; failures and the health check carry
/// `message`. Both shapes carry the HTTP status as `http_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success { result: Value, http_code: u16 },
    Message { message: String, http_code: u16 },
}

impl ResponseEnvelope {
    pub fn success(result: Value) -> Self {
        ResponseEnvelope::Success {
            result,
            http_code: 200,
        }
    }

    pub fn with_message(http_code: u16, message: impl Into<String>) -> Self {
        ResponseEnvelope::Message {
            message: message.into(),
            http_code,
        }
    }

    #[must_use]
    pub fn http_code(&self) -> u16 {
        match self {
            ResponseEnvelope::Success { http_code, .. } | ResponseEnvelope::Message { http_code, .. } => {
                *http_code
            }
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseEnvelope::Success { .. })
    }

    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        match self {
            ResponseEnvelope::Success { result, .. } => Some(result),
            ResponseEnvelope::Message { .. } => None,
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            ResponseEnvelope::Message { message, .. } => Some(message),
            ResponseEnvelope::Success { .. } => None,
        }
    }
}

/// What a response carries: an envelope, or a raw document such as the
/// OpenAPI description.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Envelope(ResponseEnvelope),
    Document(Value),
}

/// Transport-neutral response produced by [`Api::handle`](crate::Api::handle).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// Response whose status is the envelope's `http_code`.
    pub fn envelope(envelope: ResponseEnvelope) -> Self {
        Self {
            status: envelope.http_code(),
            body: ResponseBody::Envelope(envelope),
        }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self::envelope(ResponseEnvelope::with_message(status, message))
    }

    pub fn document(document: Value) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Document(document),
        }
    }

    #[must_use]
    pub fn as_envelope(&self) -> Option<&ResponseEnvelope> {
        match &self.body {
            ResponseBody::Envelope(envelope) => Some(envelope),
            ResponseBody::Document(_) => None,
        }
    }

    /// The body as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match &self.body {
            ResponseBody::Envelope(envelope) => {
                serde_json::to_value(envelope).unwrap_or(Value::Null)
            }
            ResponseBody::Document(document) => document.clone(),
        }
    }

    /// The body serialized as JSON bytes.
    ///
    /// # Errors
    ///
    /// Only if serialization of the body fails.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        match &self.body {
            ResponseBody::Envelope(envelope) => serde_json::to_vec(envelope),
            ResponseBody::Document(document) => serde_json::to_vec(document),
        }
    }
}
