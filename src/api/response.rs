//! API response types
//!
//! Every JSON route answers with the same envelope:
//! `{"msg": ..., "code": ..., "status": ..., "data": ...}`.
//! `QueryResult` is the typed form; it only becomes an envelope at the edge.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::dataset::DatasetError;

/// Envelope status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Cancelled,
    Failure,
}

/// Failure classification exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The dataset file is missing, unreadable or has no header
    SourceUnreadable,
    /// The predicate text does not parse
    InvalidPredicateSyntax,
    /// No chunk of the dataset could be evaluated
    ChunkEvaluationError,
    /// Worker failure or misconfiguration
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this failure
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::InvalidPredicateSyntax => StatusCode::BAD_REQUEST,
            ErrorKind::ChunkEvaluationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::SourceUnreadable | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<&DatasetError> for ErrorKind {
    fn from(err: &DatasetError) -> Self {
        match err {
            DatasetError::SourceUnreadable { .. } => ErrorKind::SourceUnreadable,
            DatasetError::InvalidPredicate(_) => ErrorKind::InvalidPredicateSyntax,
            DatasetError::ChunkEvaluation(_) => ErrorKind::ChunkEvaluationError,
            DatasetError::InvalidConfig(_) => ErrorKind::Internal,
        }
    }
}

/// Outcome of a discovery or query call
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<T> {
    Success { message: String, data: T },
    /// Partial data gathered before cancellation
    Cancelled { message: String, data: T },
    Failure { kind: ErrorKind, message: String },
}

impl<T> QueryResult<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        QueryResult::Success {
            message: message.into(),
            data,
        }
    }

    pub fn cancelled(message: impl Into<String>, data: T) -> Self {
        QueryResult::Cancelled {
            message: message.into(),
            data,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        QueryResult::Failure {
            kind,
            message: message.into(),
        }
    }

    /// Classify a dataset error
    pub fn from_error(err: &DatasetError) -> Self {
        Self::failure(ErrorKind::from(err), err.to_string())
    }

    pub fn status(&self) -> Status {
        match self {
            QueryResult::Success { .. } => Status::Success,
            QueryResult::Cancelled { .. } => Status::Cancelled,
            QueryResult::Failure { .. } => Status::Failure,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryResult::Success { .. } => StatusCode::OK,
            QueryResult::Cancelled { .. } => StatusCode::PARTIAL_CONTENT,
            QueryResult::Failure { kind, .. } => kind.status_code(),
        }
    }

    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }

    pub fn message(&self) -> &str {
        match self {
            QueryResult::Success { message, .. }
            | QueryResult::Cancelled { message, .. }
            | QueryResult::Failure { message, .. } => message,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryResult::Success { data, .. } | QueryResult::Cancelled { data, .. } => Some(data),
            QueryResult::Failure { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            QueryResult::Failure { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Success { .. })
    }

    /// Convert to the wire envelope
    pub fn into_envelope(self) -> Envelope<EnvelopeData<T>> {
        let code = self.code();
        let status = self.status();
        match self {
            QueryResult::Success { message, data } | QueryResult::Cancelled { message, data } => {
                Envelope {
                    msg: message,
                    code,
                    status,
                    data: Some(EnvelopeData::Payload(data)),
                }
            }
            QueryResult::Failure { kind, message } => Envelope {
                msg: message,
                code,
                status,
                data: Some(EnvelopeData::Error { error: kind }),
            },
        }
    }
}

/// Payload slot of the envelope
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EnvelopeData<T> {
    Payload(T),
    Error { error: ErrorKind },
}

/// Wire envelope
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub msg: String,
    pub code: u16,
    pub status: Status,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Success envelope carrying data
    pub fn ok(msg: impl Into<String>, data: T) -> Self {
        Self {
            msg: msg.into(),
            code: StatusCode::OK.as_u16(),
            status: Status::Success,
            data: Some(data),
        }
    }

    /// Success envelope with `data: null`
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            code: StatusCode::OK.as_u16(),
            status: Status::Success,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for QueryResult<T> {
    fn into_response(self) -> Response {
        self.into_envelope().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let result = QueryResult::success("ok", json!({"columns": ["a"]}));
        let json = serde_json::to_value(result.into_envelope()).unwrap();
        assert_eq!(json["code"], 200);
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["columns"][0], "a");
    }

    #[test]
    fn test_failure_envelope() {
        let result: QueryResult<()> =
            QueryResult::failure(ErrorKind::InvalidPredicateSyntax, "bad predicate");
        assert_eq!(result.code(), 400);
        let json = serde_json::to_value(result.into_envelope()).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["msg"], "bad predicate");
        assert_eq!(json["data"]["error"], "INVALID_PREDICATE_SYNTAX");
    }

    #[test]
    fn test_cancelled_is_partial_content() {
        let result = QueryResult::cancelled("partial", 3);
        assert_eq!(result.code(), 206);
        assert_eq!(result.data(), Some(&3));
        assert!(!result.is_success());
    }

    #[test]
    fn test_message_envelope_has_null_data() {
        let envelope: Envelope<()> = Envelope::message("welcome");
        let json = serde_json::to_value(envelope).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["code"], 200);
    }

    #[test]
    fn test_error_classification() {
        let err = DatasetError::SourceUnreadable {
            path: "x".into(),
            reason: "gone".into(),
        };
        let result: QueryResult<()> = QueryResult::from_error(&err);
        assert_eq!(result.error_kind(), Some(ErrorKind::SourceUnreadable));
        assert_eq!(result.code(), 500);
    }
}
