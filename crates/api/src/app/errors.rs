//! Error taxonomy and the JSON error envelope.
//!
//! Every failure that reaches the HTTP boundary is an [`ApiError`]. Domain and
//! store errors are classified here, once, through the `From` impls.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use mascotas_core::{DomainError, FieldError};
use mascotas_infra::StoreError;

/// Closed set of error kinds exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidJson,
    Validation,
    InvalidDate,
    InvalidDateTime,
    InvalidId,
    InvalidLimit,
    InvalidOffset,
    NotFound,
    MethodNotAllowed,
    Conflict,
    Internal,
    Panic,
}

impl ErrorKind {
    /// Machine-readable code carried in the envelope.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidJson => "invalid_json",
            Self::Validation => "validation_error",
            Self::InvalidDate => "invalid_date",
            Self::InvalidDateTime => "invalid_datetime",
            Self::InvalidId => "invalid_id",
            Self::InvalidLimit => "invalid_limit",
            Self::InvalidOffset => "invalid_offset",
            Self::NotFound => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Conflict => "conflict",
            Self::Internal => "internal_error",
            Self::Panic => "panic",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidJson
            | Self::Validation
            | Self::InvalidDate
            | Self::InvalidDateTime
            | Self::InvalidId
            | Self::InvalidLimit
            | Self::InvalidOffset => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal | Self::Panic => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", kind.code())]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    fields: Vec<FieldError>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldError>) -> Self {
        self.fields = fields;
        self
    }

    pub fn invalid_json() -> Self {
        Self::new(ErrorKind::InvalidJson, "JSON inválido")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(ErrorKind::MethodNotAllowed, "método no permitido")
    }

    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal, "error interno del servidor")
    }

    pub fn panic() -> Self {
        Self::new(ErrorKind::Panic, "error interno del servidor")
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    error: EnvelopeBody<'a>,
}

#[derive(Serialize)]
struct EnvelopeBody<'a> {
    code: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "<[FieldError]>::is_empty")]
    fields: &'a [FieldError],
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = Envelope {
            error: EnvelopeBody {
                code: self.kind.code(),
                message: &self.message,
                fields: &self.fields,
            },
        };
        (self.kind.status(), Json(envelope)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(fields) => {
                Self::new(ErrorKind::Validation, "Datos inválidos").with_fields(fields)
            }
            DomainError::InvalidDate(msg) => Self::new(ErrorKind::InvalidDate, msg),
            DomainError::InvalidDateTime(msg) => Self::new(ErrorKind::InvalidDateTime, msg),
            DomainError::InvalidId(detail) => {
                debug!(%detail, "rejected identifier");
                Self::new(ErrorKind::InvalidId, "ID inválido")
            }
            DomainError::InvalidLimit(msg) => Self::new(ErrorKind::InvalidLimit, msg),
            DomainError::InvalidOffset(msg) => Self::new(ErrorKind::InvalidOffset, msg),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound | StoreError::Database(sqlx::Error::RowNotFound) => {
                Self::not_found("recurso no encontrado")
            }
            StoreError::MissingReference(detail) => {
                debug!(%detail, "write referenced a missing pet");
                Self::not_found("mascota no encontrada")
            }
            StoreError::Conflict(detail) => {
                debug!(%detail, "write conflicted with existing data");
                Self::new(ErrorKind::Conflict, "conflicto con el estado actual del recurso")
            }
            other @ (StoreError::Unavailable(_) | StoreError::Database(_)) => {
                error!(error = %other, "store operation failed");
                Self::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn envelope_omits_empty_fields() {
        let (status, body) = body_json(ApiError::not_found("recurso no encontrado")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            serde_json::json!({"error": {"code": "not_found", "message": "recurso no encontrado"}})
        );
    }

    #[tokio::test]
    async fn validation_errors_carry_fields() {
        let err = ApiError::from(DomainError::validation(vec![FieldError::new(
            "nombre",
            "es obligatorio",
        )]));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["fields"][0]["field"], "nombre");
        assert_eq!(body["error"]["fields"][0]["message"], "es obligatorio");
    }

    #[test]
    fn domain_errors_map_to_their_kinds() {
        let cases = [
            (DomainError::invalid_date("x"), ErrorKind::InvalidDate),
            (DomainError::invalid_datetime("x"), ErrorKind::InvalidDateTime),
            (DomainError::invalid_id("x"), ErrorKind::InvalidId),
            (DomainError::invalid_limit("x"), ErrorKind::InvalidLimit),
            (DomainError::invalid_offset("x"), ErrorKind::InvalidOffset),
        ];
        for (err, kind) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.kind(), kind);
            assert_eq!(api.kind().status(), StatusCode::BAD_REQUEST);
            assert!(api.fields().is_empty());
        }
    }

    #[test]
    fn store_errors_map_to_their_kinds() {
        assert_eq!(ApiError::from(StoreError::NotFound).kind(), ErrorKind::NotFound);
        assert_eq!(
            ApiError::from(StoreError::Database(sqlx::Error::RowNotFound)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ApiError::from(StoreError::MissingReference("fk".into())).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(ApiError::from(StoreError::Conflict("dup".into())).kind(), ErrorKind::Conflict);

        let unavailable = ApiError::from(StoreError::Unavailable("pool closed".into()));
        assert_eq!(unavailable.kind(), ErrorKind::Internal);

        let internal = ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(internal.kind(), ErrorKind::Internal);
        assert_eq!(internal.kind().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!internal.message().contains("pool"));
    }

    #[test]
    fn method_not_allowed_is_a_405() {
        let err = ApiError::method_not_allowed();
        assert_eq!(err.kind().code(), "method_not_allowed");
        assert_eq!(err.kind().status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn panic_kind_is_a_500() {
        let err = ApiError::panic();
        assert_eq!(err.kind().code(), "panic");
        assert_eq!(err.kind().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
