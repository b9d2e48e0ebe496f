//! Request extractors that reject malformed input with the error envelope
//! before a handler runs.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use tracing::debug;

use mascotas_core::{DomainError, Page};

use crate::app::errors::{ApiError, ErrorKind};

/// A single typed identifier bound from the route's path parameter.
///
/// Anything that does not parse as a positive identifier is `invalid_id`.
#[derive(Debug, Clone, Copy)]
pub struct PathId<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: core::str::FromStr<Err = DomainError> + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                debug!(error = %e, "path parameter rejected");
                ApiError::new(ErrorKind::InvalidId, "ID inválido")
            })?;
        raw.parse::<T>().map(PathId).map_err(ApiError::from)
    }
}

/// JSON request body. Decoding failures become `invalid_json`.
///
/// The `Content-Type` header is not inspected. A literal `null` decodes as the
/// empty payload so field validation reports what is missing.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!(error = %e, "failed to read request body");
            ApiError::invalid_json()
        })?;
        serde_json::from_slice::<Option<T>>(&bytes)
            .map(|body| JsonBody(body.unwrap_or_default()))
            .map_err(|e| {
                debug!(error = %e, "request body is not valid JSON for this endpoint");
                ApiError::invalid_json()
            })
    }
}

/// First value of `key` in decoded query pairs.
fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Validated `?limit=&offset=` query parameters.
///
/// A repeated key keeps its first value.
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub Page);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                debug!(error = %e, "query string rejected");
                ApiError::from(DomainError::invalid_limit("limit debe ser 1..200"))
            })?;
        Page::parse(first(&pairs, "limit"), first(&pairs, "offset"))
            .map(Pagination)
            .map_err(ApiError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let query = pairs(&[("offset", "1"), ("limit", "5"), ("offset", "2"), ("limit", "6")]);
        assert_eq!(first(&query, "offset"), Some("1"));
        assert_eq!(first(&query, "limit"), Some("5"));
        assert_eq!(first(&query, "missing"), None);
    }
}
