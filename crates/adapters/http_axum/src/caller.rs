//! Caller identity extractors.
//!
//! Bearer tokens are validated upstream; the proxy forwards the caller's
//! public id in [`CALLER_HEADER`].

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use locpack_domain::id::PublicId;

use crate::error::ApiError;

/// Header carrying the authenticated caller's public id.
pub const CALLER_HEADER: &str = "x-user-id";

/// Read the caller's public id. Missing, blank or non-UTF-8 values mean
/// anonymous.
fn extract_caller(headers: &HeaderMap) -> Option<PublicId> {
    let value = headers.get(CALLER_HEADER)?.to_str().ok()?;
    value.parse().ok()
}

/// An authenticated caller. Rejects the request with 401 when absent.
#[derive(Debug, Clone)]
pub struct Caller(pub PublicId);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_caller(&parts.headers)
            .map(Self)
            .ok_or(ApiError::Unauthenticated)
    }
}

/// A caller that may be anonymous.
#[derive(Debug, Clone)]
pub struct MaybeCaller(pub Option<PublicId>);

impl MaybeCaller {
    /// The caller's public id, `None` when anonymous.
    #[must_use]
    pub fn id(&self) -> Option<&PublicId> {
        self.0.as_ref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeCaller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(extract_caller(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn should_read_caller_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(CALLER_HEADER, HeaderValue::from_static("alice"));
        assert_eq!(extract_caller(&headers).unwrap().as_str(), "alice");
    }

    #[test]
    fn should_treat_missing_or_blank_header_as_anonymous() {
        assert!(extract_caller(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(CALLER_HEADER, HeaderValue::from_static("  "));
        assert!(extract_caller(&headers).is_none());
    }
}
