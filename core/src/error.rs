//! Error types for request building and dispatch.
//!
//! # Design
//! Failures are flat and reach the caller through one channel, [`ApiError`].
//! HTTP status failures are kept apart from transport failures: a status
//! error always carries the raw response bytes so the caller can parse a
//! server-provided error payload, while a transport error never has a status.

use std::error::Error as StdError;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::endpoint::ParameterEncoding;

/// The closed set of HTTP status failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpErrorKind {
    BadGateway,
    BadRequest,
    Conflict,
    Forbidden,
    InternalServerError,
    NotAllowed,
    NotFound,
    Unauthorized,
    /// Any other status outside `200..400`.
    Unspecific,
}

impl HttpErrorKind {
    /// Map a non-success status code to its kind.
    ///
    /// Total over `u16`; callers only pass codes outside `200..400`.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => HttpErrorKind::BadRequest,
            401 => HttpErrorKind::Unauthorized,
            403 => HttpErrorKind::Forbidden,
            404 => HttpErrorKind::NotFound,
            405 => HttpErrorKind::NotAllowed,
            409 => HttpErrorKind::Conflict,
            500 => HttpErrorKind::InternalServerError,
            502 => HttpErrorKind::BadGateway,
            _ => HttpErrorKind::Unspecific,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HttpErrorKind::BadRequest
                | HttpErrorKind::Unauthorized
                | HttpErrorKind::Forbidden
                | HttpErrorKind::NotFound
                | HttpErrorKind::NotAllowed
                | HttpErrorKind::Conflict
        )
    }

    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            HttpErrorKind::InternalServerError | HttpErrorKind::BadGateway
        )
    }
}

impl fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpErrorKind::BadGateway => "bad gateway",
            HttpErrorKind::BadRequest => "bad request",
            HttpErrorKind::Conflict => "conflict",
            HttpErrorKind::Forbidden => "forbidden",
            HttpErrorKind::InternalServerError => "internal server error",
            HttpErrorKind::NotAllowed => "method not allowed",
            HttpErrorKind::NotFound => "not found",
            HttpErrorKind::Unauthorized => "unauthorized",
            HttpErrorKind::Unspecific => "unexpected status",
        };
        f.write_str(name)
    }
}

/// A response whose status fell outside `200..400`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (HTTP {status})")]
pub struct HttpError {
    pub kind: HttpErrorKind,
    pub status: u16,
    /// Raw response body, if the transport returned one.
    pub body: Option<Bytes>,
}

impl HttpError {
    pub fn classify(status: u16, body: Option<Bytes>) -> Self {
        Self {
            kind: HttpErrorKind::from_status(status),
            status,
            body,
        }
    }

    /// Raw response bytes for diagnostics.
    pub fn data(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Body parameters could not be encoded.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to encode JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported body encoding: {0:?}")]
    Unsupported(ParameterEncoding),
}

/// An endpoint could not be turned into a request.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The base URL parses but cannot carry a path (`mailto:`, `data:`).
    #[error("base URL '{0}' cannot carry a path")]
    NotABaseUrl(String),

    /// A header name or value HTTP does not allow.
    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl BuildError {
    pub fn is_invalid_url(&self) -> bool {
        matches!(
            self,
            BuildError::InvalidBaseUrl { .. } | BuildError::NotABaseUrl(_)
        )
    }
}

/// Failure below the HTTP status layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("transport error: {0}")]
    Other(#[source] Box<dyn StdError + Send + Sync>),
}

/// Every failure a dispatch can complete with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The endpoint could not be built; no transport call was made.
    #[error("invalid request: {0}")]
    Build(#[from] BuildError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response envelope carried no interpretable status.
    #[error("malformed response (status {status:?})")]
    MalformedResponse { status: Option<u16> },

    /// Successful status but the transport returned no byte buffer.
    #[error("response carried no body")]
    MissingBody,

    #[error(transparent)]
    Http(#[from] HttpError),

    /// The body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),
}

impl ApiError {
    pub fn is_invalid_url(&self) -> bool {
        matches!(self, ApiError::Build(e) if e.is_invalid_url())
    }

    /// The taxonomy kind, for HTTP status failures.
    pub fn http_kind(&self) -> Option<HttpErrorKind> {
        match self {
            ApiError::Http(e) => Some(e.kind),
            _ => None,
        }
    }
}
