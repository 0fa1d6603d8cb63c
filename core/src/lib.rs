//! Declarative HTTP endpoints with typed response classification.
//!
//! # Overview
//! An [`Endpoint`] describes one logical call (base URL, path, method,
//! query, headers, body parameters, timeout). [`build_request`] turns it
//! into a transport-ready [`HttpRequest`]; a [`Transport`] sends it;
//! [`validate`] classifies the outcome into body bytes or an [`ApiError`];
//! a [`PayloadDecoder`] turns the bytes into the caller's type.
//! [`ApiClient`] runs the whole pipeline behind one async call.
//!
//! # Design
//! - Building and validation are pure and IO-free, so a host can do the
//!   network round-trip itself and still reuse both halves.
//! - Status failures map onto a closed [`HttpErrorKind`] set and always keep
//!   the raw response body.
//! - No retries, pooling or streaming; the transport owns all of that.

pub mod builder;
pub mod client;
pub mod decode;
pub mod encoding;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod transport;
pub mod validate;

pub use builder::{build_request, build_request_with_defaults};
pub use client::{ApiClient, ClientConfig};
pub use decode::{JsonDecoder, PayloadDecoder};
pub use endpoint::{Endpoint, EndpointDescriptor, ParameterEncoding, UrlEncoding, DEFAULT_TIMEOUT};
pub use error::{ApiError, BuildError, EncodeError, HttpError, HttpErrorKind, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
#[cfg(feature = "reqwest-transport")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
pub use validate::validate;
