//! The transport collaborator.
//!
//! A transport issues one [`HttpRequest`] and reports either a transport
//! failure or the raw response. It owns connection reuse, TLS and
//! redirects; it must honour [`HttpRequest::timeout`] and surface an
//! elapsed timeout as [`TransportError::Timeout`].

use std::future::Future;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

#[cfg(feature = "reqwest-transport")]
mod reqwest_transport;
#[cfg(feature = "reqwest-transport")]
pub use reqwest_transport::ReqwestTransport;

/// Pluggable HTTP transport.
///
/// Implementations may use `async fn` directly.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).send(request)
    }
}
