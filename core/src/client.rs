//! Dispatch facade: build, send, validate, decode.
//!
//! # Design
//! `ApiClient` holds a transport, a decoder and the default headers; it
//! carries no mutable state between calls, so one client can serve any
//! number of concurrent requests. Each call builds a fresh request, hands it
//! to the transport, validates the outcome and decodes the body. Every
//! failure comes back through the returned `Result`, exactly once.
//!
//! Hosts that perform IO themselves can call [`crate::build_request`] and
//! [`crate::validate`] directly instead.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::builder::build_request_with_defaults;
use crate::decode::{JsonDecoder, PayloadDecoder};
use crate::endpoint::Endpoint;
use crate::error::{ApiError, BuildError};
use crate::http::{merge_header_pairs, HttpRequest};
use crate::transport::Transport;
use crate::validate::validate;

pub const USER_AGENT: &str = "User-Agent";

/// Client-wide request defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Headers applied to every request before the endpoint's own.
    pub default_headers: BTreeMap<String, String>,
    /// Sent as `User-Agent` unless a header overrides it.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_headers: BTreeMap::new(),
            user_agent: Some(format!("endpoint-core/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl ClientConfig {
    /// The user agent first, then `default_headers` merged over it, so any
    /// spelling of `User-Agent` in `default_headers` wins.
    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if let Some(user_agent) = &self.user_agent {
            headers.push((USER_AGENT.to_string(), user_agent.clone()));
        }
        merge_header_pairs(&mut headers, &self.default_headers);
        headers
    }
}

/// Asynchronous client dispatching endpoints over a [`Transport`].
#[derive(Debug, Clone)]
pub struct ApiClient<T, D = JsonDecoder> {
    transport: T,
    decoder: D,
    default_headers: Vec<(String, String)>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            decoder: JsonDecoder,
            default_headers: config.headers(),
        }
    }
}

impl<T: Transport, D: PayloadDecoder> ApiClient<T, D> {
    /// Replace the payload decoder.
    pub fn with_decoder<D2: PayloadDecoder>(self, decoder: D2) -> ApiClient<T, D2> {
        ApiClient {
            transport: self.transport,
            decoder,
            default_headers: self.default_headers,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request this client would send for `endpoint`.
    pub fn build<E>(&self, endpoint: &E) -> Result<HttpRequest, BuildError>
    where
        E: Endpoint + ?Sized,
    {
        build_request_with_defaults(endpoint, &self.default_headers)
    }

    /// Dispatch `endpoint` and return the validated response body.
    pub async fn request_data<E>(&self, endpoint: &E) -> Result<Bytes, ApiError>
    where
        E: Endpoint + ?Sized,
    {
        let request = self.build(endpoint)?;
        tracing::debug!(method = %request.method, url = %request.url, "dispatching request");

        let outcome = self.transport.send(request).await;
        match &outcome {
            Ok(response) => tracing::debug!(status = ?response.status, "received response"),
            Err(err) => tracing::debug!(error = %err, "transport failed"),
        }

        validate(outcome)
    }

    /// Dispatch `endpoint` and decode the response body into `R`.
    pub async fn request_decodable<R, E>(&self, endpoint: &E) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        E: Endpoint + ?Sized,
    {
        let bytes = self.request_data(endpoint).await?;
        self.decoder
            .decode(&bytes)
            .map_err(|e| ApiError::Decode(Box::new(e)))
    }
}
