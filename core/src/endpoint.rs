//! Declarative endpoint descriptions.
//!
//! # Design
//! [`Endpoint`] is the capability any request source implements: a handful
//! of required members plus defaults for the optional ones. Routers are
//! usually enums whose variants compute their path and parameters, so the
//! accessors return owned or `Cow` values rather than borrowing fields.
//!
//! [`EndpointDescriptor`] is a ready-made value implementing the trait, for
//! callers that do not want a type per API.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::http::HttpMethod;

/// Timeout applied when an endpoint does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How URL-encoded parameters are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlEncoding {
    /// Form-encoded request body.
    Standard,
    /// Appended to the URL query string.
    Query,
}

/// Supported parameter encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterEncoding {
    Json,
    PropertyList,
    Url(UrlEncoding),
}

/// Description of one logical HTTP call.
pub trait Endpoint {
    /// Absolute base URL of the service.
    fn base_url(&self) -> &str;

    fn method(&self) -> HttpMethod;

    /// Path of the resource. Replaces any path carried by the base URL.
    fn path(&self) -> Cow<'_, str>;

    fn parameter_encoding(&self) -> ParameterEncoding;

    /// Keyed query parameters.
    fn query_params(&self) -> Option<BTreeMap<String, String>> {
        None
    }

    /// Query parameters sharing one key (`tag=a&tag=b`).
    ///
    /// Only the first key is used. When present and non-empty these replace
    /// [`Endpoint::query_params`].
    fn query_params_repeated(&self) -> Option<BTreeMap<String, Vec<String>>> {
        None
    }

    fn body_parameters(&self) -> Option<Map<String, Value>> {
        None
    }

    fn body_encoding(&self) -> ParameterEncoding {
        self.parameter_encoding()
    }

    fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    fn headers(&self) -> Option<BTreeMap<String, String>> {
        None
    }
}

/// An [`Endpoint`] held as plain data.
///
/// ```
/// use endpoint_core::{EndpointDescriptor, HttpMethod};
///
/// let endpoint = EndpointDescriptor::new("https://api.example.com", HttpMethod::Get, "/users")
///     .with_query_param("id", "42")
///     .with_header("X-Token", "abc");
/// # let _ = endpoint;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    base_url: String,
    method: HttpMethod,
    path: String,
    query_params: Option<BTreeMap<String, String>>,
    query_params_repeated: Option<BTreeMap<String, Vec<String>>>,
    parameter_encoding: ParameterEncoding,
    body_parameters: Option<Map<String, Value>>,
    body_encoding: Option<ParameterEncoding>,
    timeout: Duration,
    headers: Option<BTreeMap<String, String>>,
}

impl EndpointDescriptor {
    /// New descriptor with JSON parameter encoding and the default timeout.
    pub fn new(base_url: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            method,
            path: path.into(),
            query_params: None,
            query_params_repeated: None,
            parameter_encoding: ParameterEncoding::Json,
            body_parameters: None,
            body_encoding: None,
            timeout: DEFAULT_TIMEOUT,
            headers: None,
        }
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_query_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.query_params = Some(params);
        self
    }

    /// Set the repeated-key query parameter. Replaces any earlier one.
    pub fn with_repeated_query_param<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.query_params_repeated = Some(BTreeMap::from([(key.into(), values)]));
        self
    }

    pub fn with_parameter_encoding(mut self, encoding: ParameterEncoding) -> Self {
        self.parameter_encoding = encoding;
        self
    }

    pub fn with_body_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body_parameters
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_body_parameters(mut self, params: Map<String, Value>) -> Self {
        self.body_parameters = Some(params);
        self
    }

    pub fn with_body_encoding(mut self, encoding: ParameterEncoding) -> Self {
        self.body_encoding = Some(encoding);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }
}

impl Endpoint for EndpointDescriptor {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method(&self) -> HttpMethod {
        self.method
    }

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.path)
    }

    fn parameter_encoding(&self) -> ParameterEncoding {
        self.parameter_encoding
    }

    fn query_params(&self) -> Option<BTreeMap<String, String>> {
        self.query_params.clone()
    }

    fn query_params_repeated(&self) -> Option<BTreeMap<String, Vec<String>>> {
        self.query_params_repeated.clone()
    }

    fn body_parameters(&self) -> Option<Map<String, Value>> {
        self.body_parameters.clone()
    }

    fn body_encoding(&self) -> ParameterEncoding {
        self.body_encoding.unwrap_or(self.parameter_encoding)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn headers(&self) -> Option<BTreeMap<String, String>> {
        self.headers.clone()
    }
}
