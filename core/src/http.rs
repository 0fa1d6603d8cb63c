//! HTTP transport types exchanged with the transport collaborator.
//!
//! # Design
//! `HttpRequest` is the transport-ready form of an endpoint: an absolute URL
//! with its query applied, the method, merged headers, the per-request
//! timeout and an optional encoded body. `HttpResponse` is the raw outcome a
//! transport hands back, before any status interpretation.
//!
//! Header names are compared case-insensitively everywhere; the first
//! spelling seen for a name is the one kept.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use url::Url;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Uppercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport-ready request.
///
/// Produced by [`crate::build_request`]. Owned by a single dispatch and never
/// reused across calls.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: Url, timeout: Duration) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            timeout,
            body: None,
        }
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Merge `headers` into this request, returning the updated request.
    ///
    /// A name not yet present is added; a name already present (from an
    /// earlier source or an earlier entry) has its value overwritten, so every
    /// name ends up present exactly once.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.merge_headers(headers);
        self
    }

    pub(crate) fn merge_headers<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        merge_header_pairs(&mut self.headers, headers);
    }
}

/// Merge `incoming` into `headers`: add unseen names, overwrite the value of
/// names already present (case-insensitive).
pub(crate) fn merge_header_pairs<I, K, V>(headers: &mut Vec<(String, String)>, incoming: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (name, value) in incoming {
        let (name, value) = (name.as_ref(), value.as_ref());
        match headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => {
                tracing::trace!(header = name, "overwriting header");
                slot.1 = value.to_string();
            }
            None => headers.push((name.to_string(), value.to_string())),
        }
    }
}

/// A raw response as reported by a transport.
///
/// `status` is `None` when the transport could not obtain one from the
/// response envelope. `body` is `None` only when the transport produced no
/// byte buffer at all; an empty body is `Some(Bytes::new())`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpResponse {
    pub status: Option<u16>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status: Some(status),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn request() -> HttpRequest {
        HttpRequest::new(
            HttpMethod::Get,
            Url::parse("https://api.example.com/items").unwrap(),
            Duration::from_secs(30),
        )
    }

    #[test]
    fn method_wire_names_are_uppercase() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn headers_are_added_once() {
        let headers = BTreeMap::from([("X-Token".to_string(), "abc".to_string())]);
        let req = request().with_headers(&headers);
        assert_eq!(req.headers, vec![("X-Token".to_string(), "abc".to_string())]);
    }

    #[test]
    fn reapplying_headers_does_not_duplicate() {
        let headers = BTreeMap::from([
            ("X-Token".to_string(), "abc".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ]);
        let req = request().with_headers(&headers).with_headers(&headers);
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.header("x-token"), Some("abc"));
    }

    #[test]
    fn later_source_overwrites_case_insensitively() {
        let req = request()
            .with_headers([("User-Agent", "default/1.0")])
            .with_headers([("user-agent", "custom/2.0")]);
        assert_eq!(req.headers, vec![("User-Agent".to_string(), "custom/2.0".to_string())]);
    }

    #[test]
    fn missing_header_lookup_returns_none() {
        assert!(request().header("Authorization").is_none());
    }

    #[test]
    fn response_new_keeps_empty_body() {
        let response = HttpResponse::new(204, Bytes::new());
        assert_eq!(response.status, Some(204));
        assert_eq!(response.body.as_deref(), Some(&b""[..]));
    }
}
