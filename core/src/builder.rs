//! Turns an [`Endpoint`] into a transport-ready [`HttpRequest`].
//!
//! # Design
//! Building is a pure function of the endpoint (and, for the client, its
//! default headers). Either a complete request comes back or a
//! [`BuildError`]; no partial URL is ever produced.
//!
//! The effective path is always the endpoint's path: any path on the base
//! URL is replaced, not prefixed. The path goes through URL path parsing, so
//! `.` and `..` segments are resolved (`/a/../b` becomes `/b`) and `?`/`#`
//! are percent-escaped. Query pairs from `query_params` replace the base
//! URL's query, and a repeated-key parameter replaces both.

use url::Url;

use crate::encoding::{encode_body, EncodedBody, CONTENT_TYPE};
use crate::endpoint::Endpoint;
use crate::error::BuildError;
use crate::http::HttpRequest;

/// Build a request from `endpoint` alone.
pub fn build_request<E>(endpoint: &E) -> Result<HttpRequest, BuildError>
where
    E: Endpoint + ?Sized,
{
    build_request_with_defaults(endpoint, &[])
}

/// Build a request, applying `defaults` before the endpoint's own headers.
///
/// Endpoint headers overwrite defaults of the same (case-insensitive) name.
/// Every resulting header must be a legal HTTP name and value.
pub fn build_request_with_defaults<E>(
    endpoint: &E,
    defaults: &[(String, String)],
) -> Result<HttpRequest, BuildError>
where
    E: Endpoint + ?Sized,
{
    let base = endpoint.base_url();
    let mut url = Url::parse(base).map_err(|source| BuildError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(BuildError::NotABaseUrl(base.to_string()));
    }

    url.set_path(&endpoint.path());

    if let Some(pairs) = query_pairs(endpoint) {
        set_query(&mut url, &pairs);
    }

    let encoded = endpoint
        .body_parameters()
        .map(|params| encode_body(&params, endpoint.body_encoding()))
        .transpose()?;

    let body = match encoded {
        Some(EncodedBody::Query(pairs)) => {
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
            None
        }
        Some(EncodedBody::Body {
            content_type,
            bytes,
        }) => Some((content_type, bytes)),
        None => None,
    };

    let mut request = HttpRequest::new(endpoint.method(), url, endpoint.timeout());
    request.merge_headers(defaults.iter().map(|(name, value)| (name, value)));
    if let Some(headers) = endpoint.headers() {
        request.merge_headers(&headers);
    }
    check_headers(&request.headers)?;

    if let Some((content_type, bytes)) = body {
        if request.header(CONTENT_TYPE).is_none() {
            request.headers.push((CONTENT_TYPE.to_string(), content_type.to_string()));
        }
        request.body = Some(bytes);
    }

    Ok(request)
}

/// Resolve the query pairs the endpoint asks for, if it asks for any.
fn query_pairs<E>(endpoint: &E) -> Option<Vec<(String, String)>>
where
    E: Endpoint + ?Sized,
{
    let mut pairs: Option<Vec<(String, String)>> =
        endpoint.query_params().map(|params| params.into_iter().collect());

    let repeated = endpoint.query_params_repeated().unwrap_or_default();
    if repeated.len() > 1 {
        tracing::warn!(
            keys = repeated.len(),
            "repeated query parameters carry more than one key; only the first is used"
        );
    }
    if let Some((key, values)) = repeated.into_iter().next() {
        if pairs.is_some() {
            tracing::debug!(key = %key, "repeated query parameter replaces keyed parameters");
        }
        pairs = Some(values.into_iter().map(|value| (key.clone(), value)).collect());
    }

    pairs
}

fn check_headers(headers: &[(String, String)]) -> Result<(), BuildError> {
    for (name, value) in headers {
        let valid = ::http::HeaderName::from_bytes(name.as_bytes()).is_ok()
            && ::http::HeaderValue::from_str(value).is_ok();
        if !valid {
            return Err(BuildError::InvalidHeader { name: name.clone() });
        }
    }
    Ok(())
}

fn set_query(url: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
}
