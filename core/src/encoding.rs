//! Body parameter encoding.

use bytes::Bytes;
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::endpoint::{ParameterEncoding, UrlEncoding};
use crate::error::EncodeError;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Where encoded body parameters end up.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedBody {
    Body {
        content_type: &'static str,
        bytes: Bytes,
    },
    /// Pairs to append to the URL query; the request has no body.
    Query(Vec<(String, String)>),
}

pub fn encode_body(
    params: &Map<String, Value>,
    encoding: ParameterEncoding,
) -> Result<EncodedBody, EncodeError> {
    match encoding {
        ParameterEncoding::Json => Ok(EncodedBody::Body {
            content_type: CONTENT_TYPE_JSON,
            bytes: Bytes::from(serde_json::to_vec(params)?),
        }),
        ParameterEncoding::Url(UrlEncoding::Standard) => {
            let body = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(form_pairs(params))
                .finish();
            Ok(EncodedBody::Body {
                content_type: CONTENT_TYPE_FORM,
                bytes: Bytes::from(body),
            })
        }
        ParameterEncoding::Url(UrlEncoding::Query) => Ok(EncodedBody::Query(form_pairs(params))),
        ParameterEncoding::PropertyList => Err(EncodeError::Unsupported(encoding)),
    }
}

/// Flatten parameters into form pairs. Arrays become repeated keys.
pub fn form_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().map(|item| (key.clone(), form_value(item))));
            }
            other => pairs.push((key.clone(), form_value(other))),
        }
    }
    pairs
}

fn form_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // nested structures are sent as compact JSON text
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
