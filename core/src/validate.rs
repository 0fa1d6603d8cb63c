//! Classifies a raw transport outcome into success bytes or a typed failure.

use std::ops::RangeInclusive;

use bytes::Bytes;

use crate::error::{ApiError, HttpError, TransportError};
use crate::http::HttpResponse;

/// Three-digit codes, the range `http::StatusCode` accepts.
const VALID_STATUS: RangeInclusive<u16> = 100..=999;

/// Validate a transport outcome.
///
/// Rules apply in order: a transport error is returned as-is; a missing or
/// out-of-range status is a malformed response; `200..400` succeeds with
/// the body (possibly empty); any other status is classified into an
/// [`HttpError`] carrying the body.
pub fn validate(outcome: Result<HttpResponse, TransportError>) -> Result<Bytes, ApiError> {
    let response = outcome?;

    let status = match response.status {
        Some(status) if VALID_STATUS.contains(&status) => status,
        other => return Err(ApiError::MalformedResponse { status: other }),
    };

    if (200..400).contains(&status) {
        return response.body.ok_or(ApiError::MissingBody);
    }

    Err(HttpError::classify(status, response.body).into())
}
