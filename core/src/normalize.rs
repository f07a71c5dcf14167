//! Response envelope decoding.
//!
//! Every response carries `errorCode`, `errorMessage`, `statusCode` and, on
//! success, `results`. JSON and XML bodies are both reduced to an `Envelope`
//! before the status check so both formats fail the same way.

use crate::error::{ApiError, BitlyError};
use crate::http::HttpResponse;
use crate::registry::Format;
use crate::types::CanonicalResult;
use crate::value::Value;
use crate::xml;

#[derive(Debug)]
struct Envelope {
    status_code: Option<String>,
    error_message: String,
    error_code: i64,
    results: Value,
}

/// Decode `response` as `format` and unwrap its `results`.
///
/// A `statusCode` other than `"OK"` becomes `BitlyError::Api`; a missing
/// `statusCode` is treated as success.
pub fn normalize(response: HttpResponse, format: Format) -> Result<CanonicalResult, BitlyError> {
    let envelope = match format {
        Format::Json => json_envelope(&response.body)?,
        Format::Xml => xml_envelope(&response.body)?,
    };

    match envelope.status_code {
        Some(status) if status != "OK" => {
            tracing::warn!(
                status = %status,
                code = envelope.error_code,
                message = %envelope.error_message,
                "service rejected the request"
            );
            Err(ApiError {
                status_code: status,
                message: envelope.error_message,
                code: envelope.error_code,
            }
            .into())
        }
        _ => Ok(CanonicalResult {
            result: envelope.results,
            code: response.status,
        }),
    }
}

fn json_envelope(body: &str) -> Result<Envelope, BitlyError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| BitlyError::Decode(e.to_string()))?;
    let serde_json::Value::Object(mut map) = json else {
        return Err(BitlyError::Decode("expected a JSON object envelope".to_string()));
    };

    let text = |v: serde_json::Value| match v {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };

    Ok(Envelope {
        status_code: map
            .remove("statusCode")
            .filter(|v| !v.is_null())
            .map(text),
        error_message: map.remove("errorMessage").map(text).unwrap_or_default(),
        error_code: map.remove("errorCode").map(text).map(|c| parse_code(&c)).unwrap_or(0),
        results: map.remove("results").map(Value::from).unwrap_or_else(Value::empty),
    })
}

fn xml_envelope(body: &str) -> Result<Envelope, BitlyError> {
    // The `bitly` root wraps the envelope; its fields are read off whatever
    // the root element is.
    let root = xml::parse(body)?;
    Ok(Envelope {
        status_code: root.child("statusCode").map(|e| e.content()),
        error_message: root
            .child("errorMessage")
            .map(|e| e.content())
            .unwrap_or_default(),
        error_code: root
            .child("errorCode")
            .map(|e| parse_code(&e.content()))
            .unwrap_or(0),
        results: root.child("results").map(xml::rectify).unwrap_or_else(Value::empty),
    })
}

fn parse_code(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}
