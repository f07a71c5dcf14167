//! Request assembly: format/verb resolution and query construction.

use std::collections::BTreeMap;

use crate::error::BitlyError;
use crate::http::{HttpMethod, HttpRequest};
use crate::registry::{Format, Operation, OperationSpec};
use crate::types::Credentials;
use crate::validate::CallParams;

/// API version sent with every request.
pub const API_VERSION: &str = "2.0.1";

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://api.bit.ly/";

/// Per-call overrides of the operation's declared defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub format: Option<Format>,
    pub method: Option<HttpMethod>,
}

impl Overrides {
    pub fn format(format: Format) -> Self {
        Self {
            format: Some(format),
            ..Self::default()
        }
    }
}

/// A request ready to hand to a transport, plus what is needed to parse its
/// response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub operation: Operation,
    pub format: Format,
    pub request: HttpRequest,
}

/// An explicit override wins; otherwise the first allowed value is the
/// default.
fn select_best<T: Copy>(
    requested: Option<T>,
    allowed: &[T],
    axis: &'static str,
    operation: Operation,
) -> Result<T, BitlyError> {
    requested
        .or_else(|| allowed.first().copied())
        .ok_or_else(|| BitlyError::InvalidAxis {
            axis,
            operation: operation.name().to_string(),
        })
}

/// Build the request for already validated `params`.
pub fn build(
    endpoint: &str,
    spec: &OperationSpec,
    params: &CallParams,
    credentials: &Credentials,
    overrides: &Overrides,
) -> Result<PreparedRequest, BitlyError> {
    let method = select_best(overrides.method, spec.methods, "method", spec.operation)?;
    let format = select_best(overrides.format, spec.formats, "format", spec.operation)?;

    let mut query: BTreeMap<String, String> = params
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    query.insert("format".to_string(), format.as_str().to_string());
    query.insert("login".to_string(), credentials.login.clone());
    query.insert("apiKey".to_string(), credentials.api_key.clone());
    query.insert("version".to_string(), API_VERSION.to_string());

    let request = HttpRequest {
        method,
        url: format!("{endpoint}{}", spec.path),
        query: query.into_iter().collect(),
    };
    tracing::debug!(
        operation = %spec.operation,
        %format,
        %method,
        url = %request.url,
        "built request"
    );

    Ok(PreparedRequest {
        operation: spec.operation,
        format,
        request,
    })
}
