//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The core builds `HttpRequest`
//! values and parses `HttpResponse` values; the round trip itself belongs to
//! an `HttpTransport` supplied by the caller. Timeouts and connection
//! handling are entirely the transport's business.

use std::fmt;
use std::str::FromStr;

use crate::error::{BitlyError, TransportError};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `"get"`, `"Get"` and `"GET"` all parse.
impl FromStr for HttpMethod {
    type Err = BitlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            _ => Err(BitlyError::UnsupportedVerb(s.to_string())),
        }
    }
}

/// An HTTP request described as plain data.
///
/// `query` is already sorted by key; transports must send the pairs in the
/// given order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of a query parameter, if present.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// The HTTP collaborator that performs the actual network I/O.
///
/// Implementations only need to handle the verbs they report through
/// `supports`; every current operation uses GET.
pub trait HttpTransport {
    fn supports(&self, method: &HttpMethod) -> bool {
        *method == HttpMethod::Get
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn supports(&self, method: &HttpMethod) -> bool {
        (**self).supports(method)
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

/// Issue `request` through `transport`.
///
/// Fails with `UnsupportedVerb` before touching the transport when it cannot
/// handle the request's method. Transport failures surface unchanged.
pub fn invoke<T: HttpTransport + ?Sized>(
    transport: &T,
    request: &HttpRequest,
) -> Result<HttpResponse, BitlyError> {
    if !transport.supports(&request.method) {
        return Err(BitlyError::UnsupportedVerb(request.method.to_string()));
    }
    tracing::debug!(method = %request.method, url = %request.url, "sending request");
    let response = transport.send(request)?;
    tracing::debug!(status = response.status, bytes = response.body.len(), "received response");
    Ok(response)
}
