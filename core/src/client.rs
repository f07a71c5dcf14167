//! Request builder/response parser for the bit.ly API, and the dispatcher
//! that runs a full call through an injected transport.
//!
//! # Design
//! `BitlyClient` holds only the endpoint and credentials and carries no
//! mutable state between calls. `build_request` validates parameters and
//! produces an `HttpRequest`; `parse_response` turns the matching
//! `HttpResponse` into a `CanonicalResult`. Hosts that want to do their own
//! I/O use those two directly. `Bitly` pairs a client with an `HttpTransport`
//! and exposes one method per operation.

use crate::error::BitlyError;
use crate::http::{self, HttpResponse, HttpTransport};
use crate::normalize;
use crate::registry::{self, Operation};
use crate::request::{self, Overrides, PreparedRequest, DEFAULT_ENDPOINT};
use crate::types::{CanonicalResult, Credentials, Target};
use crate::validate::{self, CallParams};

/// Stateless request builder and response parser.
#[derive(Debug, Clone)]
pub struct BitlyClient {
    endpoint: String,
    credentials: Credentials,
}

impl BitlyClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials,
        }
    }

    /// Use another API endpoint; operation paths are appended to it.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = format!("{}/", endpoint.trim_end_matches('/'));
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validate `params` for `operation` and build its request.
    ///
    /// Every parameter error is raised here, before any I/O.
    pub fn build_request(
        &self,
        operation: &str,
        params: &CallParams,
        overrides: &Overrides,
    ) -> Result<PreparedRequest, BitlyError> {
        let spec = registry::lookup(operation)?;
        validate::validate(spec, params)?;
        request::build(&self.endpoint, spec, params, &self.credentials, overrides)
    }

    pub fn parse_response(
        &self,
        prepared: &PreparedRequest,
        response: HttpResponse,
    ) -> Result<CanonicalResult, BitlyError> {
        normalize::normalize(response, prepared.format)
    }
}

/// A client wired to a transport.
#[derive(Debug, Clone)]
pub struct Bitly<T> {
    client: BitlyClient,
    transport: T,
}

impl<T: HttpTransport> Bitly<T> {
    pub fn new(client: BitlyClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &BitlyClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run `operation` end to end. The first failure is returned unchanged;
    /// nothing is retried.
    pub fn call(
        &self,
        operation: &str,
        params: &CallParams,
        overrides: &Overrides,
    ) -> Result<CanonicalResult, BitlyError> {
        let prepared = self.client.build_request(operation, params, overrides)?;
        tracing::debug!(operation = %prepared.operation, "dispatching call");
        let response = http::invoke(&self.transport, &prepared.request)?;
        self.client.parse_response(&prepared, response)
    }

    fn call_op(
        &self,
        operation: Operation,
        params: CallParams,
        overrides: &Overrides,
    ) -> Result<CanonicalResult, BitlyError> {
        self.call(operation.name(), &params, overrides)
    }

    pub fn shorten(&self, long_url: &str, overrides: &Overrides) -> Result<CanonicalResult, BitlyError> {
        self.call_op(Operation::Shorten, params([("longUrl", long_url)]), overrides)
    }

    pub fn expand(&self, target: &Target, overrides: &Overrides) -> Result<CanonicalResult, BitlyError> {
        self.call_op(Operation::Expand, params([target.param()]), overrides)
    }

    /// `keys` restricts the returned fields, e.g. `"hash,htmlTitle"`.
    pub fn info(
        &self,
        target: &Target,
        keys: Option<&str>,
        overrides: &Overrides,
    ) -> Result<CanonicalResult, BitlyError> {
        let mut p = params([target.param()]);
        if let Some(keys) = keys {
            p.insert("keys".to_string(), keys.to_string());
        }
        self.call_op(Operation::Info, p, overrides)
    }

    pub fn stats(&self, target: &Target, overrides: &Overrides) -> Result<CanonicalResult, BitlyError> {
        self.call_op(Operation::Stats, params([target.param()]), overrides)
    }

    pub fn errors(&self, overrides: &Overrides) -> Result<CanonicalResult, BitlyError> {
        self.call_op(Operation::Errors, CallParams::new(), overrides)
    }
}

fn params<'a, const N: usize>(pairs: [(&'a str, &'a str); N]) -> CallParams {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest};
    use crate::registry::Format;
    use crate::value::Value;

    /// Replays one body and records every request it receives.
    struct Recorder {
        body: String,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Recorder {
        fn new(body: impl Into<String>) -> Self {
            Self {
                body: body.into(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl HttpTransport for Recorder {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    fn client() -> BitlyClient {
        BitlyClient::new(Credentials::new("testLogin", "testApiKey").unwrap())
    }

    #[test]
    fn shorten_returns_results_and_status() {
        let body = json!({
            "errorCode": 0,
            "errorMessage": "",
            "statusCode": "OK",
            "results": {
                "http://foo.bar/long/url.html": {
                    "hash": "ayQ9ef",
                    "shortCNAMEUrl": "http://bit.ly/8ZYEGc",
                    "shortKeywordUrl": "",
                    "shortUrl": "http://bit.ly/8ZYEGc",
                    "userHash": "8ZYEGc"
                }
            }
        });
        let bitly = Bitly::new(client(), Recorder::new(body.to_string()));
        let result = bitly
            .shorten("http://foo.bar/long/url.html", &Overrides::default())
            .unwrap();
        assert_eq!(result.code, 200);
        assert_eq!(
            result.result.pointer(["http://foo.bar/long/url.html", "hash"]),
            Some(&Value::from("ayQ9ef"))
        );

        let seen = bitly.transport.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "http://api.bit.ly/shorten");
        assert_eq!(seen[0].query_param("version"), Some("2.0.1"));
    }

    #[test]
    fn parameter_errors_never_reach_the_transport() {
        let bitly = Bitly::new(client(), Recorder::new("{}"));
        let err = bitly.call("shorten", &CallParams::new(), &Overrides::default()).unwrap_err();
        assert!(matches!(
            err,
            BitlyError::MissingRequiredParam { ref param, ref operation }
                if param == "longUrl" && operation == "shorten"
        ));

        let both = params([("hash", "ayQ9ef"), ("shortUrl", "http://bit.ly/8ZYEGc")]);
        let err = bitly.call("expand", &both, &Overrides::default()).unwrap_err();
        assert!(matches!(err, BitlyError::RedundantParam { .. }));

        let err = bitly.call("shrink", &CallParams::new(), &Overrides::default()).unwrap_err();
        assert!(matches!(err, BitlyError::UnknownOperation(_)));

        assert!(bitly.transport.seen.borrow().is_empty());
    }

    #[test]
    fn operation_names_are_case_insensitive() {
        let bitly = Bitly::new(client(), Recorder::new(r#"{"statusCode":"OK","results":[]}"#));
        let result = bitly.call("ERRORS", &CallParams::new(), &Overrides::default()).unwrap();
        assert_eq!(result.result, Value::empty());
    }

    #[test]
    fn unsupported_verb_override_fails_before_sending() {
        let bitly = Bitly::new(client(), Recorder::new("{}"));
        let overrides = Overrides {
            method: Some(HttpMethod::Delete),
            ..Overrides::default()
        };
        let err = bitly
            .expand(&Target::Hash("ayQ9ef".to_string()), &overrides)
            .unwrap_err();
        assert!(matches!(err, BitlyError::UnsupportedVerb(_)));
        assert!(bitly.transport.seen.borrow().is_empty());
    }

    #[test]
    fn info_sends_keys_and_xml_format() {
        let body = "<bitly><errorCode>0</errorCode><errorMessage></errorMessage><results><doc><hash>R8hVH</hash><htmlTitle><![CDATA[CakePHP]]></htmlTitle></doc></results><statusCode>OK</statusCode></bitly>";
        let bitly = Bitly::new(client(), Recorder::new(body));
        let result = bitly
            .info(
                &Target::Hash("R8hVH".to_string()),
                Some("hash,htmlTitle"),
                &Overrides::format(Format::Xml),
            )
            .unwrap();
        assert_eq!(
            result.result.pointer(["R8hVH", "htmlTitle"]),
            Some(&Value::from("CakePHP"))
        );

        let seen = bitly.transport.seen.borrow();
        assert_eq!(seen[0].query_param("keys"), Some("hash,htmlTitle"));
        assert_eq!(seen[0].query_param("format"), Some("xml"));
    }

    #[test]
    fn endpoint_gets_a_single_trailing_slash() {
        let client = client().with_endpoint("http://localhost:3000//");
        assert_eq!(client.endpoint(), "http://localhost:3000/");
        let prepared = client
            .build_request("errors", &CallParams::new(), &Overrides::default())
            .unwrap();
        assert_eq!(prepared.request.url, "http://localhost:3000/errors");
    }

    #[test]
    fn build_and_parse_without_transport() {
        let c = client();
        let prepared = c
            .build_request(
                "stats",
                &params([("shortUrl", "http://bit.ly/8ZYEGc")]),
                &Overrides::default(),
            )
            .unwrap();
        assert_eq!(prepared.operation, Operation::Stats);
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"statusCode":"OK","results":{"clicks":6,"hash":"8ZYEGc"}}"#.to_string(),
        };
        let result = c.parse_response(&prepared, response).unwrap();
        assert_eq!(result.result.get("clicks"), Some(&Value::from("6")));
    }
}
