//! Client adapter for the bit.ly REST API (version 2.0.1).
//!
//! # Overview
//! Translates the five operations (`shorten`, `expand`, `info`, `stats`,
//! `errors`) into HTTP requests, validates their parameters up front, and
//! normalizes JSON and XML responses into one canonical `Value` shape.
//!
//! # Design
//! - The operation table in `registry` is static and never mutated.
//! - `BitlyClient` splits each call into `build_request` and
//!   `parse_response` so the I/O boundary stays explicit (host-does-IO).
//! - `Bitly` wires a client to an injected `HttpTransport` and runs
//!   lookup, validation, request building, transport and normalization in
//!   sequence, propagating the first failure unchanged.
//! - Nothing is cached or retried; each call owns its parameters.

pub mod client;
pub mod error;
pub mod hash;
pub mod http;
pub mod normalize;
pub mod registry;
pub mod request;
pub mod types;
pub mod validate;
pub mod value;
pub mod xml;

pub use client::{Bitly, BitlyClient};
pub use error::{ApiError, BitlyError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use registry::{Format, Operation, OperationSpec, ParamRule};
pub use request::{Overrides, PreparedRequest, API_VERSION, DEFAULT_ENDPOINT};
pub use types::{CanonicalResult, Credentials, Target};
pub use validate::CallParams;
pub use value::Value;
