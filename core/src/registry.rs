//! Static table of the supported bit.ly operations.
//!
//! Each `OperationSpec` lists the response formats and HTTP verbs the
//! operation accepts (the first entry of each list is the default), the
//! parameter rules checked before sending, and the path relative to the API
//! endpoint.

use std::fmt;
use std::str::FromStr;

use crate::error::BitlyError;
use crate::http::HttpMethod;

/// Response encoding requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = BitlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            _ => Err(BitlyError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// One of the five remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Shorten,
    Expand,
    Info,
    Stats,
    Errors,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Shorten,
        Operation::Expand,
        Operation::Info,
        Operation::Stats,
        Operation::Errors,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Shorten => "shorten",
            Operation::Expand => "expand",
            Operation::Info => "info",
            Operation::Stats => "stats",
            Operation::Errors => "errors",
        }
    }

    pub fn spec(&self) -> &'static OperationSpec {
        match self {
            Operation::Shorten => &SHORTEN,
            Operation::Expand => &EXPAND,
            Operation::Info => &INFO,
            Operation::Stats => &STATS,
            Operation::Errors => &ERRORS,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = BitlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == lowered)
            .ok_or_else(|| BitlyError::UnknownOperation(s.to_string()))
    }
}

/// How one parameter (or group of alternative names) is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRule {
    Required(&'static str),
    /// Exactly one of the names must be present.
    Switch(&'static [&'static str]),
    Optional(&'static str),
}

#[derive(Debug, PartialEq, Eq)]
pub struct OperationSpec {
    pub operation: Operation,
    pub formats: &'static [Format],
    pub methods: &'static [HttpMethod],
    pub params: &'static [ParamRule],
    pub path: &'static str,
}

const URL_OR_HASH: ParamRule = ParamRule::Switch(&["shortUrl", "hash"]);

static SHORTEN: OperationSpec = OperationSpec {
    operation: Operation::Shorten,
    formats: &[Format::Json, Format::Xml],
    methods: &[HttpMethod::Get],
    params: &[ParamRule::Required("longUrl")],
    path: "shorten",
};

static EXPAND: OperationSpec = OperationSpec {
    operation: Operation::Expand,
    formats: &[Format::Json, Format::Xml],
    methods: &[HttpMethod::Get],
    params: &[URL_OR_HASH],
    path: "expand",
};

static INFO: OperationSpec = OperationSpec {
    operation: Operation::Info,
    formats: &[Format::Json, Format::Xml],
    methods: &[HttpMethod::Get],
    params: &[URL_OR_HASH, ParamRule::Optional("keys")],
    path: "info",
};

static STATS: OperationSpec = OperationSpec {
    operation: Operation::Stats,
    formats: &[Format::Json, Format::Xml],
    methods: &[HttpMethod::Get],
    params: &[URL_OR_HASH],
    path: "stats",
};

static ERRORS: OperationSpec = OperationSpec {
    operation: Operation::Errors,
    formats: &[Format::Json],
    methods: &[HttpMethod::Get],
    params: &[],
    path: "errors",
};

/// Find the `OperationSpec` for an operation name, in any letter case.
pub fn lookup(name: &str) -> Result<&'static OperationSpec, BitlyError> {
    name.parse::<Operation>().map(|op| op.spec())
}
