// Copyright (C) 2018 Stephane Raux. Distributed under the MIT license.

use serde::Serializer;
use serde::ser::SerializeSeq;
use serde_derive::Serialize;
use std::error::Error as StdError;
use std::fmt::{Display, self};

/// Failure to complete an exchange with the geocoding server.
///
/// A place that cannot be found is not an error: operations report it as
/// `None` or an empty list.
#[derive(Debug, Serialize)]
pub struct Error {
    kind: ErrorKind,
    #[serde(serialize_with = "serialize_cause")]
    cause: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new<E>(kind: ErrorKind, cause: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let cause = Some(cause.into());
        Error {kind, cause}
    }

    pub fn kind(&self) -> &ErrorKind {&self.kind}

    /// HTTP status code if the server answered with a non-success status.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Status {code, ..} => Some(code),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Non-success HTTP status.
    Status {code: u16, reason: String},
    /// Connection, DNS or I/O failure.
    Network,
    /// Connect, read or write deadline elapsed.
    Timeout,
    /// Body could not be decoded.
    InvalidResponse,
    InvalidUrl,
    InvalidConfig,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ErrorKind::Status {code, reason} if reason.is_empty() =>
                write!(f, "HTTP {}", code),
            ErrorKind::Status {code, reason} =>
                write!(f, "HTTP {}: {}", code, reason),
            ErrorKind::Network => f.write_str("Network error"),
            ErrorKind::Timeout => f.write_str("Request timed out"),
            ErrorKind::InvalidResponse => f.write_str("Invalid response"),
            ErrorKind::InvalidUrl => f.write_str("Invalid URL"),
            ErrorKind::InvalidConfig => f.write_str("Invalid configuration"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_ref().map(|e| &**e as &dyn StdError)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {kind, cause: None}
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Error {
        let kind = if e.is_timeout() || caused_by_timeout(&e) {
            ErrorKind::Timeout
        } else {
            ErrorKind::Network
        };
        Error::new(kind, e)
    }
}

// The connector reports an elapsed connect timeout as a wrapped I/O error.
fn caused_by_timeout(e: &hyper::Error) -> bool {
    let mut cause = e.source();
    while let Some(c) = cause {
        if let Some(io) = c.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        cause = c.source();
    }
    false
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(e: tokio::time::error::Elapsed) -> Error {
        Error::new(ErrorKind::Timeout, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::new(ErrorKind::InvalidUrl, e)
    }
}

impl From<hyper::http::uri::InvalidUri> for Error {
    fn from(e: hyper::http::uri::InvalidUri) -> Error {
        Error::new(ErrorKind::InvalidUrl, e)
    }
}

fn serialize_cause<S>(e: &Option<Box<dyn StdError + Send + Sync>>, out: S)
    -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = out.serialize_seq(None)?;
    let mut e = e.as_ref().map(|e| &**e as &dyn StdError);
    while let Some(cause) = e {
        seq.serialize_element(&cause.to_string())?;
        e = cause.source();
    }
    seq.end()
}
