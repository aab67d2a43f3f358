//! Parsed HTTP request types.
//!
//! A [`Request`] is only ever built by the request decoder once the whole
//! message has been read, so consumers never observe a partially parsed request.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::protocol::{Headers, ParseError};

/// The request methods this server accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(ParseError::InvalidMethod(other.to_owned())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first line of a request: `METHOD SP TARGET SP HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: Method,
    target: String,
    version: String,
}

impl RequestLine {
    pub fn new(method: Method, target: impl Into<String>, version: impl Into<String>) -> Self {
        Self { method, target: target.into(), version: version.into() }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The request target, exactly as sent.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The protocol version without the `HTTP/` prefix, always `"1.1"` for parsed requests.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} HTTP/{}", self.method, self.target, self.version)
    }
}

/// A fully parsed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
    body: Bytes,
}

impl Request {
    pub fn new(request_line: RequestLine, headers: Headers, body: Bytes) -> Self {
        Self { request_line, headers, body }
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> Method {
        self.request_line.method()
    }

    pub fn target(&self) -> &str {
        self.request_line.target()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_methods() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("POST".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("PUT".parse::<Method>().unwrap(), Method::Put);
        assert_eq!("PATCH".parse::<Method>().unwrap(), Method::Patch);
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);

        assert!(matches!("get".parse::<Method>(), Err(ParseError::InvalidMethod(m)) if m == "get"));
        assert!("HEAD".parse::<Method>().is_err());
        assert!("OPTIONS".parse::<Method>().is_err());
    }

    #[test]
    fn request_line_display() {
        let line = RequestLine::new(Method::Get, "/coffee", "1.1");
        assert_eq!(line.to_string(), "GET /coffee HTTP/1.1");
    }
}
