use std::fmt;

use crate::http::headers::Headers;
use crate::http::parser::{parse_request_line, ParseError};

/// The parsed start-line of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// Method token, exactly as sent (e.g. "GET")
    pub method: String,
    /// Path and query, not validated beyond being space-free
    pub request_target: String,
    /// Always "1.1"
    pub http_version: String,
}

/// Where the parser is within a request.
///
/// States only move forward; a call that lacks the data to make progress
/// leaves the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Init,
    ParsingHeaders,
    ParsingBody,
    Done,
    Error,
}

impl ParseState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ParseState::Done | ParseState::Error)
    }
}

/// An HTTP request, built incrementally from a byte stream.
///
/// Feed bytes through [`Request::parse`] until [`Request::is_done`]. The
/// request line is only filled in once it has been parsed in full.
#[derive(Debug, Clone)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: Headers,
    pub body: Vec<u8>,
    state: ParseState,
    max_body_bytes: usize,
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    pub fn new() -> Self {
        Self {
            request_line: RequestLine::default(),
            headers: Headers::new(),
            body: Vec::new(),
            state: ParseState::Init,
            max_body_bytes: usize::MAX,
        }
    }

    /// A request that rejects any declared body longer than `max_body_bytes`.
    pub fn with_body_limit(max_body_bytes: usize) -> Self {
        Self {
            max_body_bytes,
            ..Self::new()
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.request_target
    }

    /// Parsed `Content-Length`, or `None` when the header is absent.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        self.headers
            .get("content-length")
            .map(|v| {
                v.trim()
                    .parse::<usize>()
                    .map_err(|_| ParseError::InvalidContentLength(v.to_string()))
            })
            .transpose()
    }

    /// Consumes as much of `data` as the current state allows.
    ///
    /// Returns how many bytes of `data` were used; the caller discards them
    /// and passes the remainder (plus anything newly read) on the next call.
    /// Any error moves the request to [`ParseState::Error`], after which every
    /// call fails with [`ParseError::RequestInErrorState`].
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.state == ParseState::Error {
            return Err(ParseError::RequestInErrorState);
        }

        let mut read = 0;
        while !self.state.is_terminal() && read < data.len() {
            match self.parse_single(&data[read..]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(e) => {
                    self.state = ParseState::Error;
                    return Err(e);
                }
            }
        }

        Ok(read)
    }

    fn parse_single(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Init => self.parse_start_line(data),
            ParseState::ParsingHeaders => self.parse_headers(data),
            ParseState::ParsingBody => self.parse_body(data),
            ParseState::Done | ParseState::Error => Ok(0),
        }
    }

    fn parse_start_line(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match parse_request_line(data)? {
            Some((request_line, n)) => {
                self.request_line = request_line;
                self.state = ParseState::ParsingHeaders;
                Ok(n)
            }
            None => Ok(0),
        }
    }

    fn parse_headers(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let (n, done) = self.headers.parse(data)?;

        if done {
            if let Some(encoding) = self.headers.get("transfer-encoding") {
                return Err(ParseError::UnsupportedBodyEncoding(encoding.to_string()));
            }

            self.state = match self.content_length()? {
                Some(len) if len > self.max_body_bytes => {
                    return Err(ParseError::BodyTooLarge {
                        length: len,
                        limit: self.max_body_bytes,
                    });
                }
                Some(len) if len > 0 => ParseState::ParsingBody,
                _ => ParseState::Done,
            };
        }

        Ok(n)
    }

    fn parse_body(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        // only reachable with a positive Content-Length
        let length = match self.content_length()? {
            Some(len) if len > 0 => len,
            _ => return Err(ParseError::UnsupportedBodyEncoding("unframed body".to_string())),
        };

        let take = (length - self.body.len()).min(data.len());
        self.body.extend_from_slice(&data[..take]);

        if self.body.len() == length {
            self.state = ParseState::Done;
        }

        Ok(take)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Request line:")?;
        writeln!(f, "- Method: {}", self.request_line.method)?;
        writeln!(f, "- Target: {}", self.request_line.request_target)?;
        writeln!(f, "- Version: {}", self.request_line.http_version)?;
        writeln!(f, "Headers:")?;
        for (name, value) in self.headers.iter() {
            writeln!(f, "- {}: {}", name, value)?;
        }
        writeln!(f, "Body:")?;
        write!(f, "{}", String::from_utf8_lossy(&self.body))
    }
}
