use std::io;
use thiserror::Error;

use crate::http::request::RequestLine;

pub const CRLF: &[u8] = b"\r\n";

const HTTP_NAME: &str = "HTTP";
const SUPPORTED_VERSION: &str = "1.1";

/// Errors raised while parsing an incoming request.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request-line")]
    MalformedStartLine,

    #[error("unsupported http version: {0}")]
    UnsupportedHttpVersion(String),

    #[error("malformed header name: {0:?}")]
    MalformedHeaderName(String),

    #[error("malformed field line")]
    MalformedFieldLine,

    #[error("request in error state")]
    RequestInErrorState,

    #[error("unsupported body encoding: {0}")]
    UnsupportedBodyEncoding(String),

    #[error("invalid content-length: {0:?}")]
    InvalidContentLength(String),

    #[error("request exceeds the {limit} byte read buffer")]
    RequestTooLarge { limit: usize },

    #[error("declared body of {length} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { length: usize, limit: usize },

    #[error("connection closed before the request was complete")]
    ConnectionClosed,

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Position of the first CRLF in `buf`, if any.
pub fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(CRLF.len()).position(|w| w == CRLF)
}

/// Whether every byte of `s` is an RFC 9110 token character.
pub fn is_token(s: &[u8]) -> bool {
    s.iter().all(|&ch| {
        ch.is_ascii_alphanumeric()
            || matches!(
                ch,
                b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                    | b'`' | b'|' | b'~'
            )
    })
}

/// Parses `METHOD SP TARGET SP HTTP/1.1 CRLF` from the front of `buf`.
///
/// Returns `Ok(None)` when no complete line is buffered yet, otherwise the
/// parsed line and the number of bytes it occupied (CRLF included).
pub fn parse_request_line(buf: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(idx) = find_crlf(buf) else {
        return Ok(None);
    };

    let line = std::str::from_utf8(&buf[..idx]).map_err(|_| ParseError::MalformedStartLine)?;
    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(ParseError::MalformedStartLine);
    };

    if method.is_empty() || !is_token(method.as_bytes()) || target.is_empty() {
        return Err(ParseError::MalformedStartLine);
    }

    match version.split_once('/') {
        Some((HTTP_NAME, SUPPORTED_VERSION)) => {}
        _ => return Err(ParseError::UnsupportedHttpVersion(version.to_string())),
    }

    let request_line = RequestLine {
        method: method.to_string(),
        request_target: target.to_string(),
        http_version: SUPPORTED_VERSION.to_string(),
    };

    Ok(Some((request_line, idx + CRLF.len())))
}
