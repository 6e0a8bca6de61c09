//! HTTP/1.1 protocol implementation.
//!
//! - **`headers`**: case-insensitive header collection and field-line parsing
//! - **`parser`**: parse errors and request-line parsing
//! - **`request`**: the incremental request state machine
//! - **`response`**: status codes and default response headers
//! - **`writer`**: serializes a response section by section
//! - **`connection`**: the per-connection read/parse/dispatch loop
//!
//! # Request state machine
//!
//! ```text
//!   Init ──request line──▶ ParsingHeaders ──empty line──┬─▶ Done
//!                                                       │
//!                                  Content-Length > 0   ▼
//!                                                  ParsingBody ──N bytes──▶ Done
//!
//!   any error ──▶ Error (every later call fails)
//! ```
//!
//! Each call to `Request::parse` reports how many bytes it consumed. The
//! connection loop discards those and appends fresh reads to what is left,
//! so partial lines survive across reads.

pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
