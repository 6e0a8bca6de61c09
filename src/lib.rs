//! httpfromtcp - HTTP/1.1 over raw TCP
//!
//! Core library: incremental request parsing, response serialization and
//! the per-connection server loop.

pub mod config;
pub mod http;
pub mod server;
