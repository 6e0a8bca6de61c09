use std::future::Future;

use thiserror::Error;
use tokio::io::AsyncWrite;

use crate::http::request::Request;
use crate::http::response::StatusCode;
use crate::http::writer::{ResponseWriter, WriteError};

/// A failure reported by a [`Handler`].
///
/// The connection logs it but does not turn it into a response; handlers
/// write their own error responses.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct HandlerError {
    pub status: StatusCode,
    pub message: String,
}

impl HandlerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<WriteError> for HandlerError {
    fn from(e: WriteError) -> Self {
        Self::new(StatusCode::InternalServerError, e.to_string())
    }
}

/// Produces the response for one parsed request.
///
/// The handler owns the whole response: status line, headers, body and any
/// trailers. The connection is closed once the returned future resolves.
pub trait Handler: Send + Sync + 'static {
    fn handle<W>(
        &self,
        writer: &mut ResponseWriter<W>,
        request: &Request,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send
    where
        W: AsyncWrite + Unpin + Send;
}
