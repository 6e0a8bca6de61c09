use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::parser::ParseError;
use crate::http::request::Request;
use crate::http::response::{default_headers, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::server::handler::Handler;

/// Default per-connection read buffer size.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 4096;

/// Default cap on a declared `Content-Length`.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Size caps applied while reading one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Read buffer size; a request line or header block that does not fit is rejected
    pub max_request_bytes: usize,
    /// Largest body accepted
    pub max_body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

const READ_CHUNK_SIZE: usize = 1024;

/// Reads from `reader` until a full request has been parsed.
///
/// Bytes the parser consumes are dropped from the front of the buffer, so
/// only an unfinished line or header block counts against
/// `limits.max_request_bytes`. Body bytes stream through the buffer; the
/// declared body length is checked against `limits.max_body_bytes`.
pub async fn read_request<R>(reader: &mut R, limits: Limits) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let max_bytes = limits.max_request_bytes;
    let mut request = Request::with_body_limit(limits.max_body_bytes);
    let mut buffer = BytesMut::with_capacity(max_bytes);
    let mut temp = [0u8; READ_CHUNK_SIZE];

    while !request.is_done() {
        let room = max_bytes.saturating_sub(buffer.len());
        if room == 0 {
            return Err(ParseError::RequestTooLarge { limit: max_bytes });
        }

        let n = reader.read(&mut temp[..room.min(READ_CHUNK_SIZE)]).await?;
        if n == 0 {
            return Err(ParseError::ConnectionClosed);
        }
        buffer.extend_from_slice(&temp[..n]);

        let consumed = request.parse(&buffer)?;
        buffer.advance(consumed);

        tracing::trace!(
            read = n,
            consumed,
            buffered = buffer.len(),
            state = ?request.state(),
            "Parsed request bytes"
        );
    }

    Ok(request)
}

/// One accepted connection: read a request, hand it to the handler, close.
pub struct Connection<S> {
    stream: S,
    limits: Limits,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, limits: Limits) -> Self {
        Self { stream, limits }
    }

    /// Serves a single request and closes the stream.
    ///
    /// A request that fails to parse gets a best-effort `400 Bad Request`
    /// and the handler is never called; that is the peer's fault, so it is
    /// logged here and not returned. Handler errors are logged only. An error
    /// is returned only when the response could not be flushed.
    pub async fn run<H: Handler>(mut self, handler: &H) -> anyhow::Result<()> {
        let request = match read_request(&mut self.stream, self.limits).await {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Rejecting malformed request");
                self.reject().await;
                return Ok(());
            }
        };

        tracing::debug!(
            method = %request.method(),
            target = %request.target(),
            body_len = request.body.len(),
            "Request parsed"
        );

        let mut writer = ResponseWriter::new(&mut self.stream);
        let outcome = handler.handle(&mut writer, &request).await;
        if let Err(e) = &outcome {
            tracing::warn!(
                status = e.status.as_u16(),
                message = %e.message,
                target = %request.target(),
                "Handler returned an error"
            );
        }
        let flushed = writer.flush().await;

        let _ = self.stream.shutdown().await;
        flushed?;
        Ok(())
    }

    async fn reject(&mut self) {
        let mut writer = ResponseWriter::new(&mut self.stream);
        let written = async {
            writer.write_status_line(StatusCode::BadRequest).await?;
            writer.write_headers(&default_headers(0)).await?;
            writer.flush().await
        }
        .await;

        if let Err(e) = written {
            tracing::debug!(error = %e, "Could not send 400 response");
        }
        let _ = self.stream.shutdown().await;
    }
}
