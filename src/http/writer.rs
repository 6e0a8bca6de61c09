use std::io;

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::headers::Headers;
use crate::http::parser::CRLF;
use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Which section of the response the writer expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    StatusLine,
    Headers,
    Body,
    Done,
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot write {operation} while in {state:?} state")]
    OutOfOrder {
        operation: &'static str,
        state: WriterState,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Writes a response onto a byte sink, one section at a time.
///
/// Sections must come in order: status line, headers, body. For chunked
/// responses the body is followed by `write_chunked_body_done` and a second
/// header block carrying the trailers. Nothing is buffered here beyond what
/// the sink itself does.
pub struct ResponseWriter<W> {
    sink: W,
    state: WriterState,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: WriterState::StatusLine,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriteError> {
        self.ensure_state(WriterState::StatusLine, "status line")?;

        let line = format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            status.as_u16(),
            status.reason_phrase()
        );
        self.sink.write_all(line.as_bytes()).await?;

        self.state = WriterState::Headers;
        Ok(())
    }

    /// Writes a header block terminated by an empty line.
    ///
    /// The first call writes the response headers. A second call, made once
    /// the body is underway, writes the trailer block and finishes the response.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriteError> {
        let next = match self.state {
            WriterState::Headers => WriterState::Body,
            WriterState::Body => WriterState::Done,
            state => {
                return Err(WriteError::OutOfOrder {
                    operation: "headers",
                    state,
                });
            }
        };

        let mut buf = Vec::new();
        for (name, value) in headers.iter() {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(CRLF);
        }
        buf.extend_from_slice(CRLF);
        self.sink.write_all(&buf).await?;

        self.state = next;
        Ok(())
    }

    /// Writes `body` verbatim. Chunk framing, if any, is the caller's job.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriteError> {
        self.ensure_state(WriterState::Body, "body")?;
        self.sink.write_all(body).await?;
        Ok(body.len())
    }

    /// Writes `data` as one chunk: `<hex-size>CRLF<data>CRLF`.
    ///
    /// An empty slice writes nothing, since a zero-size chunk ends the body.
    pub async fn write_chunk(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        self.ensure_state(WriterState::Body, "chunk")?;
        if data.is_empty() {
            return Ok(0);
        }

        let mut buf = Vec::with_capacity(data.len() + 16);
        buf.extend_from_slice(format!("{:x}\r\n", data.len()).as_bytes());
        buf.extend_from_slice(data);
        buf.extend_from_slice(CRLF);
        self.sink.write_all(&buf).await?;

        Ok(data.len())
    }

    /// Writes the terminating zero-size chunk. Follow with `write_trailers`.
    pub async fn write_chunked_body_done(&mut self) -> Result<(), WriteError> {
        self.ensure_state(WriterState::Body, "last chunk")?;
        self.sink.write_all(b"0\r\n").await?;
        Ok(())
    }

    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), WriteError> {
        self.ensure_state(WriterState::Body, "trailers")?;
        self.write_headers(trailers).await
    }

    pub async fn flush(&mut self) -> Result<(), WriteError> {
        self.sink.flush().await?;
        Ok(())
    }

    fn ensure_state(
        &self,
        state: WriterState,
        operation: &'static str,
    ) -> Result<(), WriteError> {
        if self.state != state {
            return Err(WriteError::OutOfOrder {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }
}
