use httpfromtcp::config::Config;
use httpfromtcp::http::headers::Headers;
use httpfromtcp::http::request::Request;
use httpfromtcp::http::response::{default_headers, StatusCode};
use httpfromtcp::http::writer::ResponseWriter;
use httpfromtcp::server::{Handler, HandlerError, Server};
use tokio::io::AsyncWrite;

const STREAM_CHUNK_SIZE: usize = 32;
const MAX_STREAM_LEN: usize = 1 << 20;

const BAD_REQUEST_PAGE: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>";

const SERVER_ERROR_PAGE: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>";

const NOT_FOUND_PAGE: &str = "<html>
  <head>
    <title>404 Not Found</title>
  </head>
  <body>
    <h1>Not Found</h1>
    <p>Nothing streams from here.</p>
  </body>
</html>";

const OK_PAGE: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>";

struct DemoHandler;

impl Handler for DemoHandler {
    async fn handle<W>(
        &self,
        writer: &mut ResponseWriter<W>,
        request: &Request,
    ) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        if let Some(len) = request.target().strip_prefix("/stream/") {
            return match len.parse::<usize>() {
                Ok(len) if len <= MAX_STREAM_LEN => write_stream(writer, len).await,
                Ok(_) => write_page(writer, StatusCode::BadRequest, BAD_REQUEST_PAGE).await,
                Err(_) => write_page(writer, StatusCode::NotFound, NOT_FOUND_PAGE).await,
            };
        }

        match request.target() {
            "/yourproblem" => write_page(writer, StatusCode::BadRequest, BAD_REQUEST_PAGE).await,
            "/myproblem" => {
                write_page(writer, StatusCode::InternalServerError, SERVER_ERROR_PAGE).await
            }
            _ => write_page(writer, StatusCode::Ok, OK_PAGE).await,
        }
    }
}

async fn write_page<W>(
    writer: &mut ResponseWriter<W>,
    status: StatusCode,
    page: &str,
) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut headers = default_headers(page.len());
    headers.replace("Content-Type", "text/html");

    writer.write_status_line(status).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(page.as_bytes()).await?;
    Ok(())
}

/// Sends `len` generated bytes with chunked encoding and a length trailer.
async fn write_stream<W>(writer: &mut ResponseWriter<W>, len: usize) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut headers = default_headers(0);
    headers.remove("Content-Length");
    headers.set("Transfer-Encoding", "chunked");
    headers.set("Trailer", "X-Content-Length");

    writer.write_status_line(StatusCode::Ok).await?;
    writer.write_headers(&headers).await?;

    let body: Vec<u8> = (0..len).map(|i| b'a' + (i % 26) as u8).collect();
    let mut sent = 0;
    for chunk in body.chunks(STREAM_CHUNK_SIZE) {
        sent += writer.write_chunk(chunk).await?;
    }
    writer.write_chunked_body_done().await?;

    let mut trailers = Headers::new();
    trailers.set("X-Content-Length", &sent.to_string());
    writer.write_trailers(&trailers).await?;
    Ok(())
}

async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let server = Server::bind(&cfg, DemoHandler).await?;
    tracing::info!("Server started on {}", server.local_addr());

    shutdown_signal().await?;
    tracing::info!("Shutdown signal received");

    server.close();
    server.wait().await?;
    tracing::info!("Server gracefully stopped");

    Ok(())
}
