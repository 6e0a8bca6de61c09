use httpfromtcp::http::headers::Headers;
use httpfromtcp::http::parser::find_crlf;
use httpfromtcp::http::response::{default_headers, StatusCode};
use httpfromtcp::http::writer::{ResponseWriter, WriteError, WriterState};

async fn writer_at_body() -> ResponseWriter<Vec<u8>> {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&Headers::new()).await.unwrap();
    writer
}

#[tokio::test]
async fn test_write_status_line() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer
        .write_status_line(StatusCode::InternalServerError)
        .await
        .unwrap();

    assert_eq!(writer.into_inner(), b"HTTP/1.1 500 Internal Server Error\r\n");
}

#[tokio::test]
async fn test_full_response_round_trip() {
    let mut headers = Headers::new();
    headers.set("Content-Length", "5");

    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();
    writer.write_headers(&headers).await.unwrap();
    writer.write_body(b"hello").await.unwrap();
    let out = writer.into_inner();

    let line_end = find_crlf(&out).unwrap();
    assert_eq!(&out[..line_end], b"HTTP/1.1 200 OK");

    let mut parsed = Headers::new();
    let rest = &out[line_end + 2..];
    let (n, done) = parsed.parse(rest).unwrap();
    assert!(done);
    assert_eq!(parsed, headers);
    assert_eq!(&rest[n..], b"hello");
}

#[tokio::test]
async fn test_empty_header_block() {
    let writer = writer_at_body().await;

    assert_eq!(writer.state(), WriterState::Body);
    assert_eq!(writer.into_inner(), b"HTTP/1.1 200 OK\r\n\r\n");
}

#[tokio::test]
async fn test_chunked_framing() {
    let mut writer = writer_at_body().await;
    let prefix_len = b"HTTP/1.1 200 OK\r\n\r\n".len();

    writer.write_chunk(b"abc").await.unwrap();
    writer.write_chunk(b"hello").await.unwrap();
    writer.write_chunked_body_done().await.unwrap();
    let out = writer.into_inner();

    let body = &out[prefix_len..];
    assert_eq!(body, b"3\r\nabc\r\n5\r\nhello\r\n0\r\n");

    // decode and compare payload length
    let mut rest = body;
    let mut total = 0;
    loop {
        let end = find_crlf(rest).unwrap();
        let size = usize::from_str_radix(std::str::from_utf8(&rest[..end]).unwrap(), 16).unwrap();
        if size == 0 {
            break;
        }
        total += size;
        rest = &rest[end + 2 + size + 2..];
    }
    assert_eq!(total, 8);
}

#[tokio::test]
async fn test_chunk_size_is_hex() {
    let mut writer = writer_at_body().await;
    writer.write_chunk(&[b'x'; 26]).await.unwrap();
    let out = writer.into_inner();

    let mut expected = b"1a\r\n".to_vec();
    expected.extend_from_slice(&[b'x'; 26]);
    expected.extend_from_slice(b"\r\n");
    assert!(out.ends_with(&expected));
}

#[tokio::test]
async fn test_empty_chunk_writes_nothing() {
    let mut writer = writer_at_body().await;
    assert_eq!(writer.write_chunk(b"").await.unwrap(), 0);

    assert_eq!(writer.into_inner(), b"HTTP/1.1 200 OK\r\n\r\n");
}

#[tokio::test]
async fn test_trailers_finish_response() {
    let mut writer = writer_at_body().await;
    writer.write_chunk(b"data").await.unwrap();
    writer.write_chunked_body_done().await.unwrap();

    let mut trailers = Headers::new();
    trailers.set("X-Content-Length", "4");
    writer.write_trailers(&trailers).await.unwrap();

    assert_eq!(writer.state(), WriterState::Done);
    let out = writer.into_inner();
    assert!(out.ends_with(b"4\r\ndata\r\n0\r\nx-content-length: 4\r\n\r\n"));
}

#[tokio::test]
async fn test_body_before_headers_is_rejected() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();

    let err = writer.write_body(b"too soon").await.unwrap_err();
    assert!(matches!(
        err,
        WriteError::OutOfOrder {
            state: WriterState::Headers,
            ..
        }
    ));
}

#[tokio::test]
async fn test_headers_before_status_line_is_rejected() {
    let mut writer = ResponseWriter::new(Vec::new());
    let err = writer.write_headers(&default_headers(0)).await.unwrap_err();

    assert!(matches!(err, WriteError::OutOfOrder { .. }));
    assert!(writer.into_inner().is_empty());
}

#[tokio::test]
async fn test_status_line_written_once() {
    let mut writer = ResponseWriter::new(Vec::new());
    writer.write_status_line(StatusCode::Ok).await.unwrap();

    assert!(writer.write_status_line(StatusCode::Ok).await.is_err());
}

#[tokio::test]
async fn test_nothing_after_done() {
    let mut writer = writer_at_body().await;
    writer.write_trailers(&Headers::new()).await.unwrap();

    assert!(writer.write_body(b"late").await.is_err());
    assert!(writer.write_headers(&Headers::new()).await.is_err());
}
