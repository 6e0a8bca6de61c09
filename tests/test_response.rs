use httpfromtcp::http::response::{default_headers, StatusCode};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_status_code_display() {
    assert_eq!(StatusCode::NotFound.to_string(), "404 Not Found");
}

#[test]
fn test_default_headers() {
    let headers = default_headers(42);

    assert_eq!(headers.get("Content-Length"), Some("42"));
    assert_eq!(headers.get("Connection"), Some("close"));
    assert_eq!(headers.get("Content-Type"), Some("text/plain"));
    assert_eq!(headers.len(), 3);
}

#[test]
fn test_default_headers_can_be_replaced() {
    let mut headers = default_headers(0);
    headers.replace("content-type", "text/html");
    headers.replace("Content-Length", "12");

    assert_eq!(headers.get("Content-Type"), Some("text/html"));
    assert_eq!(headers.get("content-length"), Some("12"));
}
