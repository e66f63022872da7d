//! Minimal HTTP/1.1 framing: one request per connection, body sized by
//! `Content-Length`, response always closes the connection.

use std::io::{self, BufRead, Read, Write};

use thiserror::Error;

use crate::report::ReportError;
use crate::server::api::ErrorBody;

/// Upper bound for the request line plus all header lines.
pub const MAX_HEADER_BYTES: usize = 16 * 1024;
/// Largest accepted request body; a batch of a few thousand reports fits.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("malformed request line")]
    BadRequestLine,
    #[error("invalid Content-Length `{0}`")]
    BadContentLength(String),
    #[error("request headers exceed {limit} bytes")]
    HeadersTooLarge { limit: usize },
    #[error("request body of {length} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { length: usize, limit: usize },
    #[error("request body is not valid UTF-8")]
    BodyNotUtf8,
    #[error("failed to read request: {0}")]
    Io(#[from] io::Error),
}

/// Read one request. `Ok(None)` when the peer closed before sending anything.
pub fn read_request<R: BufRead>(
    reader: &mut R,
    max_body: usize,
) -> Result<Option<HttpRequest>, RequestError> {
    let mut budget = MAX_HEADER_BYTES;
    let request_line = read_header_line(reader, &mut budget)?;
    if request_line.is_empty() {
        return Ok(None);
    }
    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
        return Err(RequestError::BadRequestLine);
    };

    let mut content_length = 0;
    loop {
        let line = read_header_line(reader, &mut budget)?;
        if line.is_empty() {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                let value = value.trim();
                content_length = value
                    .parse()
                    .map_err(|_| RequestError::BadContentLength(value.to_string()))?;
            }
        }
    }

    if content_length > max_body {
        return Err(RequestError::BodyTooLarge {
            length: content_length,
            limit: max_body,
        });
    }
    let mut body = vec![0_u8; content_length];
    reader.read_exact(&mut body)?;
    let body = String::from_utf8(body).map_err(|_| RequestError::BodyNotUtf8)?;

    Ok(Some(HttpRequest {
        method: method.to_string(),
        path: path.to_string(),
        body,
    }))
}

/// One `\n`-terminated line, charged against the shared header budget.
fn read_header_line<R: BufRead>(reader: &mut R, budget: &mut usize) -> Result<String, RequestError> {
    let mut line = String::new();
    let read = reader.by_ref().take(*budget as u64 + 1).read_line(&mut line)?;
    if read > *budget {
        return Err(RequestError::HeadersTooLarge {
            limit: MAX_HEADER_BYTES,
        });
    }
    *budget -= read;
    Ok(line)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn json(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            content_type: "application/json",
            body,
        }
    }

    /// `{"status": "error", "message": ...}`, the same shape a failed batch item uses.
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        let body = serde_json::to_string_pretty(&ErrorBody::new(message))
            .unwrap_or_else(|_| r#"{"status": "error"}"#.to_string());
        Self::json(status_code, body)
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(
            out,
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status_code,
            reason_phrase(self.status_code),
            self.content_type,
            self.body.len(),
        )?;
        out.write_all(self.body.as_bytes())?;
        out.flush()
    }
}

impl From<&ReportError> for HttpResponse {
    fn from(err: &ReportError) -> Self {
        let status = if err.is_malformed_input() { 400 } else { 500 };
        Self::error(status, err.to_string())
    }
}

impl From<&RequestError> for HttpResponse {
    fn from(err: &RequestError) -> Self {
        let status = match err {
            RequestError::BodyTooLarge { .. } => 413,
            RequestError::HeadersTooLarge { .. } => 431,
            _ => 400,
        };
        Self::error(status, err.to_string())
    }
}

fn reason_phrase(status_code: u16) -> &'static str {
    match status_code {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn parse(raw: &str) -> Result<Option<HttpRequest>, RequestError> {
        read_request(&mut Cursor::new(raw.as_bytes().to_vec()), MAX_BODY_BYTES)
    }

    #[test]
    fn body_is_sized_by_content_length() {
        let request = parse("POST /api/report HTTP/1.1\r\ncontent-length: 4\r\nHost: x\r\n\r\nbodyEXTRA")
            .unwrap()
            .unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/report");
        assert_eq!(request.body, "body");
    }

    #[test]
    fn missing_content_length_means_empty_body() {
        let request = parse("GET /api/health HTTP/1.1\r\n\r\n").unwrap().unwrap();
        assert_eq!(request.body, "");
    }

    #[test]
    fn closed_connection_yields_no_request() {
        assert!(parse("").unwrap().is_none());
    }

    #[test]
    fn body_split_across_reads_is_reassembled() {
        let head = Cursor::new(b"POST /api/report HTTP/1.1\r\nContent-Length: 11\r\n\r\nhello".to_vec());
        let tail = Cursor::new(b" world".to_vec());
        let mut reader = BufReader::with_capacity(8, head.chain(tail));
        let request = read_request(&mut reader, MAX_BODY_BYTES).unwrap().unwrap();
        assert_eq!(request.body, "hello world");
    }

    #[test]
    fn oversized_body_maps_to_413() {
        let err = read_request(
            &mut Cursor::new(b"POST /x HTTP/1.1\r\nContent-Length: 100\r\n\r\n".to_vec()),
            10,
        )
        .unwrap_err();
        assert!(matches!(err, RequestError::BodyTooLarge { length: 100, limit: 10 }));
        assert_eq!(HttpResponse::from(&err).status_code, 413);
    }

    #[test]
    fn truncated_body_and_bad_headers_are_rejected() {
        let err = parse("POST /x HTTP/1.1\r\nContent-Length: 10\r\n\r\nshort").unwrap_err();
        assert!(matches!(err, RequestError::Io(_)));
        assert_eq!(HttpResponse::from(&err).status_code, 400);

        let err = parse("POST /x HTTP/1.1\r\nContent-Length: ten\r\n\r\n").unwrap_err();
        assert!(matches!(err, RequestError::BadContentLength(_)));

        let err = parse("GARBAGE\r\n\r\n").unwrap_err();
        assert!(matches!(err, RequestError::BadRequestLine));

        let huge = format!("GET / HTTP/1.1\r\nX-Fill: {}\r\n\r\n", "a".repeat(MAX_HEADER_BYTES));
        let err = parse(&huge).unwrap_err();
        assert_eq!(HttpResponse::from(&err).status_code, 431);
    }

    #[test]
    fn response_framing() {
        let mut out = Vec::new();
        HttpResponse::error(404, "no route").write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        assert!(head.contains(&format!("Content-Length: {}", body.len())));
        let payload: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["message"], "no route");
    }
}
