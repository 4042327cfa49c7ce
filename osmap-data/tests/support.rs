//! One-shot HTTP responder bound to the loopback interface.

use std::future::Future;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the responder does once a request has been read.
#[derive(Debug, Clone)]
pub enum ServerScript {
    /// Answer with a canned response and close.
    Reply {
        status: u16,
        reason: &'static str,
        content_type: &'static str,
        body: Vec<u8>,
    },
    /// Promise `declared` body bytes, send only `body` and close.
    Truncated { declared: usize, body: Vec<u8> },
    /// Read the request and never answer.
    Silent,
}

impl ServerScript {
    pub fn ok(content_type: &'static str, body: &[u8]) -> Self {
        Self::Reply {
            status: 200,
            reason: "OK",
            content_type,
            body: body.to_vec(),
        }
    }

    pub fn truncated(body: &[u8]) -> Self {
        Self::Truncated {
            declared: body.len() + 512,
            body: body.to_vec(),
        }
    }

    pub fn internal_error() -> Self {
        Self::Reply {
            status: 500,
            reason: "Internal Server Error",
            content_type: "text/plain",
            body: b"boom".to_vec(),
        }
    }
}

/// The request as seen on the wire.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub head: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head
            .lines()
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
    }
}

pub struct Loopback {
    listener: TcpListener,
}

impl Loopback {
    pub async fn bind() -> Self {
        match TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => Self { listener },
            Err(err) => panic!("failed to bind loopback listener: {err}"),
        }
    }

    pub fn base_url(&self) -> String {
        match self.listener.local_addr() {
            Ok(addr) => format!("http://{addr}"),
            Err(err) => panic!("listener has no local address: {err}"),
        }
    }

    /// Accept one connection, read one request and act out `script`.
    pub async fn serve(self, script: &ServerScript) -> RecordedRequest {
        let (mut stream, _) = match self.listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => panic!("failed to accept connection: {err}"),
        };
        let request = read_request(&mut stream).await;
        match script {
            ServerScript::Reply {
                status,
                reason,
                content_type,
                body,
            } => {
                let head = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let mut response = head.into_bytes();
                response.extend_from_slice(body);
                if let Err(err) = stream.write_all(&response).await {
                    panic!("failed to write response: {err}");
                }
                let _closed = stream.shutdown().await;
            }
            ServerScript::Truncated { declared, body } => {
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/osm3s+xml\r\n\
                     Content-Length: {declared}\r\nConnection: close\r\n\r\n"
                );
                let mut response = head.into_bytes();
                response.extend_from_slice(body);
                if let Err(err) = stream.write_all(&response).await {
                    panic!("failed to write partial response: {err}");
                }
                let _closed = stream.shutdown().await;
            }
            ServerScript::Silent => std::future::pending::<()>().await,
        }
        request
    }

    /// Drive `call` against this server, returning what the server saw.
    ///
    /// A silent server is dropped as soon as `call` completes, so no request
    /// is recorded for it.
    pub async fn exchange<T>(
        self,
        script: &ServerScript,
        call: impl Future<Output = T>,
    ) -> (Option<RecordedRequest>, T) {
        if matches!(script, ServerScript::Silent) {
            tokio::select! {
                received = self.serve(script) => panic!("silent server answered: {received:?}"),
                result = call => (None, result),
            }
        } else {
            let (received, result) = tokio::join!(self.serve(script), call);
            (Some(received), result)
        }
    }
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    Loopback::bind().await.base_url()
}

async fn read_request(stream: &mut TcpStream) -> RecordedRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    let header_end = loop {
        if let Some(end) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break end;
        }
        fill(stream, &mut buffer, &mut chunk).await;
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut request = RecordedRequest {
        method: String::new(),
        target: String::new(),
        head,
        body: Vec::new(),
    };
    let content_length = request
        .header("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    let body_start = header_end + 4;
    while buffer.len() < body_start + content_length {
        fill(stream, &mut buffer, &mut chunk).await;
    }

    let mut request_line = request.head.lines().next().unwrap_or_default().split_whitespace();
    request.method = request_line.next().unwrap_or_default().to_owned();
    request.target = request_line.next().unwrap_or_default().to_owned();
    request.body = buffer[body_start..body_start + content_length].to_vec();
    request
}

async fn fill(stream: &mut TcpStream, buffer: &mut Vec<u8>, chunk: &mut [u8]) {
    match stream.read(chunk).await {
        Ok(0) => panic!("client closed the connection mid-request"),
        Ok(read) => buffer.extend_from_slice(&chunk[..read]),
        Err(err) => panic!("failed to read request: {err}"),
    }
}
