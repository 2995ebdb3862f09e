//! Loopback HTTP server returning canned responses.
//!
//! [`CannedServer`] lets tests drive the HTTP adapters end to end without a
//! real review API, scoring service or model endpoint. Each connection
//! receives one response and is then closed.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

/// Response served for a matching request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON body.
    pub body: String,
}

impl CannedResponse {
    /// `200 OK` with the given JSON body.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Response with an arbitrary status and body.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A request received by [`CannedServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request target: path plus query string.
    pub target: String,
    /// Header lines as `(lowercase name, value)` pairs.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: String,
}

impl RecordedRequest {
    /// Value of the first header named `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Default)]
struct Routes {
    // (target prefix, queued responses); the last response repeats.
    entries: Vec<(String, VecDeque<CannedResponse>)>,
}

impl Routes {
    fn respond(&mut self, target: &str) -> CannedResponse {
        let Some((_, queue)) = self
            .entries
            .iter_mut()
            .find(|(prefix, _)| target.starts_with(prefix.as_str()))
        else {
            return CannedResponse::status(404, "{}");
        };
        if queue.len() > 1 {
            queue
                .pop_front()
                .unwrap_or_else(|| CannedResponse::status(500, "{}"))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| CannedResponse::status(500, "{}"))
        }
    }
}

/// Single-threaded HTTP/1.1 server bound to `127.0.0.1`.
///
/// Routes match on the request target prefix in registration order.
/// Unmatched targets receive `404`. The accept loop runs on a detached
/// thread for the lifetime of the test process.
#[derive(Debug)]
pub struct CannedServer {
    base_url: String,
    routes: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl CannedServer {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound.
    pub fn start() -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let routes = Arc::new(Mutex::new(Routes::default()));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (thread_routes, thread_requests) = (Arc::clone(&routes), Arc::clone(&requests));
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                // Connection errors only affect the client that caused them.
                let _ = serve(stream, &thread_routes, &thread_requests);
            }
        });
        Ok(Self {
            base_url,
            routes,
            requests,
        })
    }

    /// Answer requests whose target starts with `prefix`.
    ///
    /// Registering the same prefix again queues another response; queued
    /// responses are served in order and the last one repeats.
    #[must_use]
    pub fn route(self, prefix: impl Into<String>, response: CannedResponse) -> Self {
        {
            let prefix = prefix.into();
            let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some((_, queue)) = routes
                .entries
                .iter_mut()
                .find(|(existing, _)| *existing == prefix)
            {
                queue.push_back(response);
            } else {
                routes.entries.push((prefix, VecDeque::from([response])));
            }
        }
        self
    }

    /// Root URL of the server, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn serve(
    stream: TcpStream,
    routes: &Mutex<Routes>,
    requests: &Mutex<Vec<RecordedRequest>>,
) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let request = read_request(&mut reader)?;
    let response = routes
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .respond(&request.target);
    requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request);
    write_response(stream, &response)
}

fn read_request(reader: &mut impl BufRead) -> io::Result<RecordedRequest> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_owned();
    let target = parts.next().unwrap_or_default().to_owned();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_owned()));
        }
    }

    let length = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0_u8; length];
    reader.read_exact(&mut body)?;

    Ok(RecordedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn write_response(mut stream: TcpStream, response: &CannedResponse) -> io::Result<()> {
    let reason = match response.status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    write!(
        stream,
        "HTTP/1.1 {} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        response.body.len(),
        response.body
    )?;
    stream.flush()
}
