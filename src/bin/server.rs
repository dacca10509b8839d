//! HTTP server for the SQL generator UI.
//! Simple HTTP server using tokio and basic HTTP handling.

use clap::Parser;
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info};

use nl2sql_engine::compiler::SqlCompiler;

const INDEX_HTML: &str = include_str!("../../ui/index.html");

/// Largest request (headers + body) the server will buffer.
const MAX_REQUEST_BYTES: usize = 1024 * 1024;

#[derive(Parser)]
#[command(name = "nl2sql-server")]
#[command(about = "HTTP server exposing the SQL generator")]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    bind: String,
}

/// JSON body of `POST /generate`. Missing fields default to empty strings.
#[derive(Debug, Default, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    schema: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let listener = TcpListener::bind(&args.bind).await?;
    info!("SQL generator server listening on {}", args.bind);

    loop {
        let (stream, addr) = listener.accept().await?;
        info!("New connection from: {}", addr);
        tokio::spawn(handle_connection(stream));
    }
}

async fn handle_connection(mut stream: TcpStream) {
    match read_request(&mut stream).await {
        Ok(request) => {
            let response = handle_request(&request);
            if let Err(e) = stream.write_all(response.as_bytes()).await {
                error!("Failed to write response: {}", e);
            }
        }
        Err(e) => {
            error!("Failed to read from stream: {}", e);
        }
    }
}

/// Read one HTTP request: headers up to the blank line, then as many body
/// bytes as Content-Length announces.
async fn read_request(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > MAX_REQUEST_BYTES {
            break;
        }

        let Some(header_end) = find_header_end(&buf) else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]);
        let content_length = headers
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        if buf.len() >= header_end + 4 + content_length {
            break;
        }
    }

    Ok(String::from_utf8_lossy(&buf).to_string())
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn handle_request(request: &str) -> String {
    let request_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = request_line.split_whitespace().collect();

    if parts.len() < 2 {
        return create_response(400, "Bad Request", "application/json", "{}");
    }

    let method = parts[0];
    let mut path = parts[1];

    // Strip query parameters and trailing slashes
    if let Some(query_start) = path.find('?') {
        path = &path[..query_start];
    }
    let trimmed = path.trim_end_matches('/');
    let path = if trimmed.is_empty() { "/" } else { trimmed };

    info!("Request: {} {}", method, path);

    match (method, path) {
        ("GET", "/") => create_response(200, "OK", "text/html", INDEX_HTML),
        ("GET", "/api/health") => create_response(
            200,
            "OK",
            "application/json",
            r#"{"status":"ok","service":"nl2sql-engine"}"#,
        ),
        ("POST", "/generate") => {
            let sql = generate_from_body(request);
            let body = serde_json::json!({ "sql": sql }).to_string();
            // Always 200: success and failure both travel in the payload
            create_response(200, "OK", "application/json", &body)
        }
        ("OPTIONS", _) => create_response(200, "OK", "application/json", ""),
        _ => {
            let body = format!(r#"{{"error":"Endpoint not found: {} {}"}}"#, method, path);
            create_response(404, "Not Found", "application/json", &body)
        }
    }
}

/// Parse the JSON body and run the compiler. A fault at this boundary is
/// reported as an `Error: ` string in the payload, never as a failed call.
fn generate_from_body(request: &str) -> String {
    let body_start = request
        .find("\r\n\r\n")
        .map(|idx| idx + 4)
        .unwrap_or(request.len());
    let body = request[body_start..].trim();

    match serde_json::from_str::<GenerateRequest>(body) {
        Ok(req) => SqlCompiler::default().compile(&req.prompt, &req.schema),
        Err(e) => {
            error!("Malformed /generate body: {}", e);
            format!("Error: {}", e)
        }
    }
}

fn create_response(status: u16, status_text: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: {}\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
         Access-Control-Allow-Headers: Content-Type\r\n\
         Content-Length: {}\r\n\
         \r\n\
         {}",
        status,
        status_text,
        content_type,
        body.len(),
        body
    )
}
