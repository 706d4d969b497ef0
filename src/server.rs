//! HTTP Boundary
//!
//! Minimal HTTP/1.1 server on a tokio `TcpListener`. One request per connection.
//! This is the only place tagged errors are turned into status codes.

use crate::config::Settings;
use crate::error::{Result, SalesError};
use crate::filter::FilterSpec;
use crate::service::SalesService;
use reqwest::Url;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, warn};

const READ_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Shared server state
pub struct AppState {
    pub service: SalesService,
    pub settings: Settings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    fn message(status: u16, error: &str, detail: &str) -> Self {
        Self::json(status, &json!({ "error": error, "detail": detail }))
    }

    pub fn from_error(err: &SalesError) -> Self {
        let kind = err.kind();
        match err {
            SalesError::InvalidRequest(_) => warn!("Rejected request: {}", err),
            _ => error!("Request failed: {}", err),
        }
        Self::message(kind.status_code(), kind.as_str(), &err.public_message())
    }

    pub fn body_json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            reason_phrase(self.status),
            self.body.len(),
            self.body
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Health,
    FilterOptions,
    Overview,
    ByCategory,
    ByRegion,
    Trends,
    ProfitAnalysis,
    SegmentAnalysis,
    States,
    Refresh,
}

impl Endpoint {
    fn from_path(path: &str) -> Option<Self> {
        let endpoint = match path {
            "/api/health" => Endpoint::Health,
            "/api/sales/filter-options" => Endpoint::FilterOptions,
            "/api/sales/overview" => Endpoint::Overview,
            "/api/sales/by-category" => Endpoint::ByCategory,
            "/api/sales/by-region" => Endpoint::ByRegion,
            "/api/sales/trends" => Endpoint::Trends,
            "/api/sales/profit-analysis" => Endpoint::ProfitAnalysis,
            "/api/sales/segment-analysis" => Endpoint::SegmentAnalysis,
            "/api/sales/states" => Endpoint::States,
            "/api/sales/refresh" => Endpoint::Refresh,
            _ => return None,
        };
        Some(endpoint)
    }

    fn method(&self) -> &'static str {
        match self {
            Endpoint::Refresh => "POST",
            _ => "GET",
        }
    }
}

/// Route a request given its method and request target (path plus query)
pub async fn route(state: &AppState, method: &str, target: &str) -> HttpResponse {
    let url = match Url::parse(&format!("http://localhost{}", target)) {
        Ok(url) => url,
        Err(_) => {
            return HttpResponse::from_error(&SalesError::InvalidRequest(format!(
                "Malformed request target: {}",
                target
            )))
        }
    };

    let path = match url.path().trim_end_matches('/') {
        "" => "/",
        p => p,
    };

    let Some(endpoint) = Endpoint::from_path(path) else {
        return HttpResponse::message(404, "not_found", &format!("No route for {}", path));
    };
    if !method.eq_ignore_ascii_case(endpoint.method()) {
        return HttpResponse::message(
            405,
            "method_not_allowed",
            &format!("{} {} is not supported", method, path),
        );
    }

    match dispatch(state, endpoint, &url).await {
        Ok(body) => HttpResponse::json(200, &body),
        Err(e) => HttpResponse::from_error(&e),
    }
}

async fn dispatch(state: &AppState, endpoint: Endpoint, url: &Url) -> Result<Value> {
    let service = &state.service;

    match endpoint {
        Endpoint::Health => Ok(json!({
            "status": "healthy",
            "message": format!("{} is running", state.settings.api_title),
            "version": state.settings.api_version,
            "last_refresh": service.last_refresh(),
        })),
        Endpoint::Refresh => {
            let refreshed_at = service.refresh().await?;
            Ok(json!({ "last_refresh": refreshed_at }))
        }
        Endpoint::FilterOptions => to_json(&service.filter_options().await?),
        Endpoint::Overview => to_json(&service.overview(&filter_from(url)?).await?),
        Endpoint::ByCategory => data(&service.sales_by_category(&filter_from(url)?).await?),
        Endpoint::ByRegion => data(&service.sales_by_region(&filter_from(url)?).await?),
        Endpoint::Trends => data(&service.sales_trends(&filter_from(url)?).await?),
        Endpoint::ProfitAnalysis => data(&service.profit_analysis(&filter_from(url)?).await?),
        Endpoint::SegmentAnalysis => data(&service.segment_analysis(&filter_from(url)?).await?),
        Endpoint::States => data(&service.state_sales(&filter_from(url)?).await?),
    }
}

fn filter_from(url: &Url) -> Result<FilterSpec> {
    FilterSpec::from_query_pairs(url.query_pairs())
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| SalesError::Internal(format!("Failed to serialize response: {}", e)))
}

fn data<T: Serialize>(rows: &[T]) -> Result<Value> {
    Ok(json!({ "data": to_json(&rows)? }))
}

/// Accept connections until the listener fails
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    info!("Listening on {}", listener.local_addr()?);

    loop {
        let (stream, addr) = listener.accept().await?;
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, state).await {
                error!("Error handling connection from {}: {}", addr, e);
            }
        });
    }
}

async fn handle_connection(mut stream: TcpStream, state: Arc<AppState>) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 8192];

    let read_result = timeout(READ_TIMEOUT, async {
        loop {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);
            if buffer.windows(4).any(|w| w == b"\r\n\r\n") || buffer.len() > MAX_HEADER_BYTES {
                break;
            }
        }
        Ok::<_, std::io::Error>(())
    })
    .await;

    let response = match read_result {
        Ok(Ok(())) => {
            let request = String::from_utf8_lossy(&buffer);
            match parse_request_line(&request) {
                Some((method, target)) => {
                    debug!("{} {}", method, target);
                    route(&state, method, target).await
                }
                None => HttpResponse::message(400, "bad_request", "Malformed request line"),
            }
        }
        Ok(Err(e)) => return Err(e),
        Err(_) => HttpResponse::message(408, "request_timeout", "Request timeout"),
    };

    stream.write_all(response.to_http_string().as_bytes()).await?;
    stream.flush().await
}

fn parse_request_line(request: &str) -> Option<(&str, &str)> {
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    if !target.starts_with('/') {
        return None;
    }
    Some((method, target))
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
