//! Local HTTP server for the browser UI.
//!
//! A single tiny_http accept loop on the main thread. Each request is read
//! fully, converted to an [`ApiRequest`], routed, and answered.

mod page;
mod routes;

pub use page::INDEX_HTML;
pub use routes::*;

use crate::app::SessionRegistry;
use crate::constants::MAX_UPLOAD_BYTES;
use crate::settings::Settings;
use anyhow::anyhow;
use std::io::Read;
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Helper to create HTTP headers, returning None if the bytes are invalid
fn create_header(name: &[u8], value: &[u8]) -> Option<Header> {
    Header::from_bytes(name, value).ok()
}

/// Bound server plus the sessions it serves
pub struct AppServer {
    server: Server,
    registry: SessionRegistry,
    url: String,
}

impl AppServer {
    pub fn bind(settings: Settings) -> anyhow::Result<Self> {
        let address = settings.address();
        let server =
            Server::http(&address).map_err(|e| anyhow!("failed to bind {}: {}", address, e))?;
        let url = format!("http://{}/", address);
        tracing::info!(%url, "Server listening");

        Ok(Self {
            server,
            registry: SessionRegistry::new(settings),
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Serve requests until the listener fails
    pub fn run(self) {
        for request in self.server.incoming_requests() {
            handle_request(&self.registry, request);
        }
        tracing::info!("Server stopped");
    }
}

fn handle_request(registry: &SessionRegistry, mut request: Request) {
    let method = match request.method() {
        tiny_http::Method::Get => Method::Get,
        tiny_http::Method::Post => Method::Post,
        _ => Method::Other,
    };
    let url = request.url().to_string();

    let mut body = Vec::new();
    let read = request
        .as_reader()
        .take(MAX_UPLOAD_BYTES + 1)
        .read_to_end(&mut body);
    if let Err(e) = read {
        tracing::warn!(%url, "Failed to read request body: {}", e);
        let _ = request.respond(Response::empty(StatusCode(400)));
        return;
    }
    if body.len() as u64 > MAX_UPLOAD_BYTES {
        tracing::warn!(%url, "Rejected oversized upload");
        respond(request, ApiResponse::error(413, "upload too large"));
        return;
    }

    let session = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Cookie"))
        .and_then(|h| session_cookie(h.value.as_str()));

    let api_request = ApiRequest::new(method, &url)
        .with_body(body)
        .with_session(session);
    let response = route(registry, &api_request);
    tracing::debug!(%url, status = response.status, bytes = response.body.len(), "Handled request");
    respond(request, response);
}

fn respond(request: Request, api_response: ApiResponse) {
    let mut response =
        Response::from_data(api_response.body).with_status_code(StatusCode(api_response.status));
    for (name, value) in &api_response.headers {
        if let Some(header) = create_header(name.as_bytes(), value.as_bytes()) {
            response = response.with_header(header);
        }
    }
    if let Err(e) = request.respond(response) {
        tracing::warn!("Failed to send response: {}", e);
    }
}
