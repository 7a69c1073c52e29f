//! HTTP routing as a pure function from [`ApiRequest`] to [`ApiResponse`].
//!
//! Nothing here touches a socket; `server::mod` adapts tiny_http requests.

use crate::app::{SessionRegistry, Workbench};
use crate::chart::ChartError;
use crate::constants::SESSION_COOKIE;
use crate::data::{ColumnSort, ImportOutcome, is_importable_file};
use crate::server::page::INDEX_HTML;
use crate::types::{ChartSpec, ExportSpec, HeaderMode, ImageFormat, RawUpload};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other,
}

/// Transport-independent request
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Vec<u8>,
    pub session: Option<String>,
}

impl ApiRequest {
    /// Split `url` into path and decoded query parameters
    pub fn new(method: Method, url: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        Self {
            method,
            path: path.to_string(),
            query: parse_query(query),
            body: Vec::new(),
            session: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_session(mut self, session: Option<String>) -> Self {
        self.session = session;
        self
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Parse an optional numeric parameter; malformed values are an error
    fn usize_param(&self, key: &str) -> Result<Option<usize>, ApiResponse> {
        match self.param(key).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(v) => v
                .parse()
                .map(Some)
                .map_err(|_| ApiResponse::error(400, format!("invalid '{}': {}", key, v))),
        }
    }
}

/// Transport-independent response
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiResponse {
    fn new(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body,
        }
    }

    pub fn html(body: &str) -> Self {
        Self::new(200, "text/html; charset=utf-8", body.as_bytes().to_vec())
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status, "application/json", body),
            Err(e) => {
                tracing::error!("Failed to serialize response: {}", e);
                Self::error(500, "failed to serialize response")
            }
        }
    }

    pub fn error(status: u16, message: impl AsRef<str>) -> Self {
        let body = serde_json::to_vec(&ErrorBody {
            error: message.as_ref(),
        })
        .unwrap_or_default();
        Self::new(status, "application/json", body)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Endpoint {
    Index,
    Import,
    State,
    Table,
    Chart,
    Export,
}

fn endpoint(method: Method, path: &str) -> Option<Endpoint> {
    match (method, path) {
        (Method::Get, "/") | (Method::Get, "/index.html") => Some(Endpoint::Index),
        (Method::Post, "/api/import") => Some(Endpoint::Import),
        (Method::Get, "/api/state") => Some(Endpoint::State),
        (Method::Get, "/api/table") => Some(Endpoint::Table),
        (Method::Post, "/api/chart") => Some(Endpoint::Chart),
        (Method::Get, "/api/export") => Some(Endpoint::Export),
        _ => None,
    }
}

/// Dispatch one request to the caller's workbench
///
/// A response for a request without a valid session carries a
/// `Set-Cookie` for the newly created one.
pub fn route(registry: &SessionRegistry, request: &ApiRequest) -> ApiResponse {
    let Some(endpoint) = endpoint(request.method, &request.path) else {
        tracing::debug!(path = %request.path, "No route");
        return ApiResponse::error(404, format!("no route for {}", request.path));
    };

    let (id, workbench) = registry.resolve(request.session.as_deref());
    let response = {
        let mut wb = workbench.lock();
        match endpoint {
            Endpoint::Index => ApiResponse::html(INDEX_HTML),
            Endpoint::Import => handle_import(&mut wb, request),
            Endpoint::State => ApiResponse::json(200, &wb.snapshot()),
            Endpoint::Table => handle_table(&mut wb, request),
            Endpoint::Chart => handle_chart(&mut wb, request),
            Endpoint::Export => handle_export(&wb, request),
        }
    };

    let id = id.to_string();
    if request.session.as_deref() == Some(id.as_str()) {
        response
    } else {
        response.with_header(
            "Set-Cookie",
            format!("{}={}; Path=/; HttpOnly; SameSite=Strict", SESSION_COOKIE, id),
        )
    }
}

fn handle_import(wb: &mut Workbench, request: &ApiRequest) -> ApiResponse {
    let Some(name) = request.param("name").filter(|n| !n.is_empty()) else {
        return ApiResponse::error(400, "missing 'name'");
    };

    let mut options = wb.options().clone();
    if let Some(delimiter) = request.param("delimiter") {
        options.delimiter = delimiter.to_string();
    }
    match request.usize_param("skip_rows") {
        Ok(Some(skip)) => options.skip_rows = skip,
        Ok(None) => {}
        Err(response) => return response,
    }
    if let Some(header) = request.param("header") {
        match HeaderMode::from_query(header) {
            Some(mode) => options.header_mode = mode,
            None => return ApiResponse::error(400, format!("invalid 'header': {}", header)),
        }
    }
    wb.set_options(options);

    let raw = RawUpload::new(name, request.body.clone());
    let outcome = wb.import(Some(&raw));

    let status = match outcome {
        ImportOutcome::Failed { .. } if !is_importable_file(name) => 415,
        _ => 200,
    };
    ApiResponse::json(status, &wb.snapshot())
}

fn handle_table(wb: &mut Workbench, request: &ApiRequest) -> ApiResponse {
    let (start, count, column) = match (
        request.usize_param("start"),
        request.usize_param("count"),
        request.usize_param("sort"),
    ) {
        (Ok(start), Ok(count), Ok(column)) => (start.unwrap_or(0), count, column),
        (Err(r), _, _) | (_, Err(r), _) | (_, _, Err(r)) => return r,
    };

    let sort = match (column, request.param("dir")) {
        (Some(column), dir) => match ColumnSort::from_query(dir.unwrap_or("asc")) {
            Some(direction) => Some((column, direction)),
            None => return ApiResponse::error(400, "invalid 'dir'"),
        },
        // Explicit reset to the original row order
        (None, Some("none")) => Some((usize::MAX, ColumnSort::Default)),
        (None, _) => None,
    };

    match wb.table_page(start, count, sort) {
        Some(page) => ApiResponse::json(200, &page),
        None => ApiResponse::error(409, "no table loaded"),
    }
}

fn handle_chart(wb: &mut Workbench, request: &ApiRequest) -> ApiResponse {
    let spec: ChartSpec = match serde_json::from_slice(&request.body) {
        Ok(spec) => spec,
        Err(e) => return ApiResponse::error(400, format!("invalid chart spec: {}", e)),
    };

    match wb.update_chart(spec) {
        Err(ChartError::NoTable) => ApiResponse::error(409, ChartError::NoTable.to_string()),
        // Build failures are reported in the update's status
        _ => ApiResponse::json(200, &wb.chart_update()),
    }
}

fn handle_export(wb: &Workbench, request: &ApiRequest) -> ApiResponse {
    let format = match request.param("format") {
        None => ImageFormat::default(),
        Some(f) => match ImageFormat::from_extension(f) {
            Some(format) => format,
            None => return ApiResponse::error(400, format!("unsupported format: {}", f)),
        },
    };
    let spec = ExportSpec::new(format, request.param("name").unwrap_or_default());

    match wb.export(&spec) {
        Ok(artifact) => {
            let file_name = artifact.file_name.replace(['"', '\\'], "_");
            ApiResponse::new(200, artifact.media_type, artifact.bytes).with_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file_name),
            )
        }
        Err(ChartError::NoChart) => ApiResponse::error(409, ChartError::NoChart.to_string()),
        Err(e) => {
            tracing::error!("Export failed: {}", e);
            ApiResponse::error(500, e.to_string())
        }
    }
}

/// Decode `a=1&b=x%20y` into a map; `+` stands for a space
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(text: &str) -> String {
    let text = text.replace('+', " ");
    match urlencoding::decode(&text) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text,
    }
}

/// Extract the session id from a `Cookie` header value
pub fn session_cookie(header: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}
