//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `upload()` / `loaded_workbench()` for import fixtures
//! - `get()` / `post()` for driving the router without a socket
//! - `session_id()` for following the session cookie

use dataplotter::app::{SessionRegistry, Workbench};
use dataplotter::constants::SESSION_COOKIE;
use dataplotter::server::{ApiRequest, ApiResponse, Method, route};
use dataplotter::settings::Settings;
use dataplotter::types::{HeaderMode, ParseOptions, RawUpload};

pub const SAMPLE_CSV: &str = "a,b,c\n1,2,3\n4,5,6\n";

pub const GRID_CSV: &str = "x,y,z\n1,10,0.5\n2,10,0.7\n1,20,0.9\n2,20,1.1\n";

pub fn upload(name: &str, text: &str) -> RawUpload {
    RawUpload::new(name, text)
}

/// Workbench with `text` already imported using a header row
pub fn loaded_workbench(text: &str) -> Workbench {
    let mut wb = Workbench::new(&Settings::default());
    wb.set_options(ParseOptions::default().with_header_mode(HeaderMode::FirstRowIsHeader));
    let outcome = wb.import(Some(&upload("data.csv", text)));
    assert!(outcome.is_loaded(), "fixture failed to import: {:?}", outcome);
    wb
}

pub fn registry() -> SessionRegistry {
    SessionRegistry::new(Settings::default())
}

pub fn get(registry: &SessionRegistry, url: &str, session: Option<&str>) -> ApiResponse {
    let request = ApiRequest::new(Method::Get, url).with_session(session.map(str::to_string));
    route(registry, &request)
}

pub fn post(
    registry: &SessionRegistry,
    url: &str,
    body: impl Into<Vec<u8>>,
    session: Option<&str>,
) -> ApiResponse {
    let request = ApiRequest::new(Method::Post, url)
        .with_body(body)
        .with_session(session.map(str::to_string));
    route(registry, &request)
}

/// Session id from a response's `Set-Cookie` header
pub fn session_id(response: &ApiResponse) -> Option<String> {
    let cookie = response.header("Set-Cookie")?;
    let pair = cookie.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    (name == SESSION_COOKIE).then(|| value.to_string())
}

pub fn json_body(response: &ApiResponse) -> serde_json::Value {
    serde_json::from_slice(&response.body).expect("response body is JSON")
}

/// Parse `text` with a header row
pub fn parse(text: &str) -> dataplotter::types::Table {
    let options = ParseOptions::default().with_header_mode(HeaderMode::FirstRowIsHeader);
    dataplotter::data::parse_table(text, &options).expect("fixture parses")
}
