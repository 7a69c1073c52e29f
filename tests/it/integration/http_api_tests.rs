//! Routing, session cookies and response shapes of the HTTP API

use crate::helpers::{GRID_CSV, SAMPLE_CSV, get, json_body, post, registry, session_id};
use dataplotter::server::{ApiRequest, Method, route};

#[test]
fn test_index_serves_page_and_sets_cookie() {
    let registry = registry();
    let response = get(&registry, "/", None);

    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Type"), Some("text/html; charset=utf-8"));
    assert!(String::from_utf8_lossy(&response.body).contains("DataPlotter"));

    let id = session_id(&response).expect("new session cookie");
    let cookie = response.header("Set-Cookie").unwrap();
    assert!(cookie.contains("HttpOnly"));
    assert_eq!(registry.len(), 1);

    // A known session is not re-issued
    let again = get(&registry, "/api/state", Some(&id));
    assert_eq!(again.status, 200);
    assert!(again.header("Set-Cookie").is_none());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_unknown_route_is_404_without_session() {
    let registry = registry();
    let response = get(&registry, "/favicon.ico", None);

    assert_eq!(response.status, 404);
    assert!(response.header("Set-Cookie").is_none());
    assert!(registry.is_empty());

    let wrong_method = route(&registry, &ApiRequest::new(Method::Get, "/api/import"));
    assert_eq!(wrong_method.status, 404);
}

#[test]
fn test_import_then_state() {
    let registry = registry();
    let response = post(
        &registry,
        "/api/import?name=data.csv&header=first_row&delimiter=%2C",
        SAMPLE_CSV,
        None,
    );
    assert_eq!(response.status, 200);
    let id = session_id(&response).unwrap();

    let body = json_body(&response);
    assert_eq!(body["import_status"]["variant"], "success");
    assert_eq!(body["table"]["rows"], 2);
    assert_eq!(body["options"]["header_mode"], "first_row_is_header");
    assert_eq!(body["chart"]["kind"], "line2d");
    assert!(body["svg"].as_str().unwrap().contains("<svg"));

    let state = json_body(&get(&registry, "/api/state", Some(&id)));
    assert_eq!(state["table"]["file_name"], "data.csv");
}

#[test]
fn test_sessions_are_isolated() {
    let registry = registry();
    let first = post(&registry, "/api/import?name=a.csv&header=yes", SAMPLE_CSV, None);
    let second = get(&registry, "/api/state", None);

    assert_ne!(session_id(&first), session_id(&second));
    assert!(json_body(&second)["table"].is_null());
}

#[test]
fn test_unsupported_extension_is_415() {
    let registry = registry();
    let response = post(&registry, "/api/import?name=sheet.xlsx", "a,b\n1,2\n", None);

    assert_eq!(response.status, 415);
    let body = json_body(&response);
    assert_eq!(body["import_status"]["variant"], "error");
    assert!(body["table"].is_null());
}

#[test]
fn test_import_parameter_errors() {
    let registry = registry();
    assert_eq!(post(&registry, "/api/import", SAMPLE_CSV, None).status, 400);
    assert_eq!(
        post(&registry, "/api/import?name=a.csv&skip_rows=x", SAMPLE_CSV, None).status,
        400
    );
    assert_eq!(
        post(&registry, "/api/import?name=a.csv&header=maybe", SAMPLE_CSV, None).status,
        400
    );
}

#[test]
fn test_table_requires_table() {
    let registry = registry();
    let response = get(&registry, "/api/table", None);
    assert_eq!(response.status, 409);
    assert!(json_body(&response)["error"].is_string());
}

#[test]
fn test_table_sort_and_reset() {
    let registry = registry();
    let id = session_id(&post(
        &registry,
        "/api/import?name=s.csv&header=yes",
        "name,score\nann,3\nbob,9\ncid,5\n",
        None,
    ))
    .unwrap();

    let sorted = json_body(&get(&registry, "/api/table?sort=1&dir=desc", Some(&id)));
    assert_eq!(sorted["rows"][0][0], "bob");
    assert_eq!(sorted["total"], 3);

    let reset = json_body(&get(&registry, "/api/table?dir=none", Some(&id)));
    assert_eq!(reset["rows"][0][0], "ann");
    assert!(reset["sort"].is_null());

    let paged = json_body(&get(&registry, "/api/table?start=1&count=1", Some(&id)));
    assert_eq!(paged["rows"].as_array().unwrap().len(), 1);
    assert_eq!(paged["position"], "2-2 of 3");
}

#[test]
fn test_chart_update_round_trip() {
    let registry = registry();
    let id = session_id(&post(&registry, "/api/import?name=g.csv&header=yes", GRID_CSV, None)).unwrap();

    let spec = r#"{"kind":"surface3d","mapping":{"x":"x","y":"y","z":"z"},"title":"Field"}"#;
    let response = post(&registry, "/api/chart", spec, Some(&id));
    assert_eq!(response.status, 200);

    let body = json_body(&response);
    assert_eq!(body["chart"]["kind"], "surface3d");
    assert_eq!(body["chart"]["title"], "Field");
    assert_eq!(body["status"]["variant"], "warning");
    assert!(body["svg"].as_str().unwrap().contains("Field"));
}

#[test]
fn test_switch_from_2d_to_3d_defaults_z() {
    let registry = registry();
    let id = session_id(&post(&registry, "/api/import?name=a.csv&header=yes", SAMPLE_CSV, None)).unwrap();

    let line = post(
        &registry,
        "/api/chart",
        r#"{"kind":"line2d","mapping":{"x":"a","y":"b","z":null}}"#,
        Some(&id),
    );
    assert!(json_body(&line)["chart"]["mapping"]["z"].is_null());

    // The page sends no z when the previous chart was 2D
    let scatter = post(
        &registry,
        "/api/chart",
        r#"{"kind":"scatter3d","mapping":{"x":"a","y":"b","z":null}}"#,
        Some(&id),
    );
    let body = json_body(&scatter);
    assert_eq!(body["chart"]["mapping"]["z"], "c");
    assert!(body["status"].is_null());
    assert!(body["svg"].is_string());

    let page = String::from_utf8_lossy(&get(&registry, "/", Some(&id)).body).into_owned();
    assert!(page.contains("currentChart.mapping.z"));
}

#[test]
fn test_chart_errors() {
    let registry = registry();
    let no_table = post(
        &registry,
        "/api/chart",
        r#"{"kind":"line2d","mapping":{"x":"a","y":"b"}}"#,
        None,
    );
    assert_eq!(no_table.status, 409);

    let id = session_id(&no_table).unwrap();
    post(&registry, "/api/import?name=a.csv&header=yes", SAMPLE_CSV, Some(&id));
    assert_eq!(post(&registry, "/api/chart", "{not json", Some(&id)).status, 400);

    // Build failures come back as a status, not an HTTP error
    let failed = post(
        &registry,
        "/api/chart",
        r#"{"kind":"surface3d","mapping":{"x":"a","y":"a","z":"c"}}"#,
        Some(&id),
    );
    assert_eq!(failed.status, 200);
    let body = json_body(&failed);
    assert_eq!(body["status"]["variant"], "error");
    assert!(body["svg"].is_null());
}

#[test]
fn test_export_headers() {
    let registry = registry();
    let id = session_id(&post(&registry, "/api/import?name=a.csv&header=yes", SAMPLE_CSV, None)).unwrap();

    let png = get(&registry, "/api/export?format=png&name=my%20chart", Some(&id));
    assert_eq!(png.status, 200);
    assert_eq!(png.header("Content-Type"), Some("image/png"));
    assert_eq!(
        png.header("Content-Disposition"),
        Some("attachment; filename=\"my chart.png\"")
    );
    assert_eq!(&png.body[..4], b"\x89PNG");

    let svg = get(&registry, "/api/export?format=svg", Some(&id));
    assert_eq!(svg.header("Content-Type"), Some("image/svg+xml"));
    assert_eq!(
        svg.header("Content-Disposition"),
        Some("attachment; filename=\"b_vs_a.svg\"")
    );

    assert_eq!(get(&registry, "/api/export?format=gif", Some(&id)).status, 400);
}

#[test]
fn test_export_without_chart_is_409() {
    let registry = registry();
    let response = get(&registry, "/api/export?format=png", None);
    assert_eq!(response.status, 409);
    assert_eq!(json_body(&response)["error"], "no chart to export");
}
