//! Snapshot tests using the insta crate.
//!
//! These pin the JSON shapes the browser page reads. Inline snapshots keep
//! the expected payload next to the assertion.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use crate::helpers::{SAMPLE_CSV, parse};
use dataplotter::chart::ChartBuilder;
use dataplotter::data::{ImportOutcome, TableView};
use dataplotter::status;
use dataplotter::types::{ChartKind, ParseOptions};
use std::sync::Arc;

#[test]
fn snapshot_welcome_status() {
    insta::assert_json_snapshot!(status::welcome(), @r#"
    {
      "variant": "info",
      "message": "To get started, upload a CSV or TXT file using the panel above."
    }
    "#);
}

#[test]
fn snapshot_default_parse_options() {
    insta::assert_json_snapshot!(ParseOptions::default(), @r#"
    {
      "delimiter": ",",
      "skip_rows": 0,
      "header_mode": "infer"
    }
    "#);
}

#[test]
fn snapshot_import_outcome_loaded() {
    let outcome = ImportOutcome::Loaded {
        file_name: "data.csv".to_string(),
        rows: 2,
        columns: 3,
    };
    insta::assert_json_snapshot!(outcome, @r#"
    {
      "outcome": "loaded",
      "file_name": "data.csv",
      "rows": 2,
      "columns": 3
    }
    "#);
}

#[test]
fn snapshot_default_chart_spec() {
    let table = parse(SAMPLE_CSV);
    let spec = ChartBuilder::new(&table).default_spec(ChartKind::Line2D);
    insta::assert_json_snapshot!(spec, @r#"
    {
      "kind": "line2d",
      "mapping": {
        "x": "a",
        "y": "b",
        "z": null,
        "color": null
      },
      "title": "",
      "axis_labels": {
        "x": "",
        "y": "",
        "z": ""
      },
      "show_legend": true
    }
    "#);
}

#[test]
fn snapshot_table_page() {
    let table = parse("name,score\nann,3\nbob,9\n");
    let page = TableView::new(Arc::new(table)).page(0, 50);
    insta::assert_json_snapshot!(page, @r#"
    {
      "columns": [
        {
          "name": "name",
          "kind": "text"
        },
        {
          "name": "score",
          "kind": "numeric"
        }
      ],
      "rows": [
        [
          "ann",
          "3"
        ],
        [
          "bob",
          "9"
        ]
      ],
      "start": 0,
      "total": 2,
      "position": "1-2 of 2",
      "sort": null
    }
    "#);
}
