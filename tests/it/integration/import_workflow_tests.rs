//! Import → table preview → chart → export workflows

use crate::helpers::{SAMPLE_CSV, loaded_workbench, upload};
use dataplotter::app::Workbench;
use dataplotter::chart::ChartError;
use dataplotter::data::ColumnSort;
use dataplotter::settings::Settings;
use dataplotter::status::StatusVariant;
use dataplotter::types::{ChartKind, ColumnKind, ExportSpec, HeaderMode, ImageFormat, ParseOptions, RawUpload};

#[test]
fn test_upload_to_png_export() {
    let wb = loaded_workbench(SAMPLE_CSV);

    let table = wb.table().unwrap();
    assert_eq!(table.column_names(), vec!["a", "b", "c"]);
    assert_eq!(table.row_count(), 2);

    let spec = wb.chart_spec().unwrap();
    assert_eq!(spec.kind, ChartKind::Line2D);
    assert_eq!(spec.mapping.x, "a");
    assert_eq!(spec.mapping.y, "b");

    let artifact = wb.export(&ExportSpec::new(ImageFormat::Png, "")).unwrap();
    assert_eq!(artifact.file_name, "b_vs_a.png");
    assert_eq!(artifact.media_type, "image/png");
    assert!(artifact.bytes.len() > 8);
    assert_eq!(&artifact.bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_snapshot_after_import() {
    let wb = loaded_workbench(SAMPLE_CSV);
    let snapshot = wb.snapshot();

    assert_eq!(snapshot.import_status.variant, StatusVariant::Success);
    assert!(snapshot.import_status.message.contains("data.csv"));
    let table = snapshot.table.unwrap();
    assert_eq!(table.rows, 2);
    assert_eq!(table.rows_label, "2 rows");
    assert_eq!(table.columns.len(), 3);
    assert!(table.columns.iter().all(|c| c.kind == ColumnKind::Numeric));
    assert_eq!(snapshot.hints.len(), 2);
    assert!(snapshot.svg.unwrap().contains("<svg"));
    assert!(snapshot.chart_status.is_none());
}

#[test]
fn test_failed_reimport_clears_session() {
    let mut wb = loaded_workbench(SAMPLE_CSV);
    assert!(wb.table().is_some());

    // A header-less parse that yields one column is a delimiter mistake
    wb.set_options(
        ParseOptions::default()
            .with_delimiter(";")
            .with_header_mode(HeaderMode::NoHeader),
    );
    let outcome = wb.import(Some(&upload("data.csv", SAMPLE_CSV)));

    assert!(!outcome.is_loaded());
    assert!(wb.table().is_none());
    let snapshot = wb.snapshot();
    assert!(snapshot.import_status.is_error());
    assert!(snapshot.table.is_none());
    assert!(snapshot.svg.is_none());
    assert!(matches!(
        wb.export(&ExportSpec::new(ImageFormat::Svg, "")),
        Err(ChartError::NoChart)
    ));
}

#[test]
fn test_no_header_synthesizes_column_names() {
    let mut wb = Workbench::new(&Settings::default());
    wb.set_options(ParseOptions::default().with_header_mode(HeaderMode::NoHeader));
    let outcome = wb.import(Some(&upload("values.txt", "1,2\n3,4\n5,6\n")));

    assert!(outcome.is_loaded());
    let table = wb.table().unwrap();
    assert_eq!(table.column_names(), vec!["Column_1", "Column_2"]);
    assert_eq!(table.row_count(), 3);

    let spec = wb.chart_spec().unwrap();
    assert_eq!(spec.mapping.x, "Column_1");
    assert_eq!(spec.mapping.y, "Column_2");
}

#[test]
fn test_skip_rows_and_custom_delimiter() {
    let mut wb = Workbench::new(&Settings::default());
    wb.set_options(
        ParseOptions::default()
            .with_delimiter(";")
            .with_skip_rows(2)
            .with_header_mode(HeaderMode::FirstRowIsHeader),
    );
    let text = "# exported by logger\n# format v2\ntime;volts\n0;1.5\n1;1.7\n";
    assert!(wb.import(Some(&upload("log.txt", text))).is_loaded());

    let table = wb.table().unwrap();
    assert_eq!(table.column_names(), vec!["time", "volts"]);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_non_utf8_upload_is_reported() {
    let mut wb = Workbench::new(&Settings::default());
    let outcome = wb.import(Some(&RawUpload::new("latin1.csv", vec![b'a', 0xe9, b'\n'])));

    assert!(!outcome.is_loaded());
    assert!(wb.snapshot().import_status.message.starts_with("Error reading file:"));
}

#[test]
fn test_no_upload_is_a_no_op() {
    let mut wb = loaded_workbench(SAMPLE_CSV);
    let before = wb.snapshot();

    assert!(!wb.import(None).is_loaded());
    assert_eq!(wb.snapshot(), before);
}

#[test]
fn test_table_paging_and_sort_reset() {
    let rows: String = (0..120).map(|i| format!("{},{}\n", i, 120 - i)).collect();
    let mut wb = loaded_workbench(&format!("n,m\n{}", rows));

    let first = wb.table_page(0, None, None).unwrap();
    assert_eq!(first.rows.len(), wb.page_size());
    assert_eq!(first.total, 120);
    assert_eq!(first.position, "1-50 of 120");

    let last = wb.table_page(100, None, None).unwrap();
    assert_eq!(last.rows.len(), 20);

    let sorted = wb.table_page(0, Some(3), Some((1, ColumnSort::Ascending))).unwrap();
    assert_eq!(sorted.rows[0], vec!["119", "1"]);
    assert_eq!(sorted.sort, Some((1, ColumnSort::Ascending)));

    let reset = wb.table_page(0, Some(3), Some((1, ColumnSort::Default))).unwrap();
    assert_eq!(reset.rows[0], vec!["0", "120"]);
    assert_eq!(reset.sort, None);
}
