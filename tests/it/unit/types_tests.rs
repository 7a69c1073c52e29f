//! Value types: chart specs, header modes, image formats

use dataplotter::data::{ColumnSort, is_importable_file, resolve_delimiter};
use dataplotter::types::{
    AxisLabels, AxisMapping, ChartKind, ChartSpec, ExportSpec, HeaderMode, ImageFormat,
};

fn spec() -> ChartSpec {
    ChartSpec::new(
        ChartKind::Scatter2D,
        AxisMapping {
            x: "time".into(),
            y: "temp".into(),
            z: None,
            color: None,
        },
    )
}

#[test]
fn test_resolved_labels_fall_back_to_columns() {
    let spec = spec();
    assert_eq!(spec.resolved_title(), "temp vs time");
    assert_eq!(spec.resolved_x_label(), "time");
    assert_eq!(spec.resolved_y_label(), "temp");
    assert_eq!(spec.resolved_z_label(), "Z");

    let custom = spec.with_title("Weather").with_labels(AxisLabels {
        x: "Hour".into(),
        y: "   ".into(),
        z: String::new(),
    });
    assert_eq!(custom.resolved_title(), "Weather");
    assert_eq!(custom.resolved_x_label(), "Hour");
    assert_eq!(custom.resolved_y_label(), "temp");
}

#[test]
fn test_chart_spec_json_defaults() {
    let spec: ChartSpec =
        serde_json::from_str(r#"{"kind":"scatter3d","mapping":{"x":"a","y":"b","z":"c"}}"#).unwrap();
    assert_eq!(spec.kind, ChartKind::Scatter3D);
    assert_eq!(spec.mapping.z.as_deref(), Some("c"));
    assert_eq!(spec.mapping.color, None);
    assert!(spec.show_legend);
    assert!(spec.title.is_empty());
}

#[test]
fn test_download_name() {
    assert_eq!(
        ExportSpec::new(ImageFormat::Png, "").download_name("temp vs time"),
        "temp_vs_time.png"
    );
    assert_eq!(
        ExportSpec::new(ImageFormat::Jpeg, " report ").download_name("ignored"),
        "report.jpeg"
    );
    assert_eq!(
        ExportSpec::new(ImageFormat::Svg, "").download_name("  "),
        "chart.svg"
    );
}

#[test]
fn test_image_formats() {
    assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
    assert_eq!(ImageFormat::from_extension("gif"), None);
    assert_eq!(ImageFormat::Svg.media_type(), "image/svg+xml");
    assert_eq!(ImageFormat::default(), ImageFormat::Png);
}

#[test]
fn test_query_forms() {
    assert_eq!(HeaderMode::from_query("no"), Some(HeaderMode::NoHeader));
    assert_eq!(HeaderMode::from_query("first_row_is_header"), Some(HeaderMode::FirstRowIsHeader));
    assert_eq!(HeaderMode::from_query("sometimes"), None);
    assert_eq!(ColumnSort::from_query("desc"), Some(ColumnSort::Descending));
    assert_eq!(ColumnSort::from_query("none"), Some(ColumnSort::Default));
}

#[test]
fn test_file_filter_and_delimiter() {
    assert!(is_importable_file("data.CSV"));
    assert!(is_importable_file("notes.txt"));
    assert!(!is_importable_file("sheet.xlsx"));
    assert!(!is_importable_file("csv"));

    assert_eq!(resolve_delimiter("\\t").unwrap(), "\t");
    assert_eq!(resolve_delimiter("::").unwrap(), "::");
    assert!(resolve_delimiter("").is_err());
}

#[test]
fn test_kind_dimensions() {
    let three_d: Vec<_> = ChartKind::all().iter().filter(|k| k.is_3d()).collect();
    assert_eq!(three_d, vec![&ChartKind::Scatter3D, &ChartKind::Surface3D]);
    assert_eq!(ChartKind::default(), ChartKind::Line2D);
}
