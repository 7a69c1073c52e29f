//! Chart building across kinds, color mappings and surface pivots

use crate::helpers::{GRID_CSV, SAMPLE_CSV, loaded_workbench, parse};
use dataplotter::chart::{AxisScale, ChartBuilder, ChartError, PivotError, pivot, render_svg};
use dataplotter::status;
use dataplotter::types::{AxisLabels, AxisMapping, ChartKind, ChartSpec, ExportSpec, ImageFormat};

fn mapping(x: &str, y: &str, z: Option<&str>, color: Option<&str>) -> AxisMapping {
    AxisMapping {
        x: x.to_string(),
        y: y.to_string(),
        z: z.map(str::to_string),
        color: color.map(str::to_string),
    }
}

#[test]
fn test_surface_from_regular_grid() {
    let mut wb = loaded_workbench(GRID_CSV);
    let spec = ChartSpec::new(ChartKind::Surface3D, mapping("x", "y", Some("z"), None));

    assert!(wb.update_chart(spec).unwrap());

    let update = wb.chart_update();
    assert_eq!(update.status, Some(status::surface_note()));
    let svg = update.svg.unwrap();
    assert!(svg.contains("<svg"));

    let artifact = wb.export(&ExportSpec::new(ImageFormat::Svg, "surface")).unwrap();
    assert_eq!(artifact.file_name, "surface.svg");
    assert_eq!(artifact.media_type, "image/svg+xml");
    assert_eq!(artifact.bytes, svg.into_bytes());
}

#[test]
fn test_line_chart_from_space_padded_file() {
    let mut wb = loaded_workbench("a, b\n1, 2\n3, 4\n\n5, 6\n");
    let spec = ChartSpec::new(ChartKind::Line2D, mapping("a", " b", None, None));

    assert!(wb.update_chart(spec).unwrap());
    assert!(wb.chart_update().svg.is_some());
    assert_eq!(wb.table().unwrap().row_count(), 3);
}

#[test]
fn test_pivot_shape_and_order() {
    let table = parse("x,y,z\n2,20,4\n1,20,3\n2,10,2\n1,10,1\n3,10,5\n3,20,6\n");
    let grid = pivot(&table, "x", "y", "z").unwrap();

    assert_eq!(grid.shape(), (2, 3));
    assert_eq!(grid.x_labels, vec!["1", "2", "3"]);
    assert_eq!(grid.y_labels, vec!["10", "20"]);
    assert_eq!(grid.z[0], vec![1.0, 2.0, 5.0]);
    assert_eq!(grid.z[1], vec![3.0, 4.0, 6.0]);
}

#[test]
fn test_pivot_rejects_duplicates_and_gaps() {
    let duplicate = parse("x,y,z\n1,1,1\n1,1,2\n");
    assert!(matches!(
        pivot(&duplicate, "x", "y", "z"),
        Err(ChartError::Pivot(PivotError::Duplicate { .. }))
    ));

    let gap = parse("x,y,z\n1,1,1\n2,1,2\n1,2,3\n");
    assert!(matches!(
        pivot(&gap, "x", "y", "z"),
        Err(ChartError::Pivot(PivotError::Missing { .. }))
    ));
}

#[test]
fn test_surface_failure_keeps_table_and_blocks_export() {
    let mut wb = loaded_workbench("x,y,z\n1,1,1\n1,1,2\n");
    let spec = ChartSpec::new(ChartKind::Surface3D, mapping("x", "y", Some("z"), None));

    assert!(wb.update_chart(spec).is_err());

    let update = wb.chart_update();
    let message = update.status.unwrap().message;
    assert!(message.starts_with("Error creating chart:"));
    assert!(message.contains("Scatter 3D"));
    assert!(update.svg.is_none());
    assert_eq!(wb.table().unwrap().row_count(), 2);
    assert!(matches!(
        wb.export(&ExportSpec::new(ImageFormat::Png, "")),
        Err(ChartError::NoChart)
    ));
}

#[test]
fn test_categorical_color_splits_traces() {
    let table = parse("x,y,group\n1,2,north\n2,3,south\n3,4,north\n");
    let spec = ChartSpec::new(ChartKind::Scatter2D, mapping("x", "y", None, Some("group")));

    let figure = ChartBuilder::new(&table).build(&spec).unwrap();

    let names: Vec<_> = figure.traces.iter().map(|t| t.name.clone().unwrap()).collect();
    assert_eq!(names, vec!["north", "south"]);
    assert_eq!(figure.traces[0].x, vec![1.0, 3.0]);
    assert_eq!(figure.traces[1].y, vec![3.0]);
    assert!(figure.has_legend_entries());
}

#[test]
fn test_numeric_color_uses_scale_for_3d_scatter() {
    let table = parse("x,y,z,temp\n1,2,3,10\n4,5,6,30\n7,8,9,20\n");
    let spec = ChartSpec::new(ChartKind::Scatter3D, mapping("x", "y", Some("z"), Some("temp")));

    let figure = ChartBuilder::new(&table).build(&spec).unwrap();

    assert_eq!(figure.traces.len(), 1);
    assert_eq!(figure.traces[0].color_values, Some(vec![10.0, 30.0, 20.0]));
    assert_eq!(figure.color_range, Some((10.0, 30.0)));
    assert_eq!(figure.traces[0].z, Some(vec![3.0, 6.0, 9.0]));
    assert!(render_svg(&figure, 640, 480).unwrap().contains("<svg"));
}

#[test]
fn test_categorical_x_for_line_chart() {
    let table = parse("month,sales\njan,10\nfeb,12\nmar,9\n");
    let spec = ChartSpec::new(ChartKind::Line2D, mapping("month", "sales", None, None));

    let figure = ChartBuilder::new(&table).build(&spec).unwrap();

    assert_eq!(
        figure.x_scale,
        AxisScale::Categorical {
            categories: vec!["jan".into(), "feb".into(), "mar".into()]
        }
    );
    assert_eq!(figure.traces[0].x, vec![0.0, 1.0, 2.0]);
}

#[test]
fn test_text_y_axis_is_rejected() {
    let table = parse("x,label\n1,a\n2,b\n");
    let spec = ChartSpec::new(ChartKind::Line2D, mapping("x", "label", None, None));

    let err = ChartBuilder::new(&table).build(&spec).unwrap_err();
    assert!(matches!(err, ChartError::NonNumericAxis { axis: "y", .. }));
}

#[test]
fn test_rows_with_missing_values_are_skipped() {
    let table = parse("x,y\n1,2\n2,\n3,4\n");
    let spec = ChartSpec::new(ChartKind::Scatter2D, mapping("x", "y", None, None));

    let figure = ChartBuilder::new(&table).build(&spec).unwrap();
    assert_eq!(figure.point_count(), 2);
}

#[test]
fn test_labels_and_title_reach_layout() {
    let table = parse(SAMPLE_CSV);
    let spec = ChartSpec::new(ChartKind::Scatter3D, mapping("a", "b", Some("c"), None))
        .with_title("Readings")
        .with_labels(AxisLabels {
            x: "Time".into(),
            y: String::new(),
            z: "Depth".into(),
        })
        .with_legend(false);

    let figure = ChartBuilder::new(&table).build(&spec).unwrap();

    assert_eq!(figure.layout.title, "Readings");
    assert!(!figure.layout.show_legend);
    let scene = figure.layout.scene.unwrap();
    assert_eq!(scene.x_title, "Time");
    assert_eq!(scene.y_title, "b");
    assert_eq!(scene.z_title, "Depth");
}

#[test]
fn test_kind_switch_to_3d_fills_z() {
    let mut wb = loaded_workbench(SAMPLE_CSV);
    let mut spec = wb.chart_spec().unwrap().clone();
    spec.kind = ChartKind::Scatter3D;

    wb.update_chart(spec).unwrap();

    assert_eq!(wb.chart_spec().unwrap().mapping.z.as_deref(), Some("c"));
    let jpeg = wb.export(&ExportSpec::new(ImageFormat::Jpeg, "")).unwrap();
    assert_eq!(jpeg.file_name, "b_vs_a.jpeg");
    assert_eq!(&jpeg.bytes[..2], &[0xff, 0xd8]);
}
