//! Serialize a rendered chart to PNG, JPEG or SVG bytes

use crate::chart::error::{ChartError, ChartResult};
use crate::chart::render::RenderedChart;
use crate::types::{ExportSpec, ImageFormat};
use image::{DynamicImage, RgbaImage};
use once_cell::sync::Lazy;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{Options, Tree, fontdb};
use std::io::Cursor;
use std::sync::Arc;

/// System fonts, loaded once per process
static FONT_DB: Lazy<Arc<fontdb::Database>> = Lazy::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "Loaded system fonts for export");
    Arc::new(db)
});

/// Downloadable image bytes
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serialize `chart` in the requested format
pub fn export_chart(chart: &RenderedChart, spec: &ExportSpec) -> ChartResult<ExportArtifact> {
    let bytes = match spec.format {
        ImageFormat::Svg => chart.svg.clone().into_bytes(),
        ImageFormat::Png | ImageFormat::Jpeg => rasterize(&chart.svg, spec.format)?,
    };

    let file_name = spec.download_name(chart.title());
    tracing::info!(file = %file_name, bytes = bytes.len(), "Exported chart");

    Ok(ExportArtifact {
        file_name,
        media_type: spec.format.media_type(),
        bytes,
    })
}

fn rasterize(svg: &str, format: ImageFormat) -> ChartResult<Vec<u8>> {
    let options = Options {
        fontdb: FONT_DB.clone(),
        ..Options::default()
    };

    let tree = Tree::from_str(svg, &options)
        .map_err(|e| ChartError::Export(format!("SVG parse failed: {e}")))?;
    let size = tree.size().to_int_size();

    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or_else(|| ChartError::Export("pixmap allocation failed".to_string()))?;
    // JPEG has no alpha; render onto white for both formats
    pixmap.fill(Color::WHITE);
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    let rgba = RgbaImage::from_raw(size.width(), size.height(), pixmap.take())
        .ok_or_else(|| ChartError::Export("pixel buffer size mismatch".to_string()))?;

    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);
    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8())
            .write_to(&mut cursor, image::ImageFormat::Jpeg)?,
        _ => DynamicImage::ImageRgba8(rgba).write_to(&mut cursor, image::ImageFormat::Png)?,
    }
    Ok(bytes)
}
