//! Chart construction, rendering and export
//!
//! The flow is `ChartSpec` → [`ChartBuilder::build`] → [`Figure`] →
//! [`render_svg`] → [`RenderedChart`] → [`export_chart`]. Export always
//! reuses the rendered SVG; it never rebuilds from the spec.

mod builder;
pub mod error;
mod export;
mod figure;
mod pivot;
mod render;

pub use builder::*;
pub use error::*;
pub use export::*;
pub use figure::*;
pub use pivot::*;
pub use render::*;
