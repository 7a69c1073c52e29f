//! Application state: one [`Workbench`] per browser session.
//!
//! - `workbench` - import, table view, chart and export for one session
//! - `registry` - cookie-keyed map of workbenches

mod registry;
mod workbench;

pub use registry::*;
pub use workbench::*;
