//! DataPlotter: upload a CSV/TXT file, preview it and chart it in the browser.

pub mod app;
pub mod chart;
pub mod constants;
pub mod data;
pub mod server;
pub mod session;
pub mod settings;
pub mod status;
pub mod types;
