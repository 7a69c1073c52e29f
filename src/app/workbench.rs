//! Per-session controller tying import, table view and chart together.
//!
//! Every user interaction lands here. Derived state (table view, rendered
//! chart, status banners) is recomputed from the session table and the
//! current chart spec, and only when one of them actually changed.

use crate::chart::{
    ChartBuilder, ChartError, ChartResult, ExportArtifact, RenderedChart, export_chart,
};
use crate::data::{
    ColumnHeader, ColumnSort, ImportOutcome, TablePage, TableView, format_row_count, import_file,
    is_importable_file,
};
use crate::session::SessionState;
use crate::settings::Settings;
use crate::status::{self, Status};
use crate::types::{
    ChartKind, ChartSpec, ExportSpec, HeaderMode, ImageFormat, ParseOptions, RawUpload, Table,
};
use serde::Serialize;
use std::sync::Arc;

/// Summary of the loaded table for the page header
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub file_name: String,
    pub rows: usize,
    pub rows_label: String,
    pub columns: Vec<ColumnHeader>,
}

/// Selectable chart kind, as offered by the chart controls
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KindOption {
    pub value: ChartKind,
    pub label: &'static str,
}

/// Selectable header interpretation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeaderOption {
    pub value: HeaderMode,
    pub label: &'static str,
}

/// Everything the page needs to draw itself
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorkbenchSnapshot {
    /// Welcome banner or the outcome of the last import
    pub import_status: Status,
    pub options: ParseOptions,
    pub header_modes: Vec<HeaderOption>,
    pub table: Option<TableSummary>,
    pub hints: Vec<Status>,
    pub chart_kinds: Vec<KindOption>,
    pub export_formats: Vec<ImageFormat>,
    pub chart: Option<ChartSpec>,
    pub chart_status: Option<Status>,
    pub svg: Option<String>,
}

/// Chart section of a snapshot, returned after a chart update
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartUpdate {
    pub chart: Option<ChartSpec>,
    pub status: Option<Status>,
    pub svg: Option<String>,
}

pub struct Workbench {
    session: SessionState,
    options: ParseOptions,
    last_import: ImportOutcome,
    /// Rejected upload name; reported without touching the session
    rejected: Option<Status>,
    file_name: Option<String>,
    view: Option<TableView>,
    chart_spec: Option<ChartSpec>,
    rendered: Option<RenderedChart>,
    chart_status: Option<Status>,
    /// Session generation the current chart state was derived from
    built_generation: u64,
    chart_size: (u32, u32),
    page_size: usize,
}

impl Workbench {
    pub fn new(settings: &Settings) -> Self {
        Self {
            session: SessionState::new(),
            options: ParseOptions::default(),
            last_import: ImportOutcome::Idle,
            rejected: None,
            file_name: None,
            view: None,
            chart_spec: None,
            rendered: None,
            chart_status: None,
            built_generation: 0,
            chart_size: (settings.chart_width, settings.chart_height),
            page_size: settings.table_page_size,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Store parse options for the next import
    pub fn set_options(&mut self, options: ParseOptions) {
        self.options = options;
    }

    pub fn table(&self) -> Option<Arc<Table>> {
        self.session.get()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn chart_spec(&self) -> Option<&ChartSpec> {
        self.chart_spec.as_ref()
    }

    pub fn rendered_chart(&self) -> Option<&RenderedChart> {
        self.rendered.as_ref()
    }

    pub fn chart_status(&self) -> Option<&Status> {
        self.chart_status.as_ref()
    }

    /// Import an upload with the stored options
    ///
    /// Names without a `.csv`/`.txt` extension are rejected before parsing
    /// and leave the session as it was.
    pub fn import(&mut self, raw: Option<&RawUpload>) -> ImportOutcome {
        if let Some(raw) = raw
            && !is_importable_file(&raw.file_name)
        {
            let error = crate::data::DataError::UnsupportedFile(raw.file_name.clone());
            tracing::warn!("Rejected upload: {}", error);
            self.rejected = Some(Status::error(format!("Error reading file: {}", error)));
            return ImportOutcome::Failed {
                file_name: raw.file_name.clone(),
                error: error.to_string(),
            };
        }

        let outcome = import_file(&mut self.session, raw, &self.options);
        match &outcome {
            ImportOutcome::Idle => return ImportOutcome::Idle,
            ImportOutcome::Loaded { file_name, .. } => {
                self.file_name = Some(file_name.clone());
                self.view = self.session.get().map(TableView::new);
            }
            ImportOutcome::Failed { .. } => {
                self.file_name = None;
                self.view = None;
            }
        }
        self.rejected = None;
        self.last_import = outcome.clone();
        self.refresh_chart();
        outcome
    }

    /// Rebuild chart state after the session table changed
    fn refresh_chart(&mut self) {
        let Some(table) = self.session.get() else {
            // Import failure drops the chart; the spec is kept for the next table
            self.rendered = None;
            self.chart_status = None;
            self.built_generation = self.session.generation();
            return;
        };

        let builder = ChartBuilder::new(&table);
        let spec = match self.chart_spec.take() {
            Some(mut spec) => {
                builder.revalidate(&mut spec);
                spec
            }
            None => builder.default_spec(ChartKind::default()),
        };
        // Failures are recorded in chart_status
        let _ = self.rebuild(&table, spec);
    }

    /// Apply a chart spec from the controls
    ///
    /// Returns `Ok(false)` when neither the spec nor the table changed
    /// since the last build, in which case nothing is recomputed.
    pub fn update_chart(&mut self, mut spec: ChartSpec) -> ChartResult<bool> {
        let Some(table) = self.session.get() else {
            return Err(ChartError::NoTable);
        };

        ChartBuilder::new(&table).revalidate(&mut spec);

        let unchanged = self.built_generation == self.session.generation()
            && self.chart_spec.as_ref() == Some(&spec)
            && self.rendered.is_some();
        if unchanged {
            return Ok(false);
        }

        self.rebuild(&table, spec).map(|_| true)
    }

    fn rebuild(&mut self, table: &Table, spec: ChartSpec) -> ChartResult<()> {
        self.chart_spec = Some(spec.clone());
        self.built_generation = self.session.generation();

        let (width, height) = self.chart_size;
        let result = ChartBuilder::new(table)
            .build(&spec)
            .and_then(|figure| RenderedChart::render(spec, figure, width, height));

        match result {
            Ok(rendered) => {
                self.rendered = Some(rendered);
                self.chart_status = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Chart build failed: {}", e);
                self.rendered = None;
                self.chart_status = Some(Status::error(format!("Error creating chart: {}", e)));
                Err(e)
            }
        }
    }

    /// Serialize the last successfully rendered chart
    pub fn export(&self, spec: &ExportSpec) -> ChartResult<ExportArtifact> {
        let rendered = self.rendered.as_ref().ok_or(ChartError::NoChart)?;
        export_chart(rendered, spec)
    }

    /// A page of the table, optionally re-sorted first
    pub fn table_page(
        &mut self,
        start: usize,
        count: Option<usize>,
        sort: Option<(usize, ColumnSort)>,
    ) -> Option<TablePage> {
        let page_size = self.page_size;
        let view = self.view.as_mut()?;
        if let Some((col, direction)) = sort
            && view.current_sort() != Some((col, direction))
        {
            view.sort(col, direction);
        }
        Some(view.page(start, count.unwrap_or(page_size)))
    }

    pub fn snapshot(&self) -> WorkbenchSnapshot {
        let import_status = self
            .rejected
            .clone()
            .or_else(|| self.last_import.status())
            .unwrap_or_else(status::welcome);

        let table = self.session.get().map(|table| TableSummary {
            file_name: self.file_name.clone().unwrap_or_default(),
            rows: table.row_count(),
            rows_label: format_row_count(table.row_count()),
            columns: table
                .columns()
                .iter()
                .map(|c| ColumnHeader {
                    name: c.name.clone(),
                    kind: c.kind(),
                })
                .collect(),
        });

        let hints = if table.is_some() {
            vec![status::table_hint(), status::chart_hint()]
        } else {
            Vec::new()
        };

        WorkbenchSnapshot {
            import_status,
            options: self.options.clone(),
            header_modes: HeaderMode::all()
                .iter()
                .map(|&mode| HeaderOption {
                    value: mode,
                    label: mode.label(),
                })
                .collect(),
            table,
            hints,
            chart_kinds: ChartKind::all()
                .iter()
                .map(|&kind| KindOption {
                    value: kind,
                    label: kind.label(),
                })
                .collect(),
            export_formats: ImageFormat::all().to_vec(),
            chart: self.chart_spec.clone(),
            chart_status: self.chart_status.clone().or_else(|| self.surface_note()),
            svg: self.rendered.as_ref().map(|r| r.svg.clone()),
        }
    }

    pub fn chart_update(&self) -> ChartUpdate {
        ChartUpdate {
            chart: self.chart_spec.clone(),
            status: self.chart_status.clone().or_else(|| self.surface_note()),
            svg: self.rendered.as_ref().map(|r| r.svg.clone()),
        }
    }

    fn surface_note(&self) -> Option<Status> {
        self.chart_spec
            .as_ref()
            .filter(|spec| spec.kind == ChartKind::Surface3D)
            .map(|_| status::surface_note())
    }
}
