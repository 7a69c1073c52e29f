//! Session state: the one optional table of a user session.
//!
//! Owned by a [`Workbench`](crate::app::Workbench), never global. The
//! importer is the only writer; viewers read through [`SessionState::get`].

use crate::types::Table;
use std::sync::Arc;

/// Holder of the current table, if any
#[derive(Debug, Default)]
pub struct SessionState {
    table: Option<Arc<Table>>,
    /// Bumped on every set/clear so dependents can detect a changed table
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<Table>> {
        self.table.clone()
    }

    pub fn set(&mut self, table: Table) {
        self.table = Some(Arc::new(table));
        self.generation += 1;
    }

    pub fn clear(&mut self) {
        self.table = None;
        self.generation += 1;
    }

    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
