//! Parse progress hooks.
//!
//! A [`ParseObserver`] is told about every table and column the parser
//! builds. Observers only watch; they cannot alter the resulting schema.

use tracing::debug;

use crate::schema::{Column, Table};

/// Receives parse events.
pub trait ParseObserver {
    /// A `CREATE TABLE` header was recognized.
    fn on_table_open(&mut self, _line: usize, _table: &Table) {}

    /// A column was added to the table being built.
    fn on_column(&mut self, _line: usize, _table: &Table, _column: &Column) {}

    /// The table body was closed and the table appended to the schema.
    fn on_table_close(&mut self, _line: usize, _table: &Table) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ParseObserver for NoopObserver {}

/// Emits a `debug` event per table and column.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn on_table_open(&mut self, line: usize, table: &Table) {
        debug!(line, table = %table.name(), sql_name = %table.sql_name(), "New table");
    }

    fn on_column(&mut self, line: usize, table: &Table, column: &Column) {
        debug!(
            line,
            table = %table.name(),
            column = %column.name(),
            raw_type = %column.raw_type(),
            attrs = %column.attrs(),
            "New column"
        );
    }

    fn on_table_close(&mut self, line: usize, table: &Table) {
        debug!(
            line,
            table = %table.name(),
            columns = table.columns().len(),
            "Closing table"
        );
    }
}

impl<O: ParseObserver + ?Sized> ParseObserver for &mut O {
    fn on_table_open(&mut self, line: usize, table: &Table) {
        (**self).on_table_open(line, table);
    }

    fn on_column(&mut self, line: usize, table: &Table, column: &Column) {
        (**self).on_column(line, table, column);
    }

    fn on_table_close(&mut self, line: usize, table: &Table) {
        (**self).on_table_close(line, table);
    }
}
