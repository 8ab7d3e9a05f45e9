//! Line-oriented `CREATE TABLE` parser.
//!
//! The input is the output of SQLite's `.schema` command: one column per
//! line, tables closed by a line ending in `);`.
//!
//! ```text
//! CREATE TABLE photos (
//!   id number primary key,
//!   taken_at text not null, -- datetime
//!   meta json -- { W float64 }
//! );
//! ```
//!
//! Parsing is a two-state machine. [`ParserState::step`] is a pure
//! transition over one line; [`SchemaParser`] feeds it the input and reports
//! progress to a [`ParseObserver`].

use tracing::warn;

use crate::error::{Result, SchemaError};
use crate::observer::{NoopObserver, ParseObserver};
use crate::schema::{Column, Schema, Table};
use crate::typemap::{BraceExtractor, SubtypeExtractor, TypeMapper};

const TABLE_OPEN: &str = "CREATE TABLE";
const TABLE_CLOSE: &str = ");";
const COMMENT_MARKER: &str = "--";

/// What to do with a column line that has no type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLinePolicy {
    /// Abort with [`SchemaError::MalformedColumnLine`].
    #[default]
    Fail,
    /// Log a warning and ignore the line.
    Skip,
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Handling of malformed column lines inside a table body.
    pub malformed_columns: MalformedLinePolicy,
}

impl ParseOptions {
    /// Skips malformed column lines instead of failing.
    #[must_use]
    pub const fn skip_malformed(mut self) -> Self {
        self.malformed_columns = MalformedLinePolicy::Skip;
        self
    }
}

/// Parser state between two lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Outside any table; waiting for a `CREATE TABLE` line.
    #[default]
    SeekingTable,
    /// Inside a table body.
    InTable {
        /// The table being built.
        table: Table,
        /// Line number of its `CREATE TABLE` header.
        opened_at: usize,
    },
}

/// What a single line did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    /// The line was outside a table and ignored.
    Ignored,
    /// The line opened a table.
    TableOpened,
    /// The line added a column to the current table.
    ColumnAdded,
    /// The line was a malformed column line and was skipped.
    ColumnSkipped,
    /// The line closed the current table.
    TableClosed,
}

/// Outcome of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// State after the line.
    pub state: ParserState,
    /// The table closed by this line.
    pub completed: Option<Table>,
    /// What the line did.
    pub event: LineEvent,
}

impl Step {
    const fn to(state: ParserState, event: LineEvent) -> Self {
        Self {
            state,
            completed: None,
            event,
        }
    }
}

impl ParserState {
    /// Consumes one line.
    ///
    /// `line_no` is 1-based and only used for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error for a table header without a usable name, a column line
    /// without a type (under [`MalformedLinePolicy::Fail`]), or a column of
    /// unsupported type.
    pub fn step<E: SubtypeExtractor>(
        self,
        line_no: usize,
        line: &str,
        mapper: &TypeMapper<E>,
        options: &ParseOptions,
    ) -> Result<Step> {
        match self {
            Self::SeekingTable => {
                if !line.starts_with(TABLE_OPEN) {
                    return Ok(Step::to(Self::SeekingTable, LineEvent::Ignored));
                }
                let table = line
                    .split_whitespace()
                    .nth(2)
                    .map(Table::new)
                    .filter(|table| !table.name().is_empty())
                    .ok_or_else(|| SchemaError::MalformedTableHeader {
                        line: line_no,
                        text: line.to_string(),
                    })?;
                let state = Self::InTable {
                    table,
                    opened_at: line_no,
                };
                Ok(Step::to(state, LineEvent::TableOpened))
            }

            Self::InTable { table, .. } if line.ends_with(TABLE_CLOSE) => Ok(Step {
                state: Self::SeekingTable,
                completed: Some(table),
                event: LineEvent::TableClosed,
            }),

            Self::InTable {
                mut table,
                opened_at,
            } => {
                let Some(decl) = ColumnDecl::split(line) else {
                    if options.malformed_columns == MalformedLinePolicy::Fail {
                        return Err(SchemaError::MalformedColumnLine {
                            line: line_no,
                            table: table.sql_name().to_string(),
                            text: line.to_string(),
                        });
                    }
                    warn!(
                        line = line_no,
                        table = %table.sql_name(),
                        text = %line,
                        "Skipping malformed column line"
                    );
                    return Ok(Step::to(
                        Self::InTable { table, opened_at },
                        LineEvent::ColumnSkipped,
                    ));
                };

                let column = Column::new(
                    table.name(),
                    decl.name,
                    decl.raw_type,
                    decl.attrs,
                    decl.comment,
                    mapper,
                )
                .map_err(|e| SchemaError::UnsupportedType {
                    line: line_no,
                    table: table.sql_name().to_string(),
                    column: decl.name.to_string(),
                    raw_type: e.raw_type,
                })?;
                table.push_column(column);

                Ok(Step::to(
                    Self::InTable { table, opened_at },
                    LineEvent::ColumnAdded,
                ))
            }
        }
    }

    /// Checks that the input did not end inside a table body.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnterminatedTable`] when called in
    /// [`ParserState::InTable`].
    pub fn finish(self) -> Result<()> {
        match self {
            Self::SeekingTable => Ok(()),
            Self::InTable { table, opened_at } => Err(SchemaError::UnterminatedTable {
                table: table.sql_name().to_string(),
                line: opened_at,
            }),
        }
    }

    /// Returns the table being built, if any.
    #[must_use]
    pub const fn current_table(&self) -> Option<&Table> {
        match self {
            Self::SeekingTable => None,
            Self::InTable { table, .. } => Some(table),
        }
    }
}

/// A column line split into its parts.
#[derive(Debug, PartialEq, Eq)]
struct ColumnDecl<'a> {
    name: &'a str,
    raw_type: &'a str,
    attrs: String,
    comment: Option<String>,
}

impl<'a> ColumnDecl<'a> {
    /// Splits a column line, or returns `None` when it has no type token.
    ///
    /// Only the first `--` starts the comment. Tokens are separated by
    /// single spaces.
    fn split(line: &'a str) -> Option<Self> {
        let (decl, comment) = match line.split_once(COMMENT_MARKER) {
            Some((decl, comment)) => (decl, Some(comment.trim().to_string())),
            None => (line, None),
        };

        let mut parts = decl.trim().trim_end_matches(',').split(' ');
        let name = parts.next()?;
        let raw_type = parts.next()?;
        let attrs = parts.collect::<Vec<_>>().join(" ");

        Some(Self {
            name,
            raw_type,
            attrs,
            comment,
        })
    }
}

/// Parses schema dumps into a [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaParser<E = BraceExtractor, O = NoopObserver> {
    mapper: TypeMapper<E>,
    options: ParseOptions,
    observer: O,
}

impl SchemaParser {
    /// Creates a parser with the default extractor and no observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: SubtypeExtractor, O: ParseObserver> SchemaParser<E, O> {
    /// Replaces the sub-type extractor used for JSON columns.
    #[must_use]
    pub fn with_extractor<E2: SubtypeExtractor>(self, extractor: E2) -> SchemaParser<E2, O> {
        SchemaParser {
            mapper: TypeMapper::with_extractor(extractor),
            options: self.options,
            observer: self.observer,
        }
    }

    /// Replaces the observer.
    #[must_use]
    pub fn with_observer<O2: ParseObserver>(self, observer: O2) -> SchemaParser<E, O2> {
        SchemaParser {
            mapper: self.mapper,
            options: self.options,
            observer,
        }
    }

    /// Sets the parse options.
    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parses a whole schema dump.
    ///
    /// Either every table is parsed or an error is returned; no partial
    /// schema is produced.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] encountered.
    pub fn parse(&mut self, text: &str) -> Result<Schema> {
        let mut schema = Schema::new();
        let mut state = ParserState::SeekingTable;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let step = state.step(line_no, line, &self.mapper, &self.options)?;

            match step.event {
                LineEvent::TableOpened => {
                    if let Some(table) = step.state.current_table() {
                        self.observer.on_table_open(line_no, table);
                    }
                }
                LineEvent::ColumnAdded => {
                    if let Some(table) = step.state.current_table() {
                        if let Some(column) = table.columns().last() {
                            self.observer.on_column(line_no, table, column);
                        }
                    }
                }
                LineEvent::Ignored | LineEvent::ColumnSkipped | LineEvent::TableClosed => {}
            }

            if let Some(table) = step.completed {
                self.observer.on_table_close(line_no, &table);
                schema.push_table(table);
            }
            state = step.state;
        }

        state.finish()?;
        Ok(schema)
    }
}

/// Parses a schema dump with default settings.
///
/// # Errors
///
/// See [`SchemaParser::parse`].
pub fn parse_schema(text: &str) -> Result<Schema> {
    SchemaParser::new().parse(text)
}
