//! Generate model source files from a SQLite schema.
//!
//! `poorman` reads the `CREATE TABLE` statements of a database, maps every
//! column to a Go type and renders one file per table through a Jinja
//! template:
//!
//! ```sql
//! CREATE TABLE photos (
//!   id number primary key,
//!   taken_at text, -- datetime
//!   meta json -- { Width float64 }
//! );
//! ```
//!
//! becomes `out/photo.go` containing
//!
//! ```go
//! type Photo_Meta struct { Width float64 }
//!
//! type Photo struct {
//!     Id      float64
//!     TakenAt time.Time
//!     Meta    Photo_Meta
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate models from a database
//! poorman generate --database sqlite:photos.db --out-dir data
//!
//! # Use the sqlite3 shell and a custom template
//! poorman generate --sqlite3 photos.db --template templates/model.go.jinja
//!
//! # Print the parsed schema
//! poorman inspect --schema-file schema.sql
//! ```

pub mod error;
pub mod generator;
pub mod output;
pub mod source;
pub mod template;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{GenerateError, Result};
    pub use crate::generator::{GenerateConfig, GeneratedFile, GenerationReport, Generator};
    pub use crate::output::{CodeFormatter, CommandFormatter, FsWriter, OutputWriter};
    pub use crate::source::SchemaSource;
    pub use crate::template::{
        DEFAULT_TEMPLATE, MiniJinjaRenderer, RenderContext, TemplateRenderer,
    };
    pub use poorman_core::{
        JsonObjectExtractor, ParseOptions, Schema, SchemaParser, TracingObserver,
    };
}
