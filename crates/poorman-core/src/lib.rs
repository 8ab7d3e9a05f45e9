//! # poorman-core
//!
//! Turns a SQLite `.schema` dump into a typed model of tables and columns
//! that code generators can walk.
//!
//! This crate provides:
//! - A line-oriented `CREATE TABLE` parser driven by an explicit state machine
//! - Identifier normalization from `snake_case` SQL names to type/field names
//! - A type mapper that resolves column types, including embedded sub-types
//!   declared inline in JSON column comments
//! - Target-language declaration rendering (Go)
//!
//! ## Parsing a schema
//!
//! ```rust
//! use poorman_core::{FieldType, parse_schema};
//!
//! let schema = parse_schema(
//!     "CREATE TABLE photos (\n\
//!      id number,\n\
//!      taken_at text -- datetime\n\
//!      );",
//! )
//! .unwrap();
//!
//! let photo = &schema.tables()[0];
//! assert_eq!(photo.name(), "Photo");
//! assert_eq!(photo.columns()[1].name(), "TakenAt");
//! assert_eq!(photo.columns()[1].mapped_type(), &FieldType::Timestamp);
//! ```

pub mod error;
pub mod naming;
pub mod observer;
pub mod parser;
pub mod schema;
pub mod target;
pub mod typemap;

pub use error::{SchemaError, UnsupportedType};
pub use observer::{NoopObserver, ParseObserver, TracingObserver};
pub use parser::{
    LineEvent, MalformedLinePolicy, ParseOptions, ParserState, SchemaParser, Step, parse_schema,
};
pub use schema::{Column, FieldType, Schema, Subtype, Table};
pub use target::{GoTarget, TargetLanguage};
pub use typemap::{
    BraceExtractor, JsonObjectExtractor, MappedType, SubtypeExtractor, TypeMapper,
};
