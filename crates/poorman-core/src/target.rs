//! Target language declarations.
//!
//! A [`TargetLanguage`] knows how to spell field types and type
//! declarations for the language the models are generated in.

use std::fmt::Write;

use crate::schema::{FieldType, Table};

/// Trait for language-specific declaration rendering.
pub trait TargetLanguage {
    /// Returns the language name.
    fn name(&self) -> &'static str;

    /// File extension of generated files, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Returns the type name for the given field type.
    fn type_name(&self, field_type: &FieldType) -> String;

    /// Renders the declaration of the table's model type, one field per
    /// column in declaration order.
    fn struct_decl(&self, table: &Table) -> String;

    /// Renders the declarations of the table's embedded sub-types.
    fn subtype_decls(&self, table: &Table) -> String;

    /// Output file name for a table (`<lower-cased name>.<extension>`).
    fn file_name(&self, table: &Table) -> String {
        format!("{}.{}", table.name().to_lowercase(), self.file_extension())
    }
}

/// Go structs, as consumed by the `sqlitex` data layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoTarget;

impl GoTarget {
    /// Creates a new Go target.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TargetLanguage for GoTarget {
    fn name(&self) -> &'static str {
        "go"
    }

    fn file_extension(&self) -> &'static str {
        "go"
    }

    fn type_name(&self, field_type: &FieldType) -> String {
        match field_type {
            FieldType::String => "string".to_string(),
            FieldType::Timestamp => "time.Time".to_string(),
            FieldType::Float64 => "float64".to_string(),
            FieldType::Embedded(name) => name.clone(),
        }
    }

    fn struct_decl(&self, table: &Table) -> String {
        let mut out = format!("type {} struct {{\n", table.name());
        for column in table.columns() {
            let _ = writeln!(
                out,
                "\t{} {}",
                column.name(),
                self.type_name(column.mapped_type())
            );
        }
        out.push_str("}\n");
        out
    }

    fn subtype_decls(&self, table: &Table) -> String {
        let mut out = String::new();
        for subtype in table.subtypes() {
            let _ = writeln!(out, "type {} struct {}", subtype.name, subtype.body);
        }
        out
    }
}
