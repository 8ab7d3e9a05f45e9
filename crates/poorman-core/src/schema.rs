//! Schema model produced by the parser.
//!
//! Tables and columns are built only while parsing and are immutable
//! afterwards: fields are private and exposed through accessors, so a
//! column's mapped type can never drift from the comment it was resolved
//! against.

use serde::Serialize;

use crate::error::UnsupportedType;
use crate::naming::type_name;
use crate::typemap::{MappedType, SubtypeExtractor, TypeMapper};

/// Semantic type of a generated field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum FieldType {
    /// Text.
    String,
    /// A point in time (`text` column annotated `-- datetime`).
    Timestamp,
    /// 64-bit floating point number.
    Float64,
    /// A structured type embedded in a JSON column, named `<Table>_<Column>`.
    Embedded(String),
}

impl FieldType {
    /// Returns the synthesized type name for embedded types.
    #[must_use]
    pub fn embedded_name(&self) -> Option<&str> {
        match self {
            Self::Embedded(name) => Some(name),
            _ => None,
        }
    }
}

/// A structured type declared inline in a JSON column comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Subtype {
    /// Synthesized type name (`<Table>_<Column>`).
    pub name: String,
    /// Declaration body, verbatim from the comment.
    pub body: String,
}

/// A column of a parsed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    sql_name: String,
    name: String,
    raw_type: String,
    attrs: String,
    comment: Option<String>,
    mapped_type: FieldType,
    subtype: Option<Subtype>,
}

impl Column {
    /// Builds a column, resolving its type exactly once.
    pub(crate) fn new<E: SubtypeExtractor>(
        table_name: &str,
        sql_name: &str,
        raw_type: &str,
        attrs: String,
        comment: Option<String>,
        mapper: &TypeMapper<E>,
    ) -> Result<Self, UnsupportedType> {
        let name = type_name(sql_name);
        let MappedType { field_type, subtype } =
            mapper.map(table_name, &name, raw_type, comment.as_deref())?;

        Ok(Self {
            sql_name: sql_name.to_string(),
            name,
            raw_type: raw_type.trim().to_lowercase(),
            attrs,
            comment,
            mapped_type: field_type,
            subtype,
        })
    }

    /// Column identifier as declared in the DDL.
    #[must_use]
    pub fn sql_name(&self) -> &str {
        &self.sql_name
    }

    /// Generated field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased raw type token (`text`, `json`, `number`).
    #[must_use]
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    /// Constraint and default tokens following the type, unparsed.
    #[must_use]
    pub fn attrs(&self) -> &str {
        &self.attrs
    }

    /// Trimmed text after the `--` marker, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Resolved field type.
    #[must_use]
    pub const fn mapped_type(&self) -> &FieldType {
        &self.mapped_type
    }

    /// Sub-type registered while resolving this column's type.
    #[must_use]
    pub const fn subtype(&self) -> Option<&Subtype> {
        self.subtype.as_ref()
    }
}

/// A parsed `CREATE TABLE` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    sql_name: String,
    name: String,
    columns: Vec<Column>,
}

impl Table {
    pub(crate) fn new(sql_name: &str) -> Self {
        Self {
            sql_name: sql_name.to_string(),
            name: type_name(sql_name),
            columns: Vec::new(),
        }
    }

    pub(crate) fn push_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Table identifier as declared in the DDL.
    #[must_use]
    pub fn sql_name(&self) -> &str {
        &self.sql_name
    }

    /// Generated type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Gets a column by its SQL name.
    #[must_use]
    pub fn get_column(&self, sql_name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.sql_name == sql_name)
    }

    /// Sub-types registered by this table's columns, in column order.
    pub fn subtypes(&self) -> impl Iterator<Item = &Subtype> {
        self.columns.iter().filter_map(Column::subtype)
    }
}

/// All tables of a schema dump, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Tables in declaration order.
    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Gets a table by its SQL name.
    #[must_use]
    pub fn get_table(&self, sql_name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.sql_name == sql_name)
    }

    /// Returns the number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no table was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Consumes the schema and returns its tables.
    #[must_use]
    pub fn into_tables(self) -> Vec<Table> {
        self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(table: &Table, sql_name: &str, raw_type: &str, comment: Option<&str>) -> Column {
        Column::new(
            table.name(),
            sql_name,
            raw_type,
            String::new(),
            comment.map(str::to_string),
            &TypeMapper::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_embedded_name() {
        assert_eq!(
            FieldType::Embedded("Photo_Meta".into()).embedded_name(),
            Some("Photo_Meta")
        );
        assert_eq!(FieldType::Timestamp.embedded_name(), None);
    }

    #[test]
    fn test_table_names_are_normalized() {
        let table = Table::new("user_accounts");
        assert_eq!(table.sql_name(), "user_accounts");
        assert_eq!(table.name(), "UserAccount");
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_column_keeps_declaration_details() {
        let table = Table::new("photos");
        let col = column(&table, "taken_at", " TEXT ", Some("datetime"));

        assert_eq!(col.sql_name(), "taken_at");
        assert_eq!(col.name(), "TakenAt");
        assert_eq!(col.raw_type(), "text");
        assert_eq!(col.comment(), Some("datetime"));
        assert_eq!(col.mapped_type(), &FieldType::Timestamp);
        assert!(col.subtype().is_none());
    }

    #[test]
    fn test_table_collects_subtypes_in_column_order() {
        let mut table = Table::new("photos");
        table.push_column(column(&table, "exif", "json", Some("{ Iso string }")));
        table.push_column(column(&table, "id", "number", None));
        table.push_column(column(&table, "meta", "json", Some("{ W float64 }")));

        let names: Vec<_> = table.subtypes().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Photo_Exif", "Photo_Meta"]);
        assert_eq!(table.get_column("id").map(Column::name), Some("Id"));
    }

    #[test]
    fn test_field_type_serializes_with_kind() {
        let json = serde_json::to_value(FieldType::Embedded("Photo_Meta".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "embedded", "name": "Photo_Meta"}));
        assert_eq!(
            serde_json::to_value(FieldType::Float64).unwrap(),
            serde_json::json!({"kind": "float64"})
        );
    }
}
