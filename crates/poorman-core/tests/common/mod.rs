#![allow(dead_code)]

use poorman_core::{Schema, SchemaError, Table, parse_schema};

pub fn parse(text: &str) -> Schema {
    parse_schema(text).unwrap_or_else(|e| panic!("Failed to parse:\n{text}\nError: {e}"))
}

pub fn parse_err(text: &str) -> SchemaError {
    parse_schema(text)
        .err()
        .unwrap_or_else(|| panic!("Expected parse error for:\n{text}"))
}

pub fn parse_table(text: &str) -> Table {
    let mut tables = parse(text).into_tables();
    assert_eq!(tables.len(), 1, "Expected exactly one table in:\n{text}");
    tables.remove(0)
}

pub fn column_names(table: &Table) -> Vec<&str> {
    table.columns().iter().map(|c| c.name()).collect()
}
