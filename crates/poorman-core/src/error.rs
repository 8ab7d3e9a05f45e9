//! Error types for schema parsing and type mapping.

/// A column type the type mapper has no rule for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported column type '{raw_type}'")]
pub struct UnsupportedType {
    /// The raw type token as written in the DDL.
    pub raw_type: String,
}

/// Errors that abort parsing of a schema dump.
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A `CREATE TABLE` line without a table name.
    #[error("Line {line}: malformed table header '{text}'")]
    MalformedTableHeader {
        /// Line number of the header.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// A column line inside a table body with fewer than two tokens.
    #[error("Line {line}: malformed column line in table '{table}': '{text}'")]
    MalformedColumnLine {
        /// Line number of the column declaration.
        line: usize,
        /// SQL name of the table being built.
        table: String,
        /// The offending line.
        text: String,
    },

    /// The input ended before the table body was closed with `);`.
    #[error("Table '{table}' opened on line {line} is never closed")]
    UnterminatedTable {
        /// SQL name of the unterminated table.
        table: String,
        /// Line number of the `CREATE TABLE` header.
        line: usize,
    },

    /// A column declared with a type the type mapper does not handle.
    #[error("Line {line}: column '{table}.{column}' has unsupported type '{raw_type}'")]
    UnsupportedType {
        /// Line number of the column declaration.
        line: usize,
        /// SQL name of the table.
        table: String,
        /// SQL name of the column.
        column: String,
        /// The raw type token.
        raw_type: String,
    },
}

/// Result type for schema parsing.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_location() {
        let err = SchemaError::UnsupportedType {
            line: 4,
            table: "photos".into(),
            column: "data".into(),
            raw_type: "blob".into(),
        };
        assert_eq!(
            err.to_string(),
            "Line 4: column 'photos.data' has unsupported type 'blob'"
        );

        let err = SchemaError::UnterminatedTable {
            table: "users".into(),
            line: 1,
        };
        assert_eq!(err.to_string(), "Table 'users' opened on line 1 is never closed");
    }
}
