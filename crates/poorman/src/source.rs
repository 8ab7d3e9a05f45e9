//! Schema acquisition.
//!
//! Every source yields the text of a SQLite `.schema` dump: one
//! `CREATE ...;` statement after another.

use std::path::{Path, PathBuf};
use std::process::Command;

use sqlx::Connection;
use sqlx::sqlite::SqliteConnection;
use tracing::debug;

use crate::error::{GenerateError, Result};

const SCHEMA_QUERY: &str =
    "SELECT sql FROM sqlite_master WHERE sql IS NOT NULL AND name NOT LIKE 'sqlite_%' ORDER BY rowid";

/// Where the schema text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// Read `sqlite_master` of a database through sqlx.
    Database {
        /// Connection URL (`sqlite:photos.db`).
        url: String,
    },
    /// Run the `sqlite3` shell's `.schema` command on a database file.
    Sqlite3Cli {
        /// The sqlite3 executable.
        program: String,
        /// Database file.
        database: PathBuf,
    },
    /// Read a schema dump from a file.
    DumpFile {
        /// Path to the dump.
        path: PathBuf,
    },
}

impl SchemaSource {
    /// Human-readable location of the schema, used in diagnostics.
    #[must_use]
    pub fn locator(&self) -> String {
        match self {
            Self::Database { url } => url.clone(),
            Self::Sqlite3Cli { database, .. } => database.display().to_string(),
            Self::DumpFile { path } => path.display().to_string(),
        }
    }

    /// Fetches the full schema text.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::SchemaUnavailable`] if the database, the
    /// `sqlite3` program or the dump file cannot be read.
    pub async fn load(&self) -> Result<String> {
        debug!(source = %self.locator(), "Loading schema");
        let text = match self {
            Self::Database { url } => self.load_database(url).await,
            Self::Sqlite3Cli { program, database } => self.load_sqlite3(program, database),
            Self::DumpFile { path } => std::fs::read_to_string(path).map_err(|e| self.unavailable(e)),
        }?;
        debug!(bytes = text.len(), "Schema loaded");
        Ok(text)
    }

    async fn load_database(&self, url: &str) -> Result<String> {
        let mut conn = SqliteConnection::connect(url)
            .await
            .map_err(|e| self.unavailable(e))?;
        let statements: Vec<String> = sqlx::query_scalar(SCHEMA_QUERY)
            .fetch_all(&mut conn)
            .await
            .map_err(|e| self.unavailable(e))?;
        conn.close().await.map_err(|e| self.unavailable(e))?;

        Ok(statements
            .iter()
            .map(|sql| format!("{sql};\n"))
            .collect())
    }

    fn load_sqlite3(&self, program: &str, database: &Path) -> Result<String> {
        let output = Command::new(program)
            .arg(database)
            .arg(".schema")
            .output()
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(self.unavailable(format!(
                "{program} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        String::from_utf8(output.stdout).map_err(|e| self.unavailable(e))
    }

    fn unavailable(&self, reason: impl ToString) -> GenerateError {
        GenerateError::SchemaUnavailable {
            locator: self.locator(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dump_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        std::fs::write(&path, "CREATE TABLE tags (\n  label text\n);\n").unwrap();

        let text = SchemaSource::DumpFile { path }.load().await.unwrap();
        assert!(text.starts_with("CREATE TABLE tags ("));
    }

    #[tokio::test]
    async fn test_missing_dump_file_is_unavailable() {
        let source = SchemaSource::DumpFile {
            path: PathBuf::from("/nonexistent/schema.sql"),
        };
        let err = source.load().await.unwrap_err();
        assert!(matches!(
            err,
            GenerateError::SchemaUnavailable { ref locator, .. } if locator == "/nonexistent/schema.sql"
        ));
    }

    #[tokio::test]
    async fn test_database_source_dumps_tables() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("photos.db").display());

        let mut conn = SqliteConnection::connect(&url).await.unwrap();
        sqlx::query("CREATE TABLE photos (\n  id number,\n  taken_at text -- datetime\n)")
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query("CREATE INDEX photos_taken_at ON photos (taken_at)")
            .execute(&mut conn)
            .await
            .unwrap();
        conn.close().await.unwrap();

        let text = SchemaSource::Database { url }.load().await.unwrap();
        assert_eq!(
            text,
            "CREATE TABLE photos (\n  id number,\n  taken_at text -- datetime\n);\n\
             CREATE INDEX photos_taken_at ON photos (taken_at);\n"
        );

        let schema = poorman_core::parse_schema(&text).unwrap();
        assert_eq!(schema.tables()[0].name(), "Photo");
    }

    #[tokio::test]
    async fn test_unreachable_database_is_unavailable() {
        let source = SchemaSource::Database {
            url: "sqlite:///nonexistent/dir/photos.db".to_string(),
        };
        assert!(matches!(
            source.load().await,
            Err(GenerateError::SchemaUnavailable { .. })
        ));
    }

    #[test]
    fn test_missing_sqlite3_program_is_unavailable() {
        let source = SchemaSource::Sqlite3Cli {
            program: "definitely-not-sqlite3".to_string(),
            database: PathBuf::from("photos.db"),
        };
        let err = source
            .load_sqlite3("definitely-not-sqlite3", Path::new("photos.db"))
            .unwrap_err();
        assert!(matches!(err, GenerateError::SchemaUnavailable { .. }));
        assert_eq!(source.locator(), "photos.db");
    }
}
