//! Template rendering.
//!
//! Each table is rendered through a Jinja template receiving three
//! variables:
//!
//! - `table`: `name`, `sql_name` and `columns` (each with `name`,
//!   `sql_name`, `raw_type`, `attrs`, `comment`, `mapped_type` and
//!   `embedded`, the embedded type name of JSON columns)
//! - `struct`: the model type declaration
//! - `subtypes`: declarations of the embedded JSON types
//!
//! Referencing any other variable is an error.

use std::path::Path;

use minijinja::{Environment, UndefinedBehavior};
use poorman_core::{Column, Table, TargetLanguage};
use serde::Serialize;

use crate::error::{GenerateError, Result};

/// Name of the built-in Go model template.
pub const DEFAULT_TEMPLATE: &str = "model.go.jinja";

const DEFAULT_TEMPLATE_SOURCE: &str = include_str!("../templates/model.go.jinja");

/// A column as seen by templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnContext {
    pub name: String,
    pub sql_name: String,
    pub raw_type: String,
    pub attrs: String,
    pub comment: Option<String>,
    pub mapped_type: String,
    /// Embedded type name for JSON columns.
    pub embedded: Option<String>,
}

/// A table as seen by templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableContext {
    pub name: String,
    pub sql_name: String,
    pub columns: Vec<ColumnContext>,
}

/// Everything a template gets to render one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    pub table: TableContext,
    #[serde(rename = "struct")]
    pub struct_decl: String,
    pub subtypes: String,
}

impl RenderContext {
    /// Builds the context for a table in the given target language.
    #[must_use]
    pub fn new(table: &Table, target: &impl TargetLanguage) -> Self {
        let column = |c: &Column| ColumnContext {
            name: c.name().to_string(),
            sql_name: c.sql_name().to_string(),
            raw_type: c.raw_type().to_string(),
            attrs: c.attrs().to_string(),
            comment: c.comment().map(str::to_string),
            mapped_type: target.type_name(c.mapped_type()),
            embedded: c.mapped_type().embedded_name().map(str::to_string),
        };

        Self {
            table: TableContext {
                name: table.name().to_string(),
                sql_name: table.sql_name().to_string(),
                columns: table.columns().iter().map(column).collect(),
            },
            struct_decl: target.struct_decl(table),
            subtypes: target.subtype_decls(table),
        }
    }
}

/// Renders a named template with a table's context.
pub trait TemplateRenderer {
    /// Renders `template` for one table.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Template`] if the template is unknown or
    /// fails to render.
    fn render(&self, template: &str, context: &RenderContext) -> Result<String>;
}

/// MiniJinja-backed renderer with strict undefined handling.
#[derive(Debug)]
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniJinjaRenderer {
    /// Creates a renderer holding only the built-in template.
    ///
    /// # Panics
    ///
    /// Panics if the built-in template does not compile.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_template(DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_SOURCE)
            .expect("Invalid built-in model template");
        Self { env }
    }

    /// Adds a template from source.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Template`] on a syntax error.
    pub fn add_template(&mut self, name: &str, source: String) -> Result<()> {
        self.env
            .add_template_owned(name.to_string(), source)
            .map_err(|e| template_error(name, "", &e))
    }

    /// Adds a template read from a file, registered under its file name.
    ///
    /// Returns the name to render it with.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Template`] if the file cannot be read or
    /// does not compile.
    pub fn add_template_file(&mut self, path: &Path) -> Result<String> {
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        let source = std::fs::read_to_string(path).map_err(|e| GenerateError::Template {
            template: path.display().to_string(),
            table: String::new(),
            message: e.to_string(),
        })?;
        self.add_template(&name, source)?;
        Ok(name)
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &RenderContext) -> Result<String> {
        let table = &context.table.name;
        self.env
            .get_template(template)
            .and_then(|t| t.render(context))
            .map_err(|e| template_error(template, table, &e))
    }
}

fn template_error(template: &str, table: &str, err: &minijinja::Error) -> GenerateError {
    GenerateError::Template {
        template: template.to_string(),
        table: table.to_string(),
        message: err.to_string(),
    }
}
