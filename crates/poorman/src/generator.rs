//! Per-table model generation.
//!
//! The generator renders one file per table and hands it to the writer,
//! then to the optional formatter. The first render or write failure aborts
//! the run; formatter failures are only logged.

use std::path::PathBuf;

use poorman_core::{GoTarget, Schema, Table, TargetLanguage};
use tracing::{info, warn};

use crate::error::Result;
use crate::output::{CodeFormatter, OutputWriter};
use crate::template::{DEFAULT_TEMPLATE, RenderContext, TemplateRenderer};

/// Generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Directory receiving one file per table.
    pub out_dir: PathBuf,
    /// Name of the template to render.
    pub template: String,
    /// Render without writing or formatting.
    pub dry_run: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            template: DEFAULT_TEMPLATE.to_string(),
            dry_run: false,
        }
    }
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Generated type name of the table.
    pub table: String,
    /// Destination path.
    pub path: PathBuf,
    /// Rendered text.
    pub text: String,
    /// Whether the file was written to disk.
    pub written: bool,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files in table order.
    pub files: Vec<GeneratedFile>,
    /// Number of files the formatter failed on.
    pub format_failures: usize,
}

/// Renders and writes model files for a schema.
pub struct Generator<R, W, T = GoTarget> {
    renderer: R,
    writer: W,
    target: T,
    formatter: Option<Box<dyn CodeFormatter>>,
    config: GenerateConfig,
}

impl<R: TemplateRenderer, W: OutputWriter> Generator<R, W> {
    /// Creates a generator for Go models, without formatter.
    #[must_use]
    pub fn new(renderer: R, writer: W, config: GenerateConfig) -> Self {
        Self::with_target(renderer, writer, GoTarget, config)
    }
}

impl<R: TemplateRenderer, W: OutputWriter, T: TargetLanguage> Generator<R, W, T> {
    /// Creates a generator for the given target language.
    #[must_use]
    pub fn with_target(renderer: R, writer: W, target: T, config: GenerateConfig) -> Self {
        Self {
            renderer,
            writer,
            target,
            formatter: None,
            config,
        }
    }

    /// Runs `formatter` on every written file.
    #[must_use]
    pub fn formatter(mut self, formatter: impl CodeFormatter + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Generates one file per table, in schema order.
    ///
    /// # Errors
    ///
    /// Returns the first template or write error.
    pub fn generate(&self, schema: &Schema) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();
        for table in schema.tables() {
            let (file, formatted) = self.generate_table(table)?;
            if !formatted {
                report.format_failures += 1;
            }
            report.files.push(file);
        }

        info!(
            tables = report.files.len(),
            language = self.target.name(),
            dry_run = self.config.dry_run,
            "Generation finished"
        );
        Ok(report)
    }

    /// Generates the file for one table.
    ///
    /// Also returns whether formatting succeeded (or was not needed).
    fn generate_table(&self, table: &Table) -> Result<(GeneratedFile, bool)> {
        let context = RenderContext::new(table, &self.target);
        let text = self.renderer.render(&self.config.template, &context)?;
        let path = self.config.out_dir.join(self.target.file_name(table));

        let mut file = GeneratedFile {
            table: table.name().to_string(),
            path,
            text,
            written: false,
        };
        if self.config.dry_run {
            return Ok((file, true));
        }

        self.writer.write(&file.path, &file.text)?;
        file.written = true;
        info!(table = %file.table, path = %file.path.display(), "Generated model");

        let formatted = match &self.formatter {
            Some(formatter) => match formatter.format(&file.path) {
                Ok(()) => true,
                Err(message) => {
                    warn!(path = %file.path.display(), %message, "Formatting failed");
                    false
                }
            },
            None => true,
        };
        Ok((file, formatted))
    }
}
