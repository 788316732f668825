//! Source text emission.
//!
//! The [`CodeGenerator`] trait is the engine's public seam; the
//! [`CSharpSqlServerGenerator`] implementation produces one model and one
//! repository per table, delegating the heavy lifting to the `model` and
//! `repository` submodules.

mod model;
mod repository;

use tracing::debug;

use crate::config::GenerationConfig;
use crate::error::Result;
use crate::naming;
use crate::schema::Table;
use crate::version::VersionGate;

/// Number of spaces per indent level in generated output.
const INDENT: &str = "    ";

/// Indented text buffer for building generated source.
#[derive(Debug, Default)]
pub(crate) struct CodeWriter {
    buf: String,
}

impl CodeWriter {
    fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Append an indented line.
    fn line(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Append an empty line.
    fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Append pre-formatted text verbatim.
    fn raw(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// A code generator for one output language/runtime family.
pub trait CodeGenerator {
    /// Generate the entity type for a table.
    fn generate_model(&self, table: &Table) -> Result<String>;

    /// Generate the repository interface and implementation for a table.
    fn generate_repository(&self, table: &Table) -> Result<String>;

    /// File extension for persisted artifacts, without the dot.
    fn file_extension(&self) -> &'static str;
}

/// Extension point invoked once per repository.
///
/// The returned text is concatenated verbatim before the repository body.
/// No wrapper configured means no extra text, not an error.
pub trait RepoWrapper {
    fn generate_repo_wrapper(&self, table: &Table) -> String;
}

/// C# code generator for SQL Server schemas.
pub struct CSharpSqlServerGenerator {
    config: GenerationConfig,
    gate: VersionGate,
    wrapper: Option<Box<dyn RepoWrapper>>,
}

impl CSharpSqlServerGenerator {
    /// Create a generator, validating the configuration up front.
    pub fn new(config: GenerationConfig) -> Result<Self> {
        config.validate()?;
        let gate = config.gate();
        Ok(Self {
            config,
            gate,
            wrapper: None,
        })
    }

    /// Attach a wrapper extension invoked once per repository.
    pub fn with_wrapper(mut self, wrapper: Box<dyn RepoWrapper>) -> Self {
        self.wrapper = Some(wrapper);
        self
    }

    /// Templated model class name for a table.
    fn model_class(&self, table: &Table) -> String {
        naming::apply_class_template(&self.config.class_name_format, &table.class_name)
    }
}

impl CodeGenerator for CSharpSqlServerGenerator {
    fn generate_model(&self, table: &Table) -> Result<String> {
        debug_assert!(
            !table.columns.is_empty(),
            "tables without columns are outside the generation contract"
        );
        debug!("generating model for {}", table.full_name());
        Ok(model::generate(self, table))
    }

    fn generate_repository(&self, table: &Table) -> Result<String> {
        debug_assert!(
            !table.columns.is_empty(),
            "tables without columns are outside the generation contract"
        );
        debug!("generating repository for {}", table.full_name());
        Ok(repository::generate(self, table))
    }

    fn file_extension(&self) -> &'static str {
        "cs"
    }
}
