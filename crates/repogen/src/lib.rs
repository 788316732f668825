//! Schema-driven C# data-access code generation.
//!
//! Takes relational table metadata and produces, per table, an entity class
//! with change tracking and validation plus a repository class exposing
//! CRUD, bulk, merge, search, and per-column find operations against SQL
//! Server. Output syntax adapts to a configured target framework and C#
//! language version.

pub mod config;
pub mod emit;
pub mod error;
pub mod naming;
pub mod schema;
pub mod typemap;
pub mod validation;
pub mod version;

pub use config::GenerationConfig;
pub use emit::{CSharpSqlServerGenerator, CodeGenerator, RepoWrapper};
pub use error::{GeneratorError, Result};
pub use schema::{Column, DataKind, Table};
pub use version::{CSharpVersion, TargetFramework, VersionGate};
