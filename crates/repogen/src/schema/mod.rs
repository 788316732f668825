//! Schema metadata types for database tables and columns.
//!
//! These types are the read-only input to the generation engine. They are
//! built once by the schema-discovery side (or deserialized from a schema
//! file) and never mutated during generation.

use serde::{Deserialize, Serialize};

use crate::naming;
use crate::typemap;

/// Semantic data kind of a column, independent of the physical SQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    String,
    Int,
    Decimal,
    Bool,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    Guid,
    Binary,
    Xml,
}

/// Column metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Physical column name.
    pub name: String,

    /// Semantic data kind.
    pub kind: DataKind,

    /// Physical SQL type name (e.g. "nvarchar"). Defaulted from the kind
    /// when absent.
    #[serde(default)]
    pub sql_type: String,

    /// Physical SQL type code from the catalog.
    #[serde(default)]
    pub sql_type_code: i32,

    /// Maximum length for string columns (0 = unbounded).
    #[serde(default)]
    pub max_length: i64,

    /// Maximum number of integer digits for decimal columns.
    #[serde(default)]
    pub max_int_length: i32,

    /// Maximum number of decimal places for decimal columns.
    #[serde(default)]
    pub max_decimal_length: i32,

    /// Whether the column accepts NULL.
    #[serde(default)]
    pub nullable: bool,

    /// Whether the column is part of the primary key.
    #[serde(default)]
    pub primary_key: bool,

    /// Whether the column value is database-assigned (identity).
    #[serde(default)]
    pub identity: bool,

    /// Derived C# property identifier. Filled in by [`Table::new`].
    #[serde(skip)]
    pub property_name: String,

    /// Derived C# field/parameter identifier. Filled in by [`Table::new`].
    #[serde(skip)]
    pub field_name: String,
}

impl Column {
    /// Backing-field identifier (`_userId`) for the generated model class.
    ///
    /// Keyword escaping does not apply here since the underscore prefix
    /// already makes the identifier legal.
    pub fn backing_field(&self) -> String {
        format!("_{}", self.field_name.trim_start_matches('@'))
    }
}

/// Table metadata.
///
/// Columns stay in schema order for the lifetime of the value; that order
/// fixes composite-key tuple layout and parameter ordering everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Schema name.
    pub schema: String,

    /// Physical table name.
    pub name: String,

    /// Derived class name. Filled in by [`Table::new`].
    #[serde(skip)]
    pub class_name: String,

    /// Column definitions in schema order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Build a table, deriving all C# identifiers up front.
    ///
    /// Generating for a table with zero columns is outside the contract;
    /// callers must not construct one.
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<Column>,
    ) -> Self {
        let mut table = Table {
            schema: schema.into(),
            name: name.into(),
            class_name: String::new(),
            columns,
        };
        table.derive_identifiers();
        table
    }

    fn derive_identifiers(&mut self) {
        debug_assert!(
            !self.columns.is_empty(),
            "tables without columns are outside the generation contract"
        );
        self.class_name = naming::class_name(&self.name);
        naming::derive_member_names(&mut self.columns);
        for col in &mut self.columns {
            if col.sql_type.is_empty() {
                col.sql_type = typemap::default_sql_type(col.kind).to_string();
            }
        }
    }

    /// Fully qualified table name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Primary key columns in schema order.
    pub fn primary_keys(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.primary_key).collect()
    }

    /// Columns outside the primary key, in schema order.
    pub fn non_primary_keys(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| !c.primary_key).collect()
    }

    /// Whether the table has a primary key at all.
    pub fn has_pk(&self) -> bool {
        self.columns.iter().any(|c| c.primary_key)
    }

    /// Whether the primary key spans more than one column.
    pub fn has_composite_key(&self) -> bool {
        self.columns.iter().filter(|c| c.primary_key).count() > 1
    }
}
