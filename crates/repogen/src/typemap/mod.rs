//! Mapping from column data kinds to C# type representations.
//!
//! Pure functions over the closed [`DataKind`] enumeration: CLR type names,
//! the nullable-wrapper rule, `DataRow` accessor selection, and the search
//! boundary representation. Validation rules live in [`crate::validation`].

use crate::schema::{Column, DataKind};

/// SQL type codes whose registered column definitions carry an explicit
/// length suffix.
const SQL_PRECISION_TYPE_CODES: &[i32] = &[35, 60, 62, 99, 106, 108, 122, 167, 175, 231, 239];

/// CLR type name for a data kind.
pub fn clr_type(kind: DataKind) -> &'static str {
    match kind {
        DataKind::String => "String",
        DataKind::Int => "Int32",
        DataKind::Decimal => "Decimal",
        DataKind::Bool => "Boolean",
        DataKind::DateTime => "DateTime",
        DataKind::DateTimeOffset => "DateTimeOffset",
        DataKind::TimeSpan => "TimeSpan",
        DataKind::Guid => "Guid",
        DataKind::Binary => "Byte[]",
        DataKind::Xml => "XmlDocument",
    }
}

/// Default physical SQL type name for a kind, used when the schema source
/// did not supply one.
pub fn default_sql_type(kind: DataKind) -> &'static str {
    match kind {
        DataKind::String => "nvarchar",
        DataKind::Int => "int",
        DataKind::Decimal => "decimal",
        DataKind::Bool => "bit",
        DataKind::DateTime => "datetime",
        DataKind::DateTimeOffset => "datetimeoffset",
        DataKind::TimeSpan => "time",
        DataKind::Guid => "uniqueidentifier",
        DataKind::Binary => "varbinary",
        DataKind::Xml => "xml",
    }
}

/// Whether the kind takes a `?` wrapper when its column is nullable.
///
/// Strings, binary arrays, and XML documents are reference types and are
/// never wrapped.
pub fn wraps_nullable(kind: DataKind) -> bool {
    !matches!(kind, DataKind::String | DataKind::Binary | DataKind::Xml)
}

/// Declared C# type for a column, including the nullable wrapper.
pub fn declared_type(col: &Column) -> String {
    let base = clr_type(col.kind);
    if wraps_nullable(col.kind) && col.nullable {
        format!("{base}?")
    } else {
        base.to_string()
    }
}

/// `DataRow` accessor used by the generated `ToItem` for a column.
pub fn row_accessor(col: &Column) -> String {
    match col.kind {
        DataKind::Binary => "GetByteArray".to_string(),
        kind if wraps_nullable(kind) && col.nullable => {
            format!("GetNullable{}", clr_type(kind))
        }
        kind => format!("Get{}", clr_type(kind)),
    }
}

/// Parameter type at the search boundary.
///
/// Every value kind is wrapped so "not supplied" is representable; XML
/// surfaces as a string and carries an explicit type hint instead.
pub fn search_param_type(kind: DataKind) -> String {
    match kind {
        DataKind::Xml => "String".to_string(),
        kind if wraps_nullable(kind) => format!("{}?", clr_type(kind)),
        kind => clr_type(kind).to_string(),
    }
}

/// Parameter type for the generated find methods.
pub fn find_param_type(kind: DataKind) -> &'static str {
    match kind {
        DataKind::Xml => "String",
        kind => clr_type(kind),
    }
}

/// How "parameter was supplied" is detected at the search boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppliedCheck {
    /// `x.HasValue` on a wrapped value type.
    HasValue,
    /// `!string.IsNullOrEmpty(x)`.
    NonEmptyString,
    /// `x.Any()` on an array.
    HasElements,
    /// `x != null` reference check.
    NotNull,
}

/// Supplied-detection strategy for a kind.
pub fn supplied_check(kind: DataKind) -> SuppliedCheck {
    match kind {
        DataKind::String => SuppliedCheck::NonEmptyString,
        DataKind::Binary => SuppliedCheck::HasElements,
        DataKind::Xml => SuppliedCheck::NotNull,
        _ => SuppliedCheck::HasValue,
    }
}

/// Kinds that need an explicit CLR type hint at the query boundary.
pub fn needs_type_hint(kind: DataKind) -> bool {
    matches!(kind, DataKind::Xml)
}

/// Length suffix for a registered column definition, e.g. `(50)`.
///
/// Only SQL types with an explicit precision carry one; the value is the
/// larger of the character length and the integer-digit length.
pub fn sql_length_suffix(col: &Column) -> String {
    if SQL_PRECISION_TYPE_CODES.contains(&col.sql_type_code) {
        format!("({})", col.max_length.max(col.max_int_length as i64))
    } else {
        String::new()
    }
}
