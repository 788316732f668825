//! Derivation of per-column business-rule checks.
//!
//! One strategy per data kind, selected by static dispatch over the closed
//! enumeration at schema-load time. The emitters render the rules; this
//! module only decides which rules a column carries and in what order.

use crate::schema::{Column, DataKind};

/// A single validation strategy attached to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
    /// Non-nullable string column must carry a non-empty value.
    RequiredString,
    /// Non-nullable binary column must carry a value.
    RequiredBinary,
    /// String length must not exceed the column's max length.
    MaxLength(i64),
    /// Integral part must not exceed `10^max_int_length - 1`.
    DecimalMagnitude(i64),
    /// Decimal-place count must not exceed the column's scale.
    DecimalPlaces(i32),
    /// Value must differ from the kind's minimum sentinel.
    NotMinSentinel(&'static str),
    /// Value must differ from `Guid.Empty`.
    NotEmptyGuid,
}

impl ValidationRule {
    /// Error message carried by the generated `ValidationError`.
    pub fn message(&self) -> String {
        match self {
            ValidationRule::RequiredString | ValidationRule::RequiredBinary => {
                "Value cannot be null".to_string()
            }
            ValidationRule::MaxLength(max) => format!("Max length is {max}"),
            ValidationRule::DecimalMagnitude(max) => format!("Value cannot exceed {max}"),
            ValidationRule::DecimalPlaces(places) => format!(
                "Value cannot have more than {} decimal place{}",
                places,
                if *places > 1 { "s" } else { "" }
            ),
            ValidationRule::NotMinSentinel(_) | ValidationRule::NotEmptyGuid => {
                "Value cannot be default.".to_string()
            }
        }
    }
}

/// Derive the ordered rule list for one column.
///
/// Integer, boolean, and XML columns carry no rules.
pub fn rules_for(col: &Column) -> Vec<ValidationRule> {
    let mut rules = Vec::new();
    match col.kind {
        DataKind::String => {
            if !col.nullable {
                rules.push(ValidationRule::RequiredString);
            }
            if col.max_length > 0 {
                rules.push(ValidationRule::MaxLength(col.max_length));
            }
        }
        DataKind::Binary => {
            if !col.nullable {
                rules.push(ValidationRule::RequiredBinary);
            }
        }
        DataKind::Decimal => {
            rules.push(ValidationRule::DecimalMagnitude(max_integral(
                col.max_int_length,
            )));
            rules.push(ValidationRule::DecimalPlaces(col.max_decimal_length));
        }
        DataKind::DateTime => {
            rules.push(ValidationRule::NotMinSentinel("DateTime.MinValue"));
        }
        DataKind::TimeSpan => {
            rules.push(ValidationRule::NotMinSentinel("TimeSpan.MinValue"));
        }
        DataKind::DateTimeOffset => {
            rules.push(ValidationRule::NotMinSentinel("DateTimeOffset.MinValue"));
        }
        DataKind::Guid => rules.push(ValidationRule::NotEmptyGuid),
        DataKind::Int | DataKind::Bool | DataKind::Xml => {}
    }
    rules
}

/// Largest integral value with `digits` decimal digits (999 for 3).
fn max_integral(digits: i32) -> i64 {
    let mut max = 0i64;
    for _ in 0..digits {
        max = max * 10 + 9;
    }
    max
}
