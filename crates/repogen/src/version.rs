//! Dialect-variant selection across the two output version axes.
//!
//! [`VersionGate`] is the single decision authority for every piece of
//! emission that must choose between equivalent syntactic variants. Emitters
//! never compare versions inline; they ask the gate.

use serde::{Deserialize, Serialize};

use crate::schema::Column;

/// Target .NET framework version (ordinal axis).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TargetFramework {
    Framework35,
    Framework40,
    Framework45,
    Framework48,
}

/// Target C# language version (ordinal axis).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CSharpVersion {
    CSharp3,
    CSharp4,
    CSharp5,
    CSharp6,
    CSharp7,
}

/// Single source of truth for version-dependent syntax selection.
#[derive(Debug, Clone, Copy)]
pub struct VersionGate {
    framework: TargetFramework,
    csharp: CSharpVersion,
}

impl VersionGate {
    pub fn new(framework: TargetFramework, csharp: CSharpVersion) -> Self {
        Self { framework, csharp }
    }

    /// `nameof(...)` property-identity tokens are available.
    pub fn supports_nameof(&self) -> bool {
        self.csharp >= CSharpVersion::CSharp6
    }

    /// `[Key]` attributes and the DataAnnotations using line are emitted.
    pub fn emits_key_attribute(&self) -> bool {
        self.framework >= TargetFramework::Framework40
    }

    /// `[Table]` attributes and the Schema using line are emitted.
    pub fn emits_table_attribute(&self) -> bool {
        self.framework >= TargetFramework::Framework45
    }

    /// Property accessors use expression bodies (`get => _x;`).
    pub fn expression_bodied_accessors(&self) -> bool {
        self.csharp >= CSharpVersion::CSharp7
    }

    /// Search parameter lists may use optional `= null` defaults.
    pub fn optional_parameters(&self) -> bool {
        self.csharp >= CSharpVersion::CSharp4
    }

    /// Setter change notification can rely on `[CallerMemberName]`, so the
    /// identity argument is elided.
    pub fn caller_member_name(&self) -> bool {
        self.framework >= TargetFramework::Framework45
    }

    /// Render a property identity: a compile-checked token when available,
    /// otherwise a string literal with identical value.
    pub fn property_identity(&self, class_name: &str, property: &str) -> String {
        if self.supports_nameof() {
            format!("nameof({class_name}.{property})")
        } else {
            format!("\"{property}\"")
        }
    }

    /// Render a column identity for query primitives keyed by physical
    /// column name.
    ///
    /// The `nameof` token is only usable when the physical name and the
    /// derived property coincide; otherwise the emitted value must stay the
    /// physical name, as a literal.
    pub fn column_identity(&self, class_name: &str, column: &Column) -> String {
        if self.supports_nameof() && column.name == column.property_name {
            format!("nameof({}.{})", class_name, column.property_name)
        } else {
            format!("\"{}\"", column.name)
        }
    }
}
