//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::version::{CSharpVersion, TargetFramework, VersionGate};

/// Root configuration for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Namespace for generated model types.
    pub model_namespace: String,

    /// Namespace for generated repository types.
    pub repository_namespace: String,

    /// Class-name template; the `{Name}` token is replaced with the derived
    /// class name (default: `{Name}`).
    #[serde(default = "default_class_name_format")]
    pub class_name_format: String,

    /// Target .NET framework version (default: framework45).
    #[serde(default = "default_target_framework")]
    pub target_framework: TargetFramework,

    /// Target C# language version (default: csharp7).
    #[serde(default = "default_csharp_version")]
    pub csharp_version: CSharpVersion,
}

impl GenerationConfig {
    /// Version gate for the configured output dialect.
    pub fn gate(&self) -> VersionGate {
        VersionGate::new(self.target_framework, self.csharp_version)
    }
}

fn default_class_name_format() -> String {
    "{Name}".to_string()
}

fn default_target_framework() -> TargetFramework {
    TargetFramework::Framework45
}

fn default_csharp_version() -> CSharpVersion {
    CSharpVersion::CSharp7
}
