//! Configuration validation.

use super::GenerationConfig;
use crate::error::{GeneratorError, Result};
use crate::naming;

/// Validate the configuration.
pub fn validate(config: &GenerationConfig) -> Result<()> {
    if config.model_namespace.is_empty() {
        return Err(GeneratorError::Config(
            "model_namespace is required".into(),
        ));
    }
    if config.repository_namespace.is_empty() {
        return Err(GeneratorError::Config(
            "repository_namespace is required".into(),
        ));
    }
    if !naming::template_has_token(&config.class_name_format) {
        return Err(GeneratorError::Config(format!(
            "class_name_format must contain the {{Name}} token, got '{}'",
            config.class_name_format
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{CSharpVersion, TargetFramework};

    fn valid_config() -> GenerationConfig {
        GenerationConfig {
            model_namespace: "App.Models".to_string(),
            repository_namespace: "App.Repositories".to_string(),
            class_name_format: "{Name}".to_string(),
            target_framework: TargetFramework::Framework45,
            csharp_version: CSharpVersion::CSharp7,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_model_namespace_fails() {
        let mut config = valid_config();
        config.model_namespace = String::new();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("model_namespace"));
    }

    #[test]
    fn test_empty_repository_namespace_fails() {
        let mut config = valid_config();
        config.repository_namespace = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_template_without_token_fails() {
        let mut config = valid_config();
        config.class_name_format = "Model".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("{Name}"));
    }
}
