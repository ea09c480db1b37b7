use crate::utils::error::{ImportError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Import settings as they appear in a file or on the command line. Unset values fall
/// through to the next source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSection {
    pub archive: Option<String>,
    pub data_root: Option<String>,
    pub world_id: Option<String>,
    pub system_id: Option<String>,
    pub categories: Option<Vec<String>>,
    pub write_policy: Option<String>,
}

impl ImportSection {
    /// Keeps the values set here, taking the rest from `fallback`.
    pub fn or(self, fallback: ImportSection) -> ImportSection {
        ImportSection {
            archive: self.archive.or(fallback.archive),
            data_root: self.data_root.or(fallback.data_root),
            world_id: self.world_id.or(fallback.world_id),
            system_id: self.system_id.or(fallback.system_id),
            categories: self.categories.or(fallback.categories),
            write_policy: self.write_policy.or(fallback.write_policy),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFileConfig {
    #[serde(default)]
    pub import: ImportSection,
}

impl ImportFileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ImportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Replaces `${VAR}` with the variable's value. Unknown variables are left untouched.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ImportError::ConfigError {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_import_section() {
        let toml_content = r#"
[import]
world_id = "outer-rim"
system_id = "swes"
categories = ["armor", "gear"]
write_policy = "append"
"#;

        let config = ImportFileConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.import.world_id.as_deref(), Some("outer-rim"));
        assert_eq!(
            config.import.categories,
            Some(vec!["armor".to_string(), "gear".to_string()])
        );
        assert_eq!(config.import.write_policy.as_deref(), Some("append"));
        assert!(config.import.data_root.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SWES_IMPORT_TEST_WORLD", "core-worlds");

        let toml_content = r#"
[import]
world_id = "${SWES_IMPORT_TEST_WORLD}"
system_id = "${SWES_IMPORT_TEST_UNSET_VARIABLE}"
"#;

        let config = ImportFileConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.import.world_id.as_deref(), Some("core-worlds"));
        assert_eq!(
            config.import.system_id.as_deref(),
            Some("${SWES_IMPORT_TEST_UNSET_VARIABLE}")
        );

        std::env::remove_var("SWES_IMPORT_TEST_WORLD");
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = ImportFileConfig::from_toml_str("").unwrap();
        assert_eq!(config, ImportFileConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = ImportFileConfig::from_toml_str("[import\nworld_id = 1").unwrap_err();
        assert!(matches!(err, ImportError::ConfigError { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[import]\ndata_root = \"/srv/foundry/Data\"").unwrap();

        let config = ImportFileConfig::from_file(file.path()).unwrap();
        assert_eq!(config.import.data_root.as_deref(), Some("/srv/foundry/Data"));
    }

    #[test]
    fn test_cli_values_win_over_file_values() {
        let cli = ImportSection {
            world_id: Some("from-cli".to_string()),
            ..Default::default()
        };
        let file = ImportSection {
            world_id: Some("from-file".to_string()),
            system_id: Some("swes".to_string()),
            ..Default::default()
        };

        let merged = cli.or(file);
        assert_eq!(merged.world_id.as_deref(), Some("from-cli"));
        assert_eq!(merged.system_id.as_deref(), Some("swes"));
    }
}
