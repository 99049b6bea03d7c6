//! envforge.toml configuration parser.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::naming::ProjectPrefix;
use crate::tags::TagSet;

pub const CONFIG_FILE_NAME: &str = "envforge.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvforgeConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    /// Extra tags merged after the fixed project tags.
    #[serde(default, skip_serializing_if = "TagSet::is_empty")]
    pub tags: TagSet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub prefix: ProjectPrefix,
    pub repository: Option<String>,
    pub owner: Option<String>,
}

impl EnvforgeConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a minimal envforge.toml for the given prefix.
    pub fn scaffold(prefix: ProjectPrefix) -> Self {
        EnvforgeConfig {
            project: ProjectConfig {
                prefix,
                repository: None,
                owner: None,
            },
            tags: TagSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold() {
        let config = EnvforgeConfig::scaffold(ProjectPrefix::parse("my-shop").unwrap());
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("my-shop"));
        let parsed = EnvforgeConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_minimal() {
        let config = EnvforgeConfig::from_toml_str("").unwrap();
        assert_eq!(config.project.prefix.as_str(), "zava");
        assert!(config.tags.is_empty());
    }

    #[test]
    fn test_parse_full() {
        let toml_str = r#"
[project]
prefix = "zava"
repository = "contoso/agent-workshop"
owner = "platform-team"

[tags]
cost-center = "workshop"
"#;
        let config = EnvforgeConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.project.owner.as_deref(), Some("platform-team"));
        assert_eq!(config.tags.get("cost-center"), Some("workshop"));
    }

    #[test]
    fn test_rejects_bad_prefix() {
        let toml_str = r#"
[project]
prefix = "Not_Valid"
"#;
        assert!(EnvforgeConfig::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_rejects_invalid_tag_key() {
        let toml_str = r#"
[tags]
"cost%center" = "workshop"
"#;
        let err = EnvforgeConfig::from_toml_str(toml_str).unwrap_err();
        assert!(format!("{err:#}").contains("forbidden character"));
    }

    #[test]
    fn test_rejects_overlong_tag_value() {
        let toml_str = format!("[tags]\nnote = \"{}\"\n", "v".repeat(257));
        assert!(EnvforgeConfig::from_toml_str(&toml_str).is_err());
    }

    #[test]
    fn test_rejects_unknown_table() {
        let toml_str = r#"
[profiles.qa]
cosmos_throughput = 400
"#;
        assert!(EnvforgeConfig::from_toml_str(toml_str).is_err());
    }
}
