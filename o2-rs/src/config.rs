//! User configuration loaded from TOML.

use crate::error::{O2Error, Result};
use crate::pipeline::RenameTarget;
use crate::relocate::PathRewriteRule;
use crate::rename::SpacePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "O2_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default vault when `--vault` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault: Option<PathBuf>,
    /// Directory holding notes ready to publish.
    pub draft_dir: String,
    /// Directory that promoted notes are copied into.
    pub published_dir: String,
    /// Inserted before `.md` by the duplicate command.
    pub duplicate_suffix: String,
    pub rename: RenameConfig,
    pub promote: PromoteConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    pub space_policy: SpacePolicy,
    pub restamp: bool,
    pub target: RenameTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoteConfig {
    /// Strip wiki links from published copies.
    pub normalize_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vault: None,
            draft_dir: "draft".to_string(),
            published_dir: "published".to_string(),
            duplicate_suffix: "_copy".to_string(),
            rename: RenameConfig::default(),
            promote: PromoteConfig::default(),
        }
    }
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            space_policy: SpacePolicy::AllInName,
            restamp: false,
            target: RenameTarget::Published,
        }
    }
}

impl Default for PromoteConfig {
    fn default() -> Self {
        Self {
            normalize_links: true,
        }
    }
}

impl Config {
    /// Default config file location: `$O2_CONFIG`, else `<config dir>/o2/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("o2").join("config.toml"))
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject directory settings the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.draft_dir.trim().is_empty() || self.published_dir.trim().is_empty() {
            return Err(O2Error::ConfigError(
                "draft_dir and published_dir must not be empty".to_string(),
            ));
        }
        if self.draft_dir == self.published_dir {
            return Err(O2Error::ConfigError(format!(
                "draft_dir and published_dir are both '{}'",
                self.draft_dir
            )));
        }
        Ok(())
    }

    /// Pick the vault root: command line first, then the config file.
    pub fn resolve_vault_path(&self, cli_vault: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_vault {
            return Ok(path.to_path_buf());
        }
        self.vault.clone().ok_or_else(|| {
            O2Error::ConfigError(
                "no vault given; pass --vault or set `vault` in the config".to_string(),
            )
        })
    }

    /// Rule mapping draft paths onto published paths.
    pub fn publish_rule(&self) -> PathRewriteRule {
        PathRewriteRule::new(&self.draft_dir, &self.published_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.promote.normalize_links);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"draft_dir = "ready"

[rename]
space_policy = "first-in-path"
target = "draft"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.draft_dir, "ready");
        assert_eq!(config.published_dir, "published");
        assert_eq!(config.rename.space_policy, SpacePolicy::FirstInPath);
        assert_eq!(config.rename.target, RenameTarget::Draft);
        assert!(!config.rename.restamp);
    }

    #[test]
    fn test_same_directories_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "draft_dir = \"x\"\npublished_dir = \"x\"\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(O2Error::ConfigError(_))));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "draft_dir = [").unwrap();

        assert!(matches!(Config::load_from(&path), Err(O2Error::TomlParse(_))));
    }

    #[test]
    fn test_resolve_vault_path_prefers_cli() {
        let config = Config {
            vault: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_vault_path(Some(Path::new("/from/cli"))).unwrap(),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            config.resolve_vault_path(None).unwrap(),
            PathBuf::from("/from/config")
        );
        assert!(Config::default().resolve_vault_path(None).is_err());
    }

    #[test]
    fn test_publish_rule() {
        let rule = Config::default().publish_rule();
        assert_eq!(rule.match_prefix, "draft");
        assert_eq!(rule.replacement_prefix, "published");
    }
}
