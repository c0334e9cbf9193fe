//! Configuration for metastage
//!
//! Hierarchy (highest priority first):
//! 1. CLI flags
//! 2. Environment variables (METASTAGE_*)
//! 3. Project config (.metastage.toml)
//! 4. User config (~/.config/metastage/config.toml)
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::builder::AspectCapabilities;
use crate::emitter::EmitLayout;
use crate::error::{StageError, StageResult};
use crate::model::aspect::AspectKind;
use crate::DEFAULT_ENVIRONMENT;

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".metastage.toml";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Target environment for staged changes
    pub environment: String,

    /// Root of the staged-change tree
    pub base_dir: PathBuf,

    /// Default staging user, appended to owner lists
    pub owner: Option<String>,

    /// On-disk layout
    pub layout: EmitLayout,

    /// Aspect facets disabled at configuration time (kebab-case names)
    pub disabled_aspects: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            base_dir: PathBuf::from("metadata-manager"),
            owner: None,
            layout: EmitLayout::SingleFile,
            disabled_aspects: Vec::new(),
        }
    }
}

/// One config file's contribution: every field optional
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    #[serde(default)]
    staging: PartialStaging,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialStaging {
    environment: Option<String>,
    base_dir: Option<PathBuf>,
    owner: Option<String>,
    layout: Option<EmitLayout>,
    disabled_aspects: Option<Vec<String>>,
}

impl Config {
    /// Load configuration for a project directory: defaults, then the user
    /// config file, then the project file, then `METASTAGE_*` variables.
    pub fn load(project_dir: &Path) -> StageResult<Self> {
        let mut config = Config::default();

        if let Some(user_file) = user_config_path() {
            if user_file.exists() {
                config.merge(parse_config_file(&user_file)?);
            }
        }

        let project_file = project_dir.join(PROJECT_CONFIG_FILE);
        if project_file.exists() {
            config.merge(parse_config_file(&project_file)?);
        }

        config.apply_env();
        Ok(config)
    }

    fn merge(&mut self, partial: PartialConfig) {
        let staging = partial.staging;
        if let Some(environment) = staging.environment {
            self.environment = environment;
        }
        if let Some(base_dir) = staging.base_dir {
            self.base_dir = base_dir;
        }
        if let Some(owner) = staging.owner {
            self.owner = Some(owner);
        }
        if let Some(layout) = staging.layout {
            self.layout = layout;
        }
        if let Some(disabled) = staging.disabled_aspects {
            self.disabled_aspects = disabled;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(environment) = std::env::var("METASTAGE_ENVIRONMENT") {
            if !environment.trim().is_empty() {
                self.environment = environment;
            }
        }
        if let Ok(base_dir) = std::env::var("METASTAGE_BASE_DIR") {
            if !base_dir.trim().is_empty() {
                self.base_dir = PathBuf::from(base_dir);
            }
        }
        if let Ok(owner) = std::env::var("METASTAGE_OWNER") {
            if !owner.trim().is_empty() {
                self.owner = Some(owner);
            }
        }
    }

    /// Builder capabilities implied by `disabled_aspects`. Unknown names are
    /// warned about and ignored.
    pub fn capabilities(&self) -> AspectCapabilities {
        let mut capabilities = AspectCapabilities::all();
        for name in &self.disabled_aspects {
            match AspectKind::parse_config_name(name) {
                Some(kind) => capabilities = capabilities.without(kind),
                None => warn!(aspect = %name, "unknown aspect name in disabled_aspects"),
            }
        }
        capabilities
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("metastage/config.toml"))
}

fn parse_config_file(path: &Path) -> StageResult<PartialConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(path, &content)
}

fn parse_config_str(path: &Path, content: &str) -> StageResult<PartialConfig> {
    let deserializer = toml::de::Deserializer::new(content);
    let mut unknown_keys = Vec::new();
    let partial: PartialConfig =
        serde_ignored::deserialize(deserializer, |key| unknown_keys.push(key.to_string()))
            .map_err(|e| StageError::InvalidConfig {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?;

    for key in unknown_keys {
        warn!(file = %path.display(), key = %key, "unknown config key ignored");
    }
    Ok(partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.environment, "dev");
        assert_eq!(config.base_dir, PathBuf::from("metadata-manager"));
        assert_eq!(config.layout, EmitLayout::SingleFile);
        assert!(config.owner.is_none());
    }

    #[test]
    fn parse_full_project_config() {
        let toml = r#"
[staging]
environment = "prod"
base_dir = "staged-metadata"
owner = "alice"
layout = "per-aspect"
disabled_aspects = ["structured-properties"]
"#;
        let partial = parse_config_str(Path::new(".metastage.toml"), toml).unwrap();
        let mut config = Config::default();
        config.merge(partial);

        assert_eq!(config.environment, "prod");
        assert_eq!(config.base_dir, PathBuf::from("staged-metadata"));
        assert_eq!(config.owner.as_deref(), Some("alice"));
        assert_eq!(config.layout, EmitLayout::PerAspect);
        assert_eq!(config.disabled_aspects, vec!["structured-properties"]);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let toml = "[staging]\nenvironment = \"staging\"\n";
        let partial = parse_config_str(Path::new(".metastage.toml"), toml).unwrap();
        let mut config = Config::default();
        config.merge(partial);

        assert_eq!(config.environment, "staging");
        assert_eq!(config.base_dir, PathBuf::from("metadata-manager"));
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let toml = "[staging]\nenvironment = \"dev\"\ntypo_key = true\n";
        assert!(parse_config_str(Path::new(".metastage.toml"), toml).is_ok());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = parse_config_str(Path::new(".metastage.toml"), "[staging\n").unwrap_err();
        assert!(err.to_string().contains(".metastage.toml"));
    }

    #[test]
    fn capabilities_honor_disabled_aspects() {
        let config = Config {
            disabled_aspects: vec!["ownership".to_string(), "bogus".to_string()],
            ..Default::default()
        };
        let capabilities = config.capabilities();
        assert!(!capabilities.enabled(AspectKind::Ownership));
        assert!(capabilities.enabled(AspectKind::Status));
    }
}
