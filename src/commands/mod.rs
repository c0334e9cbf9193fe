//! Command implementations for the metastage binary
//!
//! Each command returns a process exit code; user-facing failures are
//! reported through the `Reporter` rather than bubbling up as panics.

pub mod check;
pub mod diff;
pub mod stage;

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::builder::AspectCapabilities;
use crate::config::Config;
use crate::emitter::EmitLayout;
use crate::model::aspect::AspectKind;
use crate::orchestrator::StagingOptions;

/// Merge CLI flags over the loaded configuration
pub(crate) fn resolve_options(
    config: &Config,
    environment: Option<String>,
    owner: Option<String>,
    layout: Option<EmitLayout>,
    dry_run: bool,
) -> StagingOptions {
    StagingOptions {
        environment: environment.unwrap_or_else(|| config.environment.clone()),
        owner: owner.or_else(|| config.owner.clone()),
        layout: layout.unwrap_or(config.layout),
        dry_run,
    }
}

pub(crate) fn resolve_base_dir(config: &Config, base_dir: Option<PathBuf>) -> PathBuf {
    base_dir.unwrap_or_else(|| config.base_dir.clone())
}

/// Config capabilities narrowed by `--skip-aspect` flags
pub(crate) fn resolve_capabilities(config: &Config, skips: &[String]) -> AspectCapabilities {
    let mut capabilities = config.capabilities();
    for name in skips {
        match AspectKind::parse_config_name(name) {
            Some(kind) => capabilities = capabilities.without(kind),
            None => warn!(aspect = %name, "unknown aspect name in --skip-aspect"),
        }
    }
    capabilities
}

pub(crate) fn read_descriptor(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}
