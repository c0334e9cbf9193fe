//! File Emitter
//!
//! Serializes a proposal list to the staging directory layout. Two layouts
//! coexist and callers choose explicitly:
//!
//! - `SingleFile` (canonical): `<base>/<env>/<type_dir>/<id>/mcp_file.json`
//! - `PerAspect` (legacy): `<base>/<type_dir>/<id>_<aspectName>.json`
//!
//! Writes are full overwrites via the atomic writer. When the target already
//! holds byte-identical content the physical rewrite is skipped so mtimes
//! stay stable for CI diffing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StageResult;
use crate::fs::{hash_content, FileSystem, LocalFs};
use crate::model::entity::EntityKind;
use crate::model::proposal::{render_document, ChangeProposal};

/// File name of the canonical staged artifact
pub const MCP_FILE_NAME: &str = "mcp_file.json";

/// On-disk layout for staged proposals
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum EmitLayout {
    /// One `mcp_file.json` per entity and environment (canonical)
    #[default]
    SingleFile,
    /// One file per aspect (legacy; kept for older consumers)
    PerAspect,
}

/// What the emitter wrote
#[derive(Debug, Clone, Default)]
pub struct EmitReport {
    /// Paths now holding the staged content (written or already identical)
    pub files_saved: Vec<PathBuf>,
    /// Number of proposals serialized
    pub proposals_written: usize,
    /// Files whose content was already identical and were left untouched
    pub unchanged: usize,
}

/// Writes proposal documents under a base directory
pub struct FileEmitter<FS: FileSystem = LocalFs> {
    base_dir: PathBuf,
    fs: FS,
}

impl FileEmitter<LocalFs> {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_fs(base_dir, LocalFs::new())
    }
}

impl<FS: FileSystem> FileEmitter<FS> {
    pub fn with_fs(base_dir: impl Into<PathBuf>, fs: FS) -> Self {
        Self {
            base_dir: base_dir.into(),
            fs,
        }
    }

    /// Canonical path of the staged artifact for one entity+environment
    pub fn staged_file_path(&self, environment: &str, entity: EntityKind, id: &str) -> PathBuf {
        self.base_dir
            .join(environment)
            .join(entity.dir_segment())
            .join(path_segment(id))
            .join(MCP_FILE_NAME)
    }

    /// Emit the canonical single-file document
    pub fn emit(
        &self,
        environment: &str,
        entity: EntityKind,
        id: &str,
        proposals: &[ChangeProposal],
    ) -> StageResult<EmitReport> {
        let path = self.staged_file_path(environment, entity, id);
        let document = render_document(proposals)?;

        let mut report = EmitReport {
            proposals_written: proposals.len(),
            ..Default::default()
        };
        self.write_if_changed(&path, &document, &mut report)?;

        info!(
            proposals = proposals.len(),
            path = %path.display(),
            "staged change proposals"
        );
        Ok(report)
    }

    /// Path of one legacy per-aspect file
    pub fn per_aspect_file_path(
        &self,
        entity: EntityKind,
        id: &str,
        aspect_name: &str,
    ) -> PathBuf {
        self.base_dir
            .join(entity.dir_segment())
            .join(format!("{}_{aspect_name}.json", path_segment(id)))
    }

    /// Emit one file per aspect (legacy layout)
    pub fn emit_per_aspect(
        &self,
        entity: EntityKind,
        id: &str,
        proposals: &[ChangeProposal],
    ) -> StageResult<EmitReport> {
        let mut report = EmitReport {
            proposals_written: proposals.len(),
            ..Default::default()
        };
        for proposal in proposals {
            let path = self.per_aspect_file_path(entity, id, &proposal.aspect_name);
            let document = render_document(std::slice::from_ref(proposal))?;
            self.write_if_changed(&path, &document, &mut report)?;
        }

        info!(
            proposals = proposals.len(),
            dir = %self.base_dir.join(entity.dir_segment()).display(),
            "staged change proposals (per-aspect layout)"
        );
        Ok(report)
    }

    fn write_if_changed(
        &self,
        path: &Path,
        document: &str,
        report: &mut EmitReport,
    ) -> StageResult<()> {
        let new_hash = hash_content(document.as_bytes());
        let identical = self.fs.exists(path)
            && self
                .fs
                .hash_file(path)
                .map(|existing| existing == new_hash)
                .unwrap_or(false);

        if identical {
            report.unchanged += 1;
        } else {
            self.fs.write_atomic(path, document)?;
        }
        report.files_saved.push(path.to_path_buf());
        Ok(())
    }
}

/// Entity ids become one path segment; separators are flattened so an id can
/// never escape the staging directory.
fn path_segment(id: &str) -> String {
    id.replace(['/', '\\', ':'], "_")
}
