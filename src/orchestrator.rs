//! Staging Orchestrator
//!
//! The single entry point tying builder, assembler, and emitter together for
//! one entity. Pre-flight validation (identifying key, display name) fails
//! fast before any I/O; every later failure is converted into a
//! `StagingResult` with `success = false`; the orchestrator never raises
//! past that boundary for ordinary entity-data or I/O errors.

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::builder::{AspectBuilder, AspectCapabilities, BuildContext};
use crate::clock::{Clock, SystemClock};
use crate::emitter::{EmitLayout, FileEmitter};
use crate::error::{StageError, StageResult};
use crate::fs::{FileSystem, LocalFs};
use crate::model::entity::{EntityKind, EntitySpec, OwnerSpec};
use crate::model::proposal::{render_document, ChangeProposal};
use crate::model::urn::Urn;
use crate::{assembler, DEFAULT_ENVIRONMENT};

/// Per-call staging options
#[derive(Debug, Clone)]
pub struct StagingOptions {
    /// Target environment; empty falls back to `dev`
    pub environment: String,
    /// Staging user; appended to the entity's owner list when present
    pub owner: Option<String>,
    pub layout: EmitLayout,
    /// Build and assemble but write nothing
    pub dry_run: bool,
}

impl Default for StagingOptions {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            owner: None,
            layout: EmitLayout::SingleFile,
            dry_run: false,
        }
    }
}

/// Outcome of one staging call; constructed once, never mutated
#[derive(Debug, Clone, Serialize)]
pub struct StagingResult {
    pub success: bool,
    pub message: String,
    pub entity_id: String,
    pub entity_urn: String,
    pub mcps_created: usize,
    pub files_saved: Vec<PathBuf>,
    pub aspects_included: Vec<String>,
}

impl StagingResult {
    fn failure(urn: &Urn, entity_id: &str, message: String) -> Self {
        Self {
            success: false,
            message,
            entity_id: entity_id.to_string(),
            entity_urn: urn.to_string(),
            mcps_created: 0,
            files_saved: Vec::new(),
            aspects_included: Vec::new(),
        }
    }
}

/// One failed item in a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemError {
    pub index: usize,
    pub entity: String,
    pub message: String,
}

/// Outcome of staging a list of entities
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<StagingResult>,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<BatchItemError>,
}

impl BatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Composes builder → assembler → emitter for one entity at a time
pub struct StagingOrchestrator<FS: FileSystem = LocalFs, C: Clock = SystemClock> {
    builder: AspectBuilder,
    emitter: FileEmitter<FS>,
    clock: C,
}

impl StagingOrchestrator<LocalFs, SystemClock> {
    /// Orchestrator with every capability enabled, local disk, wall clock
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_capabilities(base_dir, AspectCapabilities::all())
    }

    pub fn with_capabilities(
        base_dir: impl Into<PathBuf>,
        capabilities: AspectCapabilities,
    ) -> Self {
        Self {
            builder: AspectBuilder::new(capabilities),
            emitter: FileEmitter::new(base_dir),
            clock: SystemClock,
        }
    }
}

impl<FS: FileSystem, C: Clock> StagingOrchestrator<FS, C> {
    /// Fully injected constructor (tests, fixed clocks, mock filesystems)
    pub fn with_parts(builder: AspectBuilder, emitter: FileEmitter<FS>, clock: C) -> Self {
        Self {
            builder,
            emitter,
            clock,
        }
    }

    /// Stage one entity.
    ///
    /// `Err` is returned only for pre-flight validation failures, before any
    /// file is touched. Everything downstream lands in the result.
    pub fn stage(
        &self,
        entity: EntityKind,
        spec: &EntitySpec,
        options: &StagingOptions,
    ) -> StageResult<StagingResult> {
        let urn = resolve_urn(entity, spec)?;
        let entity_id = spec
            .id
            .clone()
            .unwrap_or_else(|| urn.id().to_string());

        if spec.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            return Err(StageError::MissingName {
                entity: urn.to_string(),
            });
        }

        let environment = if options.environment.trim().is_empty() {
            DEFAULT_ENVIRONMENT
        } else {
            options.environment.as_str()
        };

        let spec = with_staging_owner(spec, options.owner.as_deref());
        let ctx = BuildContext {
            now_millis: self.clock.now_millis(),
        };
        let output = self.builder.build_all(entity, &spec, &ctx);
        debug!(
            aspects = output.aspects.len(),
            skipped = output.skipped.len(),
            urn = %urn,
            "aspects built"
        );

        let proposals =
            match assembler::assemble(&urn, entity, &output.aspects, &spec.custom_aspects) {
                Ok(p) => p,
                Err(err) => {
                    return Ok(StagingResult::failure(
                        &urn,
                        &entity_id,
                        format!("failed to assemble change proposals: {err}"),
                    ))
                }
            };
        let aspects_included: Vec<String> =
            proposals.iter().map(|p| p.aspect_name.clone()).collect();

        if options.dry_run {
            let files_saved =
                self.planned_paths(environment, entity, &entity_id, options, &proposals);
            return Ok(StagingResult {
                success: true,
                message: format!(
                    "dry run: would stage {} change proposals for {urn}",
                    proposals.len()
                ),
                entity_id,
                entity_urn: urn.to_string(),
                mcps_created: proposals.len(),
                files_saved,
                aspects_included,
            });
        }

        let report = match options.layout {
            EmitLayout::SingleFile => {
                self.emitter
                    .emit(environment, entity, &entity_id, &proposals)
            }
            EmitLayout::PerAspect => {
                self.emitter
                    .emit_per_aspect(entity, &entity_id, &proposals)
            }
        };
        let report = match report {
            Ok(r) => r,
            Err(err) => {
                return Ok(StagingResult::failure(
                    &urn,
                    &entity_id,
                    format!("failed to write staged changes: {err}"),
                ))
            }
        };

        Ok(StagingResult {
            success: true,
            message: format!(
                "staged {} change proposals for {urn} ({environment})",
                report.proposals_written
            ),
            entity_id,
            entity_urn: urn.to_string(),
            mcps_created: report.proposals_written,
            files_saved: report.files_saved,
            aspects_included,
        })
    }

    /// Stage a list of entities sequentially. One entity's failure
    /// (including pre-flight validation) is recorded and does not abort the
    /// remainder of the batch.
    pub fn stage_batch(
        &self,
        entity: EntityKind,
        specs: &[EntitySpec],
        options: &StagingOptions,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (index, spec) in specs.iter().enumerate() {
            match self.stage(entity, spec, options) {
                Ok(result) => {
                    if result.success {
                        outcome.succeeded += 1;
                    } else {
                        outcome.failed += 1;
                        outcome.errors.push(BatchItemError {
                            index,
                            entity: result.entity_urn.clone(),
                            message: result.message.clone(),
                        });
                    }
                    outcome.results.push(result);
                }
                Err(err) => {
                    outcome.failed += 1;
                    outcome.errors.push(BatchItemError {
                        index,
                        entity: describe_entity(spec, index),
                        message: err.to_string(),
                    });
                }
            }
        }

        outcome
    }

    /// Build and render the canonical document without writing; returns the
    /// staged file path and the content a `stage` call would produce.
    pub fn preview(
        &self,
        entity: EntityKind,
        spec: &EntitySpec,
        options: &StagingOptions,
    ) -> StageResult<(PathBuf, String)> {
        let urn = resolve_urn(entity, spec)?;
        let entity_id = spec
            .id
            .clone()
            .unwrap_or_else(|| urn.id().to_string());
        if spec.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            return Err(StageError::MissingName {
                entity: urn.to_string(),
            });
        }

        let environment = if options.environment.trim().is_empty() {
            DEFAULT_ENVIRONMENT
        } else {
            options.environment.as_str()
        };
        let spec = with_staging_owner(spec, options.owner.as_deref());
        let ctx = BuildContext {
            now_millis: self.clock.now_millis(),
        };
        let output = self.builder.build_all(entity, &spec, &ctx);
        let proposals =
            assembler::assemble(&urn, entity, &output.aspects, &spec.custom_aspects)?;

        let path = self
            .emitter
            .staged_file_path(environment, entity, &entity_id);
        Ok((path, render_document(&proposals)?))
    }

    fn planned_paths(
        &self,
        environment: &str,
        entity: EntityKind,
        entity_id: &str,
        options: &StagingOptions,
        proposals: &[ChangeProposal],
    ) -> Vec<PathBuf> {
        match options.layout {
            EmitLayout::SingleFile => {
                vec![self.emitter.staged_file_path(environment, entity, entity_id)]
            }
            EmitLayout::PerAspect => proposals
                .iter()
                .map(|p| {
                    self.emitter
                        .per_aspect_file_path(entity, entity_id, &p.aspect_name)
                })
                .collect(),
        }
    }
}

/// `urn` field wins; else the URN is constructed from `id`; else the entity
/// is unidentifiable and staging must fail before any work happens.
fn resolve_urn(entity: EntityKind, spec: &EntitySpec) -> StageResult<Urn> {
    if let Some(urn) = spec.urn.as_deref().filter(|u| !u.trim().is_empty()) {
        return Urn::parse(urn);
    }
    if let Some(id) = spec.id.as_deref().filter(|i| !i.trim().is_empty()) {
        return Ok(Urn::for_entity(entity, id));
    }
    Err(StageError::MissingIdentity)
}

/// Append the staging user to the owner list unless an equivalent owner is
/// already present.
fn with_staging_owner(spec: &EntitySpec, owner: Option<&str>) -> EntitySpec {
    let Some(owner) = owner.filter(|o| !o.trim().is_empty()) else {
        return spec.clone();
    };

    let mut spec = spec.clone();
    let incoming = Urn::corpuser(owner).ok();
    let already_present = spec.owners.iter().any(|existing| {
        match (Urn::corpuser(existing.reference()).ok(), &incoming) {
            (Some(a), Some(b)) => &a == b,
            _ => existing.reference() == owner,
        }
    });
    if !already_present {
        spec.owners.push(OwnerSpec::Reference(owner.to_string()));
    }
    spec
}

fn describe_entity(spec: &EntitySpec, index: usize) -> String {
    spec.urn
        .clone()
        .or_else(|| spec.id.clone())
        .or_else(|| spec.name.clone())
        .unwrap_or_else(|| format!("entity #{index}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::fs::MockFileSystem;
    use std::path::Path;

    const NOW: i64 = 1_700_000_000_000;

    fn orchestrator(fs: MockFileSystem) -> StagingOrchestrator<MockFileSystem, FixedClock> {
        StagingOrchestrator::with_parts(
            AspectBuilder::default(),
            FileEmitter::with_fs("/staging", fs),
            FixedClock(NOW),
        )
    }

    fn tag_spec() -> EntitySpec {
        EntitySpec {
            id: Some("pii".to_string()),
            name: Some("PII".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn stage_minimal_tag_writes_properties_and_status() {
        let fs = MockFileSystem::new();
        let result = orchestrator(fs.clone())
            .stage(EntityKind::Tag, &tag_spec(), &StagingOptions::default())
            .unwrap();

        assert!(result.success);
        assert_eq!(result.entity_urn, "urn:li:tag:pii");
        assert_eq!(result.mcps_created, 2);
        assert_eq!(result.aspects_included, vec!["tagProperties", "status"]);
        assert!(fs.exists(Path::new("/staging/dev/tags/pii/mcp_file.json")));
    }

    #[test]
    fn stage_without_identity_fails_fast_with_no_files() {
        let fs = MockFileSystem::new();
        let spec = EntitySpec {
            name: Some("Revenue".to_string()),
            ..Default::default()
        };
        let err = orchestrator(fs.clone())
            .stage(EntityKind::DataProduct, &spec, &StagingOptions::default())
            .unwrap_err();

        assert!(matches!(err, StageError::MissingIdentity));
        assert!(fs.files.lock().unwrap().is_empty());
    }

    #[test]
    fn stage_without_name_fails_fast_with_no_files() {
        let fs = MockFileSystem::new();
        let spec = EntitySpec {
            id: Some("pii".to_string()),
            ..Default::default()
        };
        let err = orchestrator(fs.clone())
            .stage(EntityKind::Tag, &spec, &StagingOptions::default())
            .unwrap_err();

        assert!(matches!(err, StageError::MissingName { .. }));
        assert!(fs.files.lock().unwrap().is_empty());
    }

    #[test]
    fn stage_prefers_explicit_urn_over_id() {
        let fs = MockFileSystem::new();
        let spec = EntitySpec {
            urn: Some("urn:li:tag:sensitive.pii".to_string()),
            id: Some("ignored".to_string()),
            ..tag_spec()
        };
        let result = orchestrator(fs)
            .stage(EntityKind::Tag, &spec, &StagingOptions::default())
            .unwrap();

        assert_eq!(result.entity_urn, "urn:li:tag:sensitive.pii");
        // entity_id still comes from the explicit id field
        assert_eq!(result.entity_id, "ignored");
    }

    #[test]
    fn stage_appends_staging_owner_once() {
        let fs = MockFileSystem::new();
        let spec = EntitySpec {
            owners: vec![OwnerSpec::Reference("urn:li:corpuser:alice".to_string())],
            ..tag_spec()
        };
        let options = StagingOptions {
            owner: Some("alice".to_string()),
            ..Default::default()
        };
        let result = orchestrator(fs.clone())
            .stage(EntityKind::Tag, &spec, &options)
            .unwrap();
        assert!(result.success);

        let content = fs
            .read_to_string(Path::new("/staging/dev/tags/pii/mcp_file.json"))
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        let ownership = parsed
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["aspectName"] == "ownership")
            .expect("ownership proposal");
        assert_eq!(ownership["aspect"]["owners"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn stage_adds_staging_owner_when_absent() {
        let fs = MockFileSystem::new();
        let options = StagingOptions {
            owner: Some("carol".to_string()),
            ..Default::default()
        };
        let result = orchestrator(fs)
            .stage(EntityKind::Tag, &tag_spec(), &options)
            .unwrap();

        assert!(result.aspects_included.contains(&"ownership".to_string()));
    }

    #[test]
    fn stage_empty_environment_defaults_to_dev() {
        let fs = MockFileSystem::new();
        let options = StagingOptions {
            environment: "  ".to_string(),
            ..Default::default()
        };
        orchestrator(fs.clone())
            .stage(EntityKind::Tag, &tag_spec(), &options)
            .unwrap();

        assert!(fs.exists(Path::new("/staging/dev/tags/pii/mcp_file.json")));
    }

    #[test]
    fn stage_twice_is_byte_identical_under_fixed_clock() {
        let fs = MockFileSystem::new();
        let orch = orchestrator(fs.clone());
        let spec = EntitySpec {
            owners: vec![OwnerSpec::Reference("alice".to_string())],
            tags: vec!["sensitive".to_string()],
            ..tag_spec()
        };

        let first = orch
            .stage(EntityKind::Tag, &spec, &StagingOptions::default())
            .unwrap();
        let content_first = fs
            .read_to_string(Path::new("/staging/dev/tags/pii/mcp_file.json"))
            .unwrap();

        let second = orch
            .stage(EntityKind::Tag, &spec, &StagingOptions::default())
            .unwrap();
        let content_second = fs
            .read_to_string(Path::new("/staging/dev/tags/pii/mcp_file.json"))
            .unwrap();

        assert_eq!(content_first, content_second);
        assert_eq!(first.aspects_included, second.aspects_included);
    }

    #[test]
    fn stage_dry_run_writes_nothing() {
        let fs = MockFileSystem::new();
        let options = StagingOptions {
            dry_run: true,
            ..Default::default()
        };
        let result = orchestrator(fs.clone())
            .stage(EntityKind::Tag, &tag_spec(), &options)
            .unwrap();

        assert!(result.success);
        assert_eq!(result.files_saved.len(), 1);
        assert!(fs.files.lock().unwrap().is_empty());
    }

    #[test]
    fn stage_batch_records_failures_and_continues() {
        let fs = MockFileSystem::new();
        let specs = vec![
            tag_spec(),
            EntitySpec {
                // no id, no urn
                name: Some("Broken".to_string()),
                ..Default::default()
            },
            EntitySpec {
                id: Some("phi".to_string()),
                name: Some("PHI".to_string()),
                ..Default::default()
            },
        ];

        let outcome = orchestrator(fs.clone()).stage_batch(
            EntityKind::Tag,
            &specs,
            &StagingOptions::default(),
        );

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].index, 1);
        assert_eq!(outcome.errors[0].entity, "Broken");
        assert!(fs.exists(Path::new("/staging/dev/tags/pii/mcp_file.json")));
        assert!(fs.exists(Path::new("/staging/dev/tags/phi/mcp_file.json")));
    }

    #[test]
    fn preview_matches_staged_content() {
        let fs = MockFileSystem::new();
        let orch = orchestrator(fs.clone());
        let options = StagingOptions::default();

        let (path, document) = orch
            .preview(EntityKind::Tag, &tag_spec(), &options)
            .unwrap();
        orch.stage(EntityKind::Tag, &tag_spec(), &options).unwrap();

        assert_eq!(fs.read_to_string(&path).unwrap(), document);
    }
}
