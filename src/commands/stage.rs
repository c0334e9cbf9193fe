//! `stage` and `stage-batch` commands

use std::path::PathBuf;

use crate::builder::AspectBuilder;
use crate::config::Config;
use crate::emitter::{EmitLayout, FileEmitter};
use crate::model::entity::{parse_entity, parse_entity_batch, EntityKind};
use crate::orchestrator::StagingOrchestrator;
use crate::output::Reporter;

pub struct StageArgs {
    pub file: PathBuf,
    pub kind: EntityKind,
    pub environment: Option<String>,
    pub owner: Option<String>,
    pub base_dir: Option<PathBuf>,
    pub layout: Option<EmitLayout>,
    pub dry_run: bool,
    pub skip_aspects: Vec<String>,
}

fn build_orchestrator(config: &Config, args: &StageArgs) -> StagingOrchestrator {
    let capabilities = super::resolve_capabilities(config, &args.skip_aspects);
    let base_dir = super::resolve_base_dir(config, args.base_dir.clone());
    StagingOrchestrator::with_parts(
        AspectBuilder::new(capabilities),
        FileEmitter::new(base_dir),
        crate::clock::SystemClock,
    )
}

/// Stage one entity; exit 1 on validation or staging failure.
pub fn run(config: &Config, args: StageArgs, reporter: &Reporter) -> i32 {
    let content = match super::read_descriptor(&args.file) {
        Ok(content) => content,
        Err(err) => {
            reporter.error(&format!("cannot read {}: {err}", args.file.display()));
            return 1;
        }
    };
    let spec = match parse_entity(&args.file, &content) {
        Ok(spec) => spec,
        Err(err) => {
            reporter.error(&err.to_string());
            return 1;
        }
    };

    let options = super::resolve_options(
        config,
        args.environment.clone(),
        args.owner.clone(),
        args.layout,
        args.dry_run,
    );
    let orchestrator = build_orchestrator(config, &args);

    match orchestrator.stage(args.kind, &spec, &options) {
        Ok(result) => {
            reporter.staging_result(&result);
            if result.success {
                0
            } else {
                1
            }
        }
        Err(err) => {
            // Pre-flight validation failure: nothing was written
            reporter.error(&err.to_string());
            1
        }
    }
}

/// Stage a list of entities; exit 1 if any item failed.
pub fn run_batch(config: &Config, args: StageArgs, reporter: &Reporter) -> i32 {
    let content = match super::read_descriptor(&args.file) {
        Ok(content) => content,
        Err(err) => {
            reporter.error(&format!("cannot read {}: {err}", args.file.display()));
            return 1;
        }
    };
    let specs = match parse_entity_batch(&args.file, &content) {
        Ok(specs) => specs,
        Err(err) => {
            reporter.error(&err.to_string());
            return 1;
        }
    };

    let options = super::resolve_options(
        config,
        args.environment.clone(),
        args.owner.clone(),
        args.layout,
        args.dry_run,
    );
    let orchestrator = build_orchestrator(config, &args);

    let outcome = orchestrator.stage_batch(args.kind, &specs, &options);
    reporter.batch_outcome(&outcome);
    if outcome.all_succeeded() {
        0
    } else {
        1
    }
}
