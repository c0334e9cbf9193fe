//! `check` command: validate an entity descriptor without writing

use std::path::PathBuf;

use crate::config::Config;
use crate::model::entity::{parse_entity, EntityKind};
use crate::orchestrator::{StagingOptions, StagingOrchestrator};
use crate::output::Reporter;

pub struct CheckArgs {
    pub file: PathBuf,
    pub kind: EntityKind,
}

pub fn run(config: &Config, args: CheckArgs, reporter: &Reporter) -> i32 {
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

    // Full in-memory build surfaces the same validation the stage command
    // applies pre-flight, without touching the staging tree.
    let orchestrator = StagingOrchestrator::with_capabilities(
        super::resolve_base_dir(config, None),
        config.capabilities(),
    );
    let options = StagingOptions {
        dry_run: true,
        ..Default::default()
    };
    match orchestrator.stage(args.kind, &spec, &options) {
        Ok(result) => {
            println!(
                "{} valid: {} proposals ({})",
                result.entity_urn,
                result.mcps_created,
                result.aspects_included.join(", ")
            );
            0
        }
        Err(err) => {
            reporter.error(&err.to_string());
            1
        }
    }
}
