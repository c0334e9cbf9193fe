//! `diff` command: preview staged changes without writing
//!
//! Compares the currently staged file with the document a `stage` call would
//! produce. Exit codes follow `diff(1)`: 0 identical, 1 different.

use std::path::PathBuf;

use similar::TextDiff;

use crate::config::Config;
use crate::model::entity::{parse_entity, EntityKind};
use crate::orchestrator::StagingOrchestrator;
use crate::output::Reporter;

pub struct DiffArgs {
    pub file: PathBuf,
    pub kind: EntityKind,
    pub environment: Option<String>,
    pub owner: Option<String>,
    pub base_dir: Option<PathBuf>,
}

pub fn run(config: &Config, args: DiffArgs, reporter: &Reporter) -> i32 {
    let content = match super::read_descriptor(&args.file) {
        Ok(content) => content,
        Err(err) => {
            reporter.error(&format!("cannot read {}: {err}", args.file.display()));
            return 2;
        }
    };
    let spec = match parse_entity(&args.file, &content) {
        Ok(spec) => spec,
        Err(err) => {
            reporter.error(&err.to_string());
            return 2;
        }
    };

    let options = super::resolve_options(
        config,
        args.environment.clone(),
        args.owner.clone(),
        None,
        true,
    );
    let base_dir = super::resolve_base_dir(config, args.base_dir.clone());
    let orchestrator = StagingOrchestrator::new(base_dir);

    let (path, generated) = match orchestrator.preview(args.kind, &spec, &options) {
        Ok(preview) => preview,
        Err(err) => {
            reporter.error(&err.to_string());
            return 2;
        }
    };

    let staged = std::fs::read_to_string(&path).unwrap_or_default();
    if staged == generated {
        return 0;
    }

    let diff = TextDiff::from_lines(&staged, &generated);
    let rendered = diff
        .unified_diff()
        .context_radius(3)
        .header(
            &format!("a/{}", path.display()),
            &format!("b/{}", path.display()),
        )
        .to_string();
    print!("{rendered}");
    1
}
