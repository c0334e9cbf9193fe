use std::path::PathBuf;

use clap::{Parser, Subcommand};

use metastage::EmitLayout;
use metastage::EntityKind;

/// metastage - staged metadata-change generator for data catalogs
#[derive(Parser, Debug)]
#[command(name = "metastage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output results as JSON (for CI)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage one entity's change proposals to the staging tree
    Stage {
        /// Entity descriptor file (JSON or YAML)
        #[arg(short, long)]
        file: PathBuf,

        /// Entity kind
        #[arg(short, long, value_enum)]
        kind: EntityKind,

        /// Target environment (defaults to config, then "dev")
        #[arg(short, long)]
        environment: Option<String>,

        /// Staging user, appended to the entity's owners
        #[arg(short, long)]
        owner: Option<String>,

        /// Root of the staged-change tree
        #[arg(short, long)]
        base_dir: Option<PathBuf>,

        /// On-disk layout
        #[arg(long, value_enum)]
        layout: Option<EmitLayout>,

        /// Build and assemble but write nothing
        #[arg(long)]
        dry_run: bool,

        /// Disable one aspect facet (repeatable, kebab-case name)
        #[arg(long = "skip-aspect", value_name = "ASPECT")]
        skip_aspects: Vec<String>,
    },

    /// Stage a file containing a list of entities
    StageBatch {
        /// Batch descriptor file (JSON or YAML array)
        #[arg(short, long)]
        file: PathBuf,

        /// Entity kind
        #[arg(short, long, value_enum)]
        kind: EntityKind,

        /// Target environment (defaults to config, then "dev")
        #[arg(short, long)]
        environment: Option<String>,

        /// Staging user, appended to each entity's owners
        #[arg(short, long)]
        owner: Option<String>,

        /// Root of the staged-change tree
        #[arg(short, long)]
        base_dir: Option<PathBuf>,

        /// On-disk layout
        #[arg(long, value_enum)]
        layout: Option<EmitLayout>,

        /// Disable one aspect facet (repeatable, kebab-case name)
        #[arg(long = "skip-aspect", value_name = "ASPECT")]
        skip_aspects: Vec<String>,
    },

    /// Show a unified diff between the staged file and what would be staged
    Diff {
        /// Entity descriptor file (JSON or YAML)
        #[arg(short, long)]
        file: PathBuf,

        /// Entity kind
        #[arg(short, long, value_enum)]
        kind: EntityKind,

        /// Target environment (defaults to config, then "dev")
        #[arg(short, long)]
        environment: Option<String>,

        /// Staging user, appended to the entity's owners
        #[arg(short, long)]
        owner: Option<String>,

        /// Root of the staged-change tree
        #[arg(short, long)]
        base_dir: Option<PathBuf>,
    },

    /// Validate an entity descriptor without writing anything
    Check {
        /// Entity descriptor file (JSON or YAML)
        #[arg(short, long)]
        file: PathBuf,

        /// Entity kind
        #[arg(short, long, value_enum)]
        kind: EntityKind,
    },
}
