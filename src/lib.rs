//! metastage - staged metadata-change generation for data catalogs
//!
//! metastage turns structured entity descriptions (tags, glossary terms,
//! domains, data products, data contracts) into ordered Metadata Change
//! Proposal documents and writes them to a deterministic staging tree for
//! review-based (git/PR) deployment to a catalog.

pub mod assembler;
pub mod builder;
pub mod clock;
pub mod commands;
pub mod config;
pub mod emitter;
pub mod error;
pub mod fs;
pub mod model;
pub mod orchestrator;
pub mod output;

/// Environment used when none is configured
pub const DEFAULT_ENVIRONMENT: &str = "dev";

// Re-exports for convenience
pub use builder::{AspectBuilder, AspectCapabilities, BuildContext, SkipReason, SkippedAspect};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use emitter::{EmitLayout, EmitReport, FileEmitter, MCP_FILE_NAME};
pub use error::{StageError, StageResult};
pub use model::{Aspect, AspectKind, AuditStamp, ChangeProposal, ChangeType, EntityKind,
    EntitySpec, Urn};
pub use orchestrator::{BatchOutcome, StagingOptions, StagingOrchestrator, StagingResult};
