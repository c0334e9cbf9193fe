//! MCP Assembler
//!
//! Converts the built aspects for one entity into change proposals, applying
//! the fixed assembly order and the one-proposal-per-aspect-name guarantee.
//! Assembly is pure: identical input yields byte-identical proposal lists.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::warn;

use crate::error::StageResult;
use crate::model::aspect::{Aspect, AspectKind};
use crate::model::entity::EntityKind;
use crate::model::proposal::{ChangeProposal, ChangeType};
use crate::model::urn::Urn;

/// Wrap built aspects into UPSERT proposals for one entity.
///
/// Aspects arrive in build order already; this re-applies `AspectKind::ORDER`
/// so callers that construct aspect lists by hand still get stable output,
/// and drops duplicates past the first for any aspect name.
pub fn assemble(
    entity_urn: &Urn,
    entity: EntityKind,
    aspects: &[Aspect],
    custom_aspects: &BTreeMap<String, serde_json::Value>,
) -> StageResult<Vec<ChangeProposal>> {
    let mut proposals = Vec::with_capacity(aspects.len());
    let mut seen: BTreeSet<&'static str> = BTreeSet::new();

    for kind in AspectKind::ORDER {
        for aspect in aspects.iter().filter(|a| a.kind() == kind) {
            let aspect_name = kind.wire_name(entity);
            if !seen.insert(aspect_name) {
                warn!(aspect = aspect_name, "duplicate aspect dropped");
                continue;
            }
            proposals.push(ChangeProposal {
                entity_urn: entity_urn.clone(),
                entity_type: entity.entity_type().to_string(),
                aspect_name: aspect_name.to_string(),
                change_type: ChangeType::Upsert,
                aspect: aspect.to_value()?,
            });
        }
    }

    // Deliberate stub: custom aspects are accepted end-to-end but only
    // logged, never serialized.
    for name in custom_aspects.keys() {
        warn!(aspect = %name, "custom aspect not serialized (unsupported)");
    }

    Ok(proposals)
}
