//! Aspect Builder
//!
//! Per-facet build functions: each takes the flat `EntitySpec` and produces
//! the typed aspect for one facet, or nothing when the corresponding input is
//! absent. A facet that cannot be built (capability disabled, malformed
//! sub-field) is recorded as a `SkippedAspect` and logged at WARN. It never
//! aborts sibling facets.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use tracing::warn;

use crate::error::StageResult;
use crate::model::aspect::{
    Aspect, AspectKind, DeprecationAspect, DomainsAspect, GlobalTagsAspect, GlossaryTermsAspect,
    InstitutionalMemoryAspect, MemoryElement, Owner, OwnerSource, OwnershipAspect,
    PropertiesAspect, StatusAspect, StructuredPropertiesAspect, StructuredPropertyAssignment,
    SubTypesAspect, TagAssociation, TermAssociation,
};
use crate::model::audit::{AuditStamp, SYSTEM_ACTOR};
use crate::model::entity::{EntityKind, EntitySpec};
use crate::model::urn::Urn;

/// Which facets this builder is able to construct
///
/// The injected replacement for import-time availability flags: the real
/// backend is `all()`, the null/stub backend is `none()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectCapabilities(BTreeSet<AspectKind>);

impl AspectCapabilities {
    /// Every facet enabled
    pub fn all() -> Self {
        Self(AspectKind::ORDER.iter().copied().collect())
    }

    /// No facet enabled (null backend)
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Disable one facet
    pub fn without(mut self, kind: AspectKind) -> Self {
        self.0.remove(&kind);
        self
    }

    /// Enable one facet
    pub fn with(mut self, kind: AspectKind) -> Self {
        self.0.insert(kind);
        self
    }

    pub fn enabled(&self, kind: AspectKind) -> bool {
        self.0.contains(&kind)
    }
}

impl Default for AspectCapabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// Why a facet was omitted from the build output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Capability disabled at configuration time
    Disabled,
    /// Input present but malformed
    Invalid(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => f.write_str("capability disabled"),
            SkipReason::Invalid(message) => write!(f, "invalid input: {message}"),
        }
    }
}

/// One omitted facet, visible in the build output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAspect {
    pub kind: AspectKind,
    pub reason: SkipReason,
}

/// Per-invocation inputs shared by every facet
#[derive(Debug, Clone, Copy)]
pub struct BuildContext {
    /// Time applied to every stamp in this invocation
    pub now_millis: i64,
}

/// Result of building all facets for one entity
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub aspects: Vec<Aspect>,
    pub skipped: Vec<SkippedAspect>,
}

/// Builds typed aspects from a flat entity field set
#[derive(Debug, Clone)]
pub struct AspectBuilder {
    capabilities: AspectCapabilities,
}

impl AspectBuilder {
    pub fn new(capabilities: AspectCapabilities) -> Self {
        Self { capabilities }
    }

    /// Build every facet that has corresponding input, in assembly order.
    ///
    /// The caller is responsible for having validated `name` pre-flight;
    /// a spec without one simply produces no properties aspect here.
    pub fn build_all(
        &self,
        entity: EntityKind,
        spec: &EntitySpec,
        ctx: &BuildContext,
    ) -> BuildOutput {
        let mut output = BuildOutput::default();

        for kind in AspectKind::ORDER {
            if !has_input(kind, spec) {
                continue;
            }
            if !self.capabilities.enabled(kind) {
                warn!(aspect = ?kind, "aspect skipped: capability disabled");
                output.skipped.push(SkippedAspect {
                    kind,
                    reason: SkipReason::Disabled,
                });
                continue;
            }
            match build_one(kind, entity, spec, ctx) {
                Ok(aspect) => output.aspects.push(aspect),
                Err(err) => {
                    let message = err.to_string();
                    warn!(aspect = ?kind, error = %message, "aspect skipped: invalid input");
                    output.skipped.push(SkippedAspect {
                        kind,
                        reason: SkipReason::Invalid(message),
                    });
                }
            }
        }

        output
    }
}

impl Default for AspectBuilder {
    fn default() -> Self {
        Self::new(AspectCapabilities::all())
    }
}

/// Whether the spec carries input for the facet at all. Status is the one
/// unconditional facet.
fn has_input(kind: AspectKind, spec: &EntitySpec) -> bool {
    match kind {
        AspectKind::Properties => spec.name.is_some(),
        AspectKind::Status => true,
        AspectKind::Ownership => !spec.owners.is_empty(),
        AspectKind::GlobalTags => !spec.tags.is_empty(),
        AspectKind::GlossaryTerms => !spec.glossary_terms.is_empty(),
        AspectKind::InstitutionalMemory => !spec.links.is_empty(),
        AspectKind::StructuredProperties => !spec.structured_properties.is_empty(),
        AspectKind::Domains => !spec.domains.is_empty(),
        AspectKind::SubTypes => !spec.sub_types.is_empty(),
        AspectKind::Deprecation => spec.deprecated,
    }
}

fn build_one(
    kind: AspectKind,
    entity: EntityKind,
    spec: &EntitySpec,
    ctx: &BuildContext,
) -> StageResult<Aspect> {
    match kind {
        AspectKind::Properties => build_properties(entity, spec),
        AspectKind::Status => Ok(Aspect::Status(StatusAspect {
            removed: spec.removed,
        })),
        AspectKind::Ownership => build_ownership(spec, ctx),
        AspectKind::GlobalTags => build_global_tags(spec),
        AspectKind::GlossaryTerms => build_glossary_terms(spec, ctx),
        AspectKind::InstitutionalMemory => build_institutional_memory(spec, ctx),
        AspectKind::StructuredProperties => build_structured_properties(spec),
        AspectKind::Domains => build_domains(spec),
        AspectKind::SubTypes => build_sub_types(spec),
        AspectKind::Deprecation => build_deprecation(spec, ctx),
    }
}

fn build_properties(entity: EntityKind, spec: &EntitySpec) -> StageResult<Aspect> {
    // has_input guarantees name is present
    let name = spec.name.clone().unwrap_or_default();
    let color_hex = match entity {
        EntityKind::Tag => spec.color.clone(),
        _ => None,
    };
    Ok(Aspect::Properties(PropertiesAspect {
        name,
        description: spec.description.clone(),
        external_url: spec.external_url.clone(),
        color_hex,
        custom_properties: coerce_custom_properties(&spec.custom_properties),
    }))
}

fn build_ownership(spec: &EntitySpec, ctx: &BuildContext) -> StageResult<Aspect> {
    let mut owners = Vec::with_capacity(spec.owners.len());
    for owner in &spec.owners {
        owners.push(Owner {
            owner: Urn::corpuser(owner.reference())?,
            ownership_type: owner.ownership_type().to_string(),
            source: OwnerSource::manual(),
        });
    }
    Ok(Aspect::Ownership(OwnershipAspect {
        owners,
        last_modified: AuditStamp::system(ctx.now_millis),
    }))
}

fn build_global_tags(spec: &EntitySpec) -> StageResult<Aspect> {
    let tags = spec
        .tags
        .iter()
        .map(|t| Ok(TagAssociation { tag: Urn::tag(t)? }))
        .collect::<StageResult<Vec<_>>>()?;
    Ok(Aspect::GlobalTags(GlobalTagsAspect { tags }))
}

fn build_glossary_terms(spec: &EntitySpec, ctx: &BuildContext) -> StageResult<Aspect> {
    let terms = spec
        .glossary_terms
        .iter()
        .map(|t| {
            Ok(TermAssociation {
                urn: Urn::glossary_term(t)?,
            })
        })
        .collect::<StageResult<Vec<_>>>()?;
    Ok(Aspect::GlossaryTerms(GlossaryTermsAspect {
        terms,
        audit_stamp: AuditStamp::system(ctx.now_millis),
    }))
}

fn build_institutional_memory(spec: &EntitySpec, ctx: &BuildContext) -> StageResult<Aspect> {
    let mut elements = Vec::with_capacity(spec.links.len());
    for link in &spec.links {
        if link.url.trim().is_empty() {
            return Err(crate::error::StageError::InvalidField {
                field: "links.url".to_string(),
                message: "must be non-empty".to_string(),
            });
        }
        elements.push(MemoryElement {
            url: link.url.clone(),
            description: link.description.clone(),
            create_stamp: AuditStamp::system(ctx.now_millis),
        });
    }
    Ok(Aspect::InstitutionalMemory(InstitutionalMemoryAspect {
        elements,
    }))
}

fn build_structured_properties(spec: &EntitySpec) -> StageResult<Aspect> {
    // Group values by property URN, preserving first-seen order
    let mut order: Vec<Urn> = Vec::new();
    let mut grouped: BTreeMap<Urn, Vec<serde_json::Value>> = BTreeMap::new();
    for assignment in &spec.structured_properties {
        let urn = Urn::parse(&assignment.property_urn)?;
        if !grouped.contains_key(&urn) {
            order.push(urn.clone());
        }
        grouped.entry(urn).or_default().push(assignment.value.clone());
    }
    let properties = order
        .into_iter()
        .map(|urn| {
            let values = grouped.remove(&urn).unwrap_or_default();
            StructuredPropertyAssignment {
                property_urn: urn,
                values,
            }
        })
        .collect();
    Ok(Aspect::StructuredProperties(StructuredPropertiesAspect {
        properties,
    }))
}

fn build_domains(spec: &EntitySpec) -> StageResult<Aspect> {
    let domains = spec
        .domains
        .iter()
        .map(|d| Urn::domain(d))
        .collect::<StageResult<Vec<_>>>()?;
    Ok(Aspect::Domains(DomainsAspect { domains }))
}

fn build_sub_types(spec: &EntitySpec) -> StageResult<Aspect> {
    Ok(Aspect::SubTypes(SubTypesAspect {
        type_names: spec.sub_types.clone(),
    }))
}

fn build_deprecation(spec: &EntitySpec, ctx: &BuildContext) -> StageResult<Aspect> {
    Ok(Aspect::Deprecation(DeprecationAspect {
        deprecated: true,
        note: spec.deprecation_note.clone().unwrap_or_default(),
        decommission_time: Some(ctx.now_millis),
        actor: SYSTEM_ACTOR.to_string(),
    }))
}

/// Degrade arbitrary custom-property values to strings: scalars render as
/// their display form, structured values as compact JSON.
fn coerce_custom_properties(
    raw: &BTreeMap<String, serde_json::Value>,
) -> BTreeMap<String, String> {
    raw.iter()
        .map(|(key, value)| {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}
