//! Typed aspect payloads
//!
//! One variant per semantic facet of an entity. Payloads serialize directly
//! into the catalog's camelCase wire form; there is no second dict-shaped
//! representation anywhere in the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::audit::AuditStamp;
use crate::model::entity::EntityKind;
use crate::model::urn::Urn;

/// Facet discriminator, in assembly order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AspectKind {
    Properties,
    Status,
    Ownership,
    GlobalTags,
    GlossaryTerms,
    InstitutionalMemory,
    StructuredProperties,
    Domains,
    SubTypes,
    Deprecation,
}

impl AspectKind {
    /// Fixed assembly order. Downstream consumers (diff viewers, PR
    /// reviewers) rely on stable file content across runs, so this order
    /// must not change.
    pub const ORDER: [AspectKind; 10] = [
        AspectKind::Properties,
        AspectKind::Status,
        AspectKind::Ownership,
        AspectKind::GlobalTags,
        AspectKind::GlossaryTerms,
        AspectKind::InstitutionalMemory,
        AspectKind::StructuredProperties,
        AspectKind::Domains,
        AspectKind::SubTypes,
        AspectKind::Deprecation,
    ];

    /// Stable kebab-case name used in config files and `--skip-aspect`
    pub fn config_name(self) -> &'static str {
        match self {
            AspectKind::Properties => "properties",
            AspectKind::Status => "status",
            AspectKind::Ownership => "ownership",
            AspectKind::GlobalTags => "global-tags",
            AspectKind::GlossaryTerms => "glossary-terms",
            AspectKind::InstitutionalMemory => "institutional-memory",
            AspectKind::StructuredProperties => "structured-properties",
            AspectKind::Domains => "domains",
            AspectKind::SubTypes => "sub-types",
            AspectKind::Deprecation => "deprecation",
        }
    }

    /// Inverse of [`AspectKind::config_name`]
    pub fn parse_config_name(name: &str) -> Option<Self> {
        Self::ORDER
            .into_iter()
            .find(|kind| kind.config_name() == name)
    }

    /// Wire name of the aspect for the given entity kind. Only the
    /// properties aspect varies per kind.
    pub fn wire_name(self, entity: EntityKind) -> &'static str {
        match self {
            AspectKind::Properties => entity.properties_aspect_name(),
            AspectKind::Status => "status",
            AspectKind::Ownership => "ownership",
            AspectKind::GlobalTags => "globalTags",
            AspectKind::GlossaryTerms => "glossaryTerms",
            AspectKind::InstitutionalMemory => "institutionalMemory",
            AspectKind::StructuredProperties => "structuredProperties",
            AspectKind::Domains => "domains",
            AspectKind::SubTypes => "subTypes",
            AspectKind::Deprecation => "deprecation",
        }
    }
}

/// Display/documentation facet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesAspect {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,

    /// Tag display color; absent for other kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub custom_properties: BTreeMap<String, String>,
}

/// Soft-delete facet; the one aspect every staged entity carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusAspect {
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSource {
    #[serde(rename = "type")]
    pub source_type: String,
}

impl OwnerSource {
    pub fn manual() -> Self {
        Self {
            source_type: "MANUAL".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub owner: Urn,
    #[serde(rename = "type")]
    pub ownership_type: String,
    pub source: OwnerSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipAspect {
    pub owners: Vec<Owner>,
    pub last_modified: AuditStamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagAssociation {
    pub tag: Urn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalTagsAspect {
    pub tags: Vec<TagAssociation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermAssociation {
    pub urn: Urn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTermsAspect {
    pub terms: Vec<TermAssociation>,
    pub audit_stamp: AuditStamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryElement {
    pub url: String,
    pub description: String,
    pub create_stamp: AuditStamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionalMemoryAspect {
    pub elements: Vec<MemoryElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredPropertyAssignment {
    pub property_urn: Urn,
    pub values: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPropertiesAspect {
    pub properties: Vec<StructuredPropertyAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainsAspect {
    pub domains: Vec<Urn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTypesAspect {
    pub type_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprecationAspect {
    pub deprecated: bool,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decommission_time: Option<i64>,
    pub actor: String,
}

/// One facet of an entity's metadata, ready for assembly
#[derive(Debug, Clone, PartialEq)]
pub enum Aspect {
    Properties(PropertiesAspect),
    Status(StatusAspect),
    Ownership(OwnershipAspect),
    GlobalTags(GlobalTagsAspect),
    GlossaryTerms(GlossaryTermsAspect),
    InstitutionalMemory(InstitutionalMemoryAspect),
    StructuredProperties(StructuredPropertiesAspect),
    Domains(DomainsAspect),
    SubTypes(SubTypesAspect),
    Deprecation(DeprecationAspect),
}

impl Aspect {
    pub fn kind(&self) -> AspectKind {
        match self {
            Aspect::Properties(_) => AspectKind::Properties,
            Aspect::Status(_) => AspectKind::Status,
            Aspect::Ownership(_) => AspectKind::Ownership,
            Aspect::GlobalTags(_) => AspectKind::GlobalTags,
            Aspect::GlossaryTerms(_) => AspectKind::GlossaryTerms,
            Aspect::InstitutionalMemory(_) => AspectKind::InstitutionalMemory,
            Aspect::StructuredProperties(_) => AspectKind::StructuredProperties,
            Aspect::Domains(_) => AspectKind::Domains,
            Aspect::SubTypes(_) => AspectKind::SubTypes,
            Aspect::Deprecation(_) => AspectKind::Deprecation,
        }
    }

    /// Serialize the payload to its wire form
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Aspect::Properties(a) => serde_json::to_value(a),
            Aspect::Status(a) => serde_json::to_value(a),
            Aspect::Ownership(a) => serde_json::to_value(a),
            Aspect::GlobalTags(a) => serde_json::to_value(a),
            Aspect::GlossaryTerms(a) => serde_json::to_value(a),
            Aspect::InstitutionalMemory(a) => serde_json::to_value(a),
            Aspect::StructuredProperties(a) => serde_json::to_value(a),
            Aspect::Domains(a) => serde_json::to_value(a),
            Aspect::SubTypes(a) => serde_json::to_value(a),
            Aspect::Deprecation(a) => serde_json::to_value(a),
        }
    }
}
