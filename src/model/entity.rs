//! Entity kinds and the caller-supplied field set
//!
//! `EntitySpec` is deliberately permissive: every field is optional at parse
//! time and unknown fields are ignored. Validation of the identifying key and
//! display name happens in the orchestrator pre-flight, not here.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StageError, StageResult};

/// Kind of catalog entity the pipeline can stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Tag,
    GlossaryTerm,
    Domain,
    DataProduct,
    DataContract,
}

impl EntityKind {
    /// Catalog entity-type string used in change proposals and URNs
    pub fn entity_type(self) -> &'static str {
        match self {
            EntityKind::Tag => "tag",
            EntityKind::GlossaryTerm => "glossaryTerm",
            EntityKind::Domain => "domain",
            EntityKind::DataProduct => "dataProduct",
            EntityKind::DataContract => "dataContract",
        }
    }

    /// Per-kind name of the properties aspect
    pub fn properties_aspect_name(self) -> &'static str {
        match self {
            EntityKind::Tag => "tagProperties",
            EntityKind::GlossaryTerm => "glossaryTermInfo",
            EntityKind::Domain => "domainProperties",
            EntityKind::DataProduct => "dataProductProperties",
            EntityKind::DataContract => "dataContractProperties",
        }
    }

    /// Directory segment used by the emitter layouts
    pub fn dir_segment(self) -> &'static str {
        match self {
            EntityKind::Tag => "tags",
            EntityKind::GlossaryTerm => "glossary_terms",
            EntityKind::Domain => "domains",
            EntityKind::DataProduct => "data_products",
            EntityKind::DataContract => "data_contracts",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_type())
    }
}

/// An owner reference: either a bare URN/username string or a record with an
/// explicit ownership type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerSpec {
    Reference(String),
    Detailed {
        owner: String,
        #[serde(default = "default_ownership_type", rename = "type")]
        ownership_type: String,
    },
}

impl OwnerSpec {
    pub fn reference(&self) -> &str {
        match self {
            OwnerSpec::Reference(r) => r,
            OwnerSpec::Detailed { owner, .. } => owner,
        }
    }

    pub fn ownership_type(&self) -> &str {
        match self {
            OwnerSpec::Reference(_) => "BUSINESS_OWNER",
            OwnerSpec::Detailed { ownership_type, .. } => ownership_type,
        }
    }
}

fn default_ownership_type() -> String {
    "BUSINESS_OWNER".to_string()
}

/// A documentation link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// One structured-property value assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPropertySpec {
    #[serde(alias = "propertyUrn")]
    pub property_urn: String,
    pub value: serde_json::Value,
}

/// The flat field set describing one entity instance
///
/// Supplied by a CLI descriptor file or a web-form-derived payload. Only the
/// identifying key (`urn` or `id`) and `name` are required, and those are
/// enforced by the orchestrator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntitySpec {
    #[serde(default)]
    pub urn: Option<String>,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, alias = "externalUrl")]
    pub external_url: Option<String>,

    /// Tag display color (hex); ignored for other kinds
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default, alias = "customProperties")]
    pub custom_properties: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub owners: Vec<OwnerSpec>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, alias = "glossaryTerms", alias = "terms")]
    pub glossary_terms: Vec<String>,

    #[serde(default)]
    pub domains: Vec<String>,

    #[serde(default, alias = "subTypes")]
    pub sub_types: Vec<String>,

    #[serde(default)]
    pub links: Vec<LinkSpec>,

    #[serde(default, alias = "structuredProperties")]
    pub structured_properties: Vec<StructuredPropertySpec>,

    #[serde(default)]
    pub removed: bool,

    #[serde(default)]
    pub deprecated: bool,

    #[serde(default, alias = "deprecationNote")]
    pub deprecation_note: Option<String>,

    /// Accepted end-to-end but only logged by the assembler
    #[serde(default, alias = "customAspects")]
    pub custom_aspects: BTreeMap<String, serde_json::Value>,
}

/// Parse a single entity descriptor from file content, by extension
/// (`.yaml`/`.yml` are YAML, anything else JSON).
pub fn parse_entity(path: &Path, content: &str) -> StageResult<EntitySpec> {
    parse_descriptor(path, content)
}

/// Parse a batch descriptor: a JSON/YAML array of entities.
pub fn parse_entity_batch(path: &Path, content: &str) -> StageResult<Vec<EntitySpec>> {
    parse_descriptor(path, content)
}

fn parse_descriptor<T: serde::de::DeserializeOwned>(
    path: &Path,
    content: &str,
) -> StageResult<T> {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_yaml_ng::from_str(content).map_err(|e| StageError::InvalidEntityFile {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    } else {
        serde_json::from_str(content).map_err(|e| StageError::InvalidEntityFile {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }?;
    Ok(parsed)
}
