//! URN value object
//!
//! Catalog identifiers have the form `urn:li:<type>:<id>`. The id segment
//! may itself contain colons (composite keys), so validation only requires
//! the prefix, a non-empty type, and a non-empty id.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StageError, StageResult};
use crate::model::entity::EntityKind;

const URN_PREFIX: &str = "urn:li:";

/// A validated catalog URN
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    /// Parse and validate a URN string
    pub fn parse(s: &str) -> StageResult<Self> {
        let rest = s.strip_prefix(URN_PREFIX).ok_or_else(|| StageError::InvalidUrn {
            urn: s.to_string(),
            message: format!("must start with '{URN_PREFIX}'"),
        })?;
        let (entity_type, id) = rest.split_once(':').ok_or_else(|| StageError::InvalidUrn {
            urn: s.to_string(),
            message: "expected 'urn:li:<type>:<id>'".to_string(),
        })?;
        if entity_type.is_empty() || id.is_empty() {
            return Err(StageError::InvalidUrn {
                urn: s.to_string(),
                message: "type and id segments must be non-empty".to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Construct the canonical URN for an entity of the given kind
    pub fn for_entity(kind: EntityKind, id: &str) -> Self {
        Self(format!("{URN_PREFIX}{}:{id}", kind.entity_type()))
    }

    /// Coerce a user reference into a corpuser URN (`alice` →
    /// `urn:li:corpuser:alice`); full URNs pass through validated.
    pub fn corpuser(reference: &str) -> StageResult<Self> {
        Self::coerce(reference, "corpuser")
    }

    /// Coerce a tag reference into a tag URN
    pub fn tag(reference: &str) -> StageResult<Self> {
        Self::coerce(reference, "tag")
    }

    /// Coerce a glossary-term reference into a glossaryTerm URN
    pub fn glossary_term(reference: &str) -> StageResult<Self> {
        Self::coerce(reference, "glossaryTerm")
    }

    /// Coerce a domain reference into a domain URN
    pub fn domain(reference: &str) -> StageResult<Self> {
        Self::coerce(reference, "domain")
    }

    fn coerce(reference: &str, entity_type: &str) -> StageResult<Self> {
        if reference.starts_with("urn:") {
            Self::parse(reference)
        } else if reference.is_empty() {
            Err(StageError::InvalidUrn {
                urn: reference.to_string(),
                message: "reference must be non-empty".to_string(),
            })
        } else {
            Ok(Self(format!("{URN_PREFIX}{entity_type}:{reference}")))
        }
    }

    /// The `<type>` segment
    pub fn entity_type(&self) -> &str {
        let rest = &self.0[URN_PREFIX.len()..];
        rest.split(':').next().unwrap_or("")
    }

    /// The `<id>` segment (everything after the type)
    pub fn id(&self) -> &str {
        let rest = &self.0[URN_PREFIX.len()..];
        rest.split_once(':').map(|(_, id)| id).unwrap_or("")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_urn() {
        let urn = Urn::parse("urn:li:tag:pii").unwrap();
        assert_eq!(urn.entity_type(), "tag");
        assert_eq!(urn.id(), "pii");
    }

    #[test]
    fn parse_composite_id() {
        let urn = Urn::parse("urn:li:dataset:(urn:li:dataPlatform:hive,db.table,PROD)").unwrap();
        assert_eq!(urn.entity_type(), "dataset");
        assert_eq!(urn.id(), "(urn:li:dataPlatform:hive,db.table,PROD)");
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        assert!(Urn::parse("li:tag:pii").is_err());
        assert!(Urn::parse("tag:pii").is_err());
    }

    #[test]
    fn parse_rejects_missing_id() {
        assert!(Urn::parse("urn:li:tag").is_err());
        assert!(Urn::parse("urn:li:tag:").is_err());
        assert!(Urn::parse("urn:li::pii").is_err());
    }

    #[test]
    fn for_entity_builds_prefixed_urn() {
        let urn = Urn::for_entity(EntityKind::Tag, "pii");
        assert_eq!(urn.as_str(), "urn:li:tag:pii");

        let urn = Urn::for_entity(EntityKind::DataProduct, "revenue");
        assert_eq!(urn.as_str(), "urn:li:dataProduct:revenue");
    }

    #[test]
    fn corpuser_coerces_bare_name() {
        assert_eq!(
            Urn::corpuser("alice").unwrap().as_str(),
            "urn:li:corpuser:alice"
        );
    }

    #[test]
    fn corpuser_passes_through_full_urn() {
        assert_eq!(
            Urn::corpuser("urn:li:corpGroup:data-eng").unwrap().as_str(),
            "urn:li:corpGroup:data-eng"
        );
    }

    #[test]
    fn corpuser_rejects_empty() {
        assert!(Urn::corpuser("").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let urn = Urn::parse("urn:li:domain:finance").unwrap();
        let json = serde_json::to_string(&urn).unwrap();
        assert_eq!(json, "\"urn:li:domain:finance\"");
    }
}
