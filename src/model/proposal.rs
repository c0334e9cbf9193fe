//! Change proposals: the unit of staged change
//!
//! `{entityUrn, entityType, aspectName, changeType, aspect}` with the
//! payload already in wire form. The assembler guarantees at most one
//! proposal per aspect name per invocation.

use serde::{Deserialize, Serialize};

use crate::model::urn::Urn;

/// How the proposal is applied by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    #[default]
    Upsert,
    Create,
    Delete,
}

/// A single staged metadata change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeProposal {
    pub entity_urn: Urn,
    pub entity_type: String,
    pub aspect_name: String,
    pub change_type: ChangeType,
    pub aspect: serde_json::Value,
}

/// Render a proposal list as the on-disk document: a pretty-printed JSON
/// array (2-space indent) with a trailing newline, so re-runs with identical
/// input are byte-identical and git diffs stay clean.
pub fn render_document(proposals: &[ChangeProposal]) -> serde_json::Result<String> {
    let mut rendered = serde_json::to_string_pretty(proposals)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ChangeProposal {
        ChangeProposal {
            entity_urn: Urn::parse("urn:li:tag:pii").unwrap(),
            entity_type: "tag".to_string(),
            aspect_name: "status".to_string(),
            change_type: ChangeType::Upsert,
            aspect: json!({"removed": false}),
        }
    }

    #[test]
    fn change_type_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&ChangeType::Upsert).unwrap(), "\"UPSERT\"");
        assert_eq!(serde_json::to_string(&ChangeType::Delete).unwrap(), "\"DELETE\"");
    }

    #[test]
    fn proposal_wire_form() {
        assert_eq!(
            serde_json::to_value(sample()).unwrap(),
            json!({
                "entityUrn": "urn:li:tag:pii",
                "entityType": "tag",
                "aspectName": "status",
                "changeType": "UPSERT",
                "aspect": {"removed": false}
            })
        );
    }

    #[test]
    fn render_document_is_pretty_with_trailing_newline() {
        let doc = render_document(&[sample()]).unwrap();
        assert!(doc.ends_with('\n'));
        assert!(doc.contains("  \"entityUrn\""), "expected 2-space indent:\n{doc}");
    }

    #[test]
    fn render_document_empty_list() {
        assert_eq!(render_document(&[]).unwrap(), "[]\n");
    }
}
