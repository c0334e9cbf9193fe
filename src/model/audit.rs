//! Audit stamps
//!
//! Wire form: `{"time": <epoch-millis>, "actor": "urn:li:corpuser:..."}`.
//! Generated stamps always carry the fixed system actor; the time comes from
//! the clock resolved once per orchestration call.

use serde::{Deserialize, Serialize};

/// Actor recorded on stamps produced by this pipeline
pub const SYSTEM_ACTOR: &str = "urn:li:corpuser:__metastage";

/// A point-in-time attribution record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub time: i64,
    pub actor: String,
}

impl AuditStamp {
    /// Stamp attributed to the fixed system actor
    pub fn system(time: i64) -> Self {
        Self {
            time,
            actor: SYSTEM_ACTOR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_stamp_wire_form() {
        let stamp = AuditStamp::system(1_700_000_000_000);
        let json = serde_json::to_value(&stamp).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "time": 1_700_000_000_000_i64,
                "actor": "urn:li:corpuser:__metastage"
            })
        );
    }
}
