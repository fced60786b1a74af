// ── Mutation API ──
//
// Every remote write an update can issue is one `Mutation` variant.
// A client applies them one at a time, in the order they are produced.

pub mod requests;

use std::collections::BTreeMap;

use serde::Serialize;
use strum::Display;

use crate::model::ExposureRule;
use crate::reconcile::{UnexposeTarget, UpdateField};

pub use requests::{CreateApplicationRequest, CreatedApplication};

/// A single remote mutation against an existing application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Mutation {
    SetUnits(u32),
    SetTrust(bool),
    Unexpose(UnexposeTarget),
    Expose(BTreeMap<String, ExposureRule>),
    SetRevision(u32),
    /// Replaces every managed config key at once.
    SetConfig(BTreeMap<String, String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MutationKind {
    SetUnits,
    SetTrust,
    Unexpose,
    Expose,
    SetRevision,
    SetConfig,
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::SetUnits(_) => MutationKind::SetUnits,
            Self::SetTrust(_) => MutationKind::SetTrust,
            Self::Unexpose(_) => MutationKind::Unexpose,
            Self::Expose(_) => MutationKind::Expose,
            Self::SetRevision(_) => MutationKind::SetRevision,
            Self::SetConfig(_) => MutationKind::SetConfig,
        }
    }

    /// The declared field this mutation converges.
    pub fn field(&self) -> UpdateField {
        match self {
            Self::SetUnits(_) => UpdateField::Units,
            Self::SetTrust(_) => UpdateField::Trust,
            Self::Unexpose(_) | Self::Expose(_) => UpdateField::Expose,
            Self::SetRevision(_) => UpdateField::Revision,
            Self::SetConfig(_) => UpdateField::Config,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mutations_serialize_with_kind_tag() {
        let json = serde_json::to_value(Mutation::SetUnits(7)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "set_units", "value": 7 }));

        let json = serde_json::to_value(Mutation::Unexpose(UnexposeTarget::All)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "unexpose", "value": "all" }));
    }

    #[test]
    fn expose_and_unexpose_share_a_field() {
        assert_eq!(
            Mutation::Unexpose(UnexposeTarget::All).field(),
            Mutation::Expose(BTreeMap::new()).field()
        );
        assert_eq!(MutationKind::SetRevision.to_string(), "set_revision");
    }
}
