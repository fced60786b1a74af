// ── Exposure reconciliation ──
//
// Turns an old/new pair of declared exposure blocks into the expose and
// unexpose directives the remote system understands.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{DeclaredExposure, ExposureRule};

/// Which endpoints to withdraw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnexposeTarget {
    /// Withdraw every exposed endpoint in one directive.
    All,
    /// Withdraw the listed endpoints, in this order.
    Endpoints(Vec<String>),
}

impl UnexposeTarget {
    pub fn none() -> Self {
        Self::Endpoints(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::All => false,
            Self::Endpoints(names) => names.is_empty(),
        }
    }
}

impl Default for UnexposeTarget {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExposureDelta {
    pub to_expose: BTreeMap<String, ExposureRule>,
    pub to_unexpose: UnexposeTarget,
}

impl ExposureDelta {
    pub fn is_empty(&self) -> bool {
        self.to_expose.is_empty() && self.to_unexpose.is_empty()
    }
}

/// Compute the exposure directives for a transition from `old` to `new`.
///
/// An absent `new` block withdraws everything through the remote
/// "unexpose all" directive; the old endpoint set is not enumerated.
///
/// A present `new` block is diffed against an empty rule set, so every
/// declared endpoint is (re-)exposed. Endpoints that only appear in `old`
/// are left exposed: dropping one endpoint from a block that is still
/// present never produces an unexpose. See [`retained_endpoints`].
pub fn compute_exposure_delta(_old: &DeclaredExposure, new: &DeclaredExposure) -> ExposureDelta {
    let Some(desired) = new.endpoints() else {
        return ExposureDelta {
            to_expose: BTreeMap::new(),
            to_unexpose: UnexposeTarget::All,
        };
    };

    // Prior rules are not compared value-by-value, so nothing is ever
    // "changed" here and there is no withdraw-then-reapply.
    ExposureDelta {
        to_expose: desired.clone(),
        to_unexpose: UnexposeTarget::none(),
    }
}

/// Endpoints present in `old` but missing from a still-present `new`.
///
/// These stay exposed remotely after [`compute_exposure_delta`] runs.
pub fn retained_endpoints(old: &DeclaredExposure, new: &DeclaredExposure) -> Vec<String> {
    match (old.endpoints(), new.endpoints()) {
        (Some(old), Some(new)) => old
            .keys()
            .filter(|name| !new.contains_key(*name))
            .cloned()
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn web_open() -> DeclaredExposure {
        [("web", ExposureRule::cidrs(["0.0.0.0/0"]))]
            .into_iter()
            .collect()
    }

    #[test]
    fn exposing_from_nothing() {
        let delta = compute_exposure_delta(&DeclaredExposure::Absent, &web_open());
        assert_eq!(
            delta.to_expose,
            BTreeMap::from([("web".to_owned(), ExposureRule::cidrs(["0.0.0.0/0"]))])
        );
        assert_eq!(delta.to_unexpose, UnexposeTarget::none());
    }

    #[test]
    fn removing_block_unexposes_all() {
        let delta = compute_exposure_delta(&web_open(), &DeclaredExposure::Absent);
        assert!(delta.to_expose.is_empty());
        assert_eq!(delta.to_unexpose, UnexposeTarget::All);
    }

    #[test]
    fn absent_to_absent_still_signals_unexpose_all() {
        let delta = compute_exposure_delta(&DeclaredExposure::Absent, &DeclaredExposure::Absent);
        assert!(delta.to_expose.is_empty());
        assert_eq!(delta.to_unexpose, UnexposeTarget::All);
    }

    #[test]
    fn every_new_endpoint_is_exposed_regardless_of_old() {
        let old: DeclaredExposure = [
            ("web", ExposureRule::cidrs(["0.0.0.0/0"])),
            ("admin", ExposureRule::spaces(["mgmt"])),
        ]
        .into_iter()
        .collect();
        let new: DeclaredExposure = [
            ("web", ExposureRule::cidrs(["0.0.0.0/0"])),
            ("api", ExposureRule::default()),
        ]
        .into_iter()
        .collect();

        let delta = compute_exposure_delta(&old, &new);
        let keys: Vec<&str> = delta.to_expose.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["api", "web"]);
        assert_eq!(delta.to_unexpose, UnexposeTarget::none());
    }

    #[test]
    fn dropping_one_endpoint_from_present_block_does_not_unexpose() {
        let old: DeclaredExposure = [
            ("web", ExposureRule::cidrs(["0.0.0.0/0"])),
            ("admin", ExposureRule::spaces(["mgmt"])),
        ]
        .into_iter()
        .collect();

        let delta = compute_exposure_delta(&old, &web_open());
        assert_eq!(delta.to_unexpose, UnexposeTarget::none());
        assert!(!delta.to_expose.contains_key("admin"));
        assert_eq!(retained_endpoints(&old, &web_open()), vec!["admin".to_owned()]);
    }

    #[test]
    fn present_without_endpoints_yields_empty_delta() {
        let delta =
            compute_exposure_delta(&web_open(), &DeclaredExposure::Present(BTreeMap::new()));
        assert!(delta.is_empty());
    }

    #[test]
    fn retained_endpoints_ignore_absent_sides() {
        assert!(retained_endpoints(&web_open(), &DeclaredExposure::Absent).is_empty());
        assert!(retained_endpoints(&DeclaredExposure::Absent, &web_open()).is_empty());
    }
}
