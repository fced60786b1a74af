// ── Read-back merging ──
//
// Folds an authoritative remote snapshot into locally tracked state.
// The remote reports a superset of what the caller manages (every config
// key the charm declares, defaults included), so merging is bounded by
// what the tracked state already mentions.

use std::collections::BTreeMap;

use crate::model::{
    ApplicationExposure, ApplicationSnapshot, DeclaredApplication, DeclaredExposure, Revision,
};

/// Restrict remote config to the tracked key set.
///
/// The result has exactly the keys of `tracked`. A key the remote no
/// longer reports maps to an empty string; keys unknown to the caller
/// are dropped.
pub fn merge_config(
    tracked: &BTreeMap<String, String>,
    remote: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    tracked
        .keys()
        .map(|key| (key.clone(), remote.get(key).cloned().unwrap_or_default()))
        .collect()
}

/// Translate remote exposure into declared form.
///
/// No remote exposure is `Absent`, not an empty-but-present block.
pub fn merge_exposure(remote: Option<&ApplicationExposure>) -> DeclaredExposure {
    remote.map_or(DeclaredExposure::Absent, |exposure| {
        DeclaredExposure::Present(exposure.endpoints.clone())
    })
}

/// Apply a full remote read-back to tracked state.
///
/// Computed fields (name, revision, series) take the remote value.
/// `model` is not reported remotely and is kept as tracked.
pub fn merge_snapshot(
    tracked: &DeclaredApplication,
    snapshot: &ApplicationSnapshot,
) -> DeclaredApplication {
    let mut merged = tracked.clone();

    merged.name = Some(snapshot.name.clone());
    merged.charm.name.clone_from(&snapshot.charm);
    merged.charm.channel.clone_from(&snapshot.channel);
    merged.charm.revision = Revision::Pinned(snapshot.revision);
    merged.charm.series = Some(snapshot.series.clone());
    merged.units = snapshot.units;
    merged.trust = snapshot.trust;
    merged.expose = merge_exposure(snapshot.expose.as_ref());
    merged.config = merge_config(&tracked.config, &snapshot.config);

    merged
}
