// ── Update delta ──
//
// Per-field change detection between two declared states. Each changed
// field later becomes its own remote mutation; there is no cross-field
// transaction.

use std::collections::BTreeMap;

use serde::Serialize;
use strum::{Display, EnumIter};

use super::exposure::{ExposureDelta, compute_exposure_delta};
use crate::command::Mutation;
use crate::model::{DeclaredApplication, Revision};

/// Fields an update can touch, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpdateField {
    Units,
    Trust,
    Expose,
    Revision,
    Config,
}

/// Changed fields only; `None` means unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expose: Option<ExposureDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    /// The full desired config map, sent as a whole when any key changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, String>>,
}

impl UpdateDelta {
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Changed fields in application order.
    pub fn fields(&self) -> Vec<UpdateField> {
        let mut fields = Vec::new();
        if self.units.is_some() {
            fields.push(UpdateField::Units);
        }
        if self.trust.is_some() {
            fields.push(UpdateField::Trust);
        }
        if self.expose.is_some() {
            fields.push(UpdateField::Expose);
        }
        if self.revision.is_some() {
            fields.push(UpdateField::Revision);
        }
        if self.config.is_some() {
            fields.push(UpdateField::Config);
        }
        fields
    }

    /// Remote mutations implementing this delta, in the order they must
    /// be issued. An unexpose always precedes the matching expose.
    ///
    /// Moving into a present block always sends an expose, even with no
    /// endpoints: an empty map exposes with the remote defaults, the same
    /// as on create.
    pub fn mutations(&self) -> Vec<Mutation> {
        let mut mutations = Vec::new();

        if let Some(units) = self.units {
            mutations.push(Mutation::SetUnits(units));
        }
        if let Some(trust) = self.trust {
            mutations.push(Mutation::SetTrust(trust));
        }
        if let Some(expose) = &self.expose {
            if !expose.to_unexpose.is_empty() {
                mutations.push(Mutation::Unexpose(expose.to_unexpose.clone()));
            }
            if !expose.to_expose.is_empty() || expose.to_unexpose.is_empty() {
                mutations.push(Mutation::Expose(expose.to_expose.clone()));
            }
        }
        if let Some(revision) = self.revision {
            mutations.push(Mutation::SetRevision(revision));
        }
        if let Some(config) = &self.config {
            mutations.push(Mutation::SetConfig(config.clone()));
        }

        mutations
    }
}

/// Detect which fields differ between `old` and `new`.
///
/// A `new` revision of [`Revision::Latest`] never registers as a change:
/// the caller expressed no preference, so whatever revision the remote
/// chose (and `old` recorded on read) stands.
pub fn compute_update_delta(old: &DeclaredApplication, new: &DeclaredApplication) -> UpdateDelta {
    UpdateDelta {
        units: (old.units != new.units).then_some(new.units),
        trust: (old.trust != new.trust).then_some(new.trust),
        expose: (old.expose != new.expose)
            .then(|| compute_exposure_delta(&old.expose, &new.expose)),
        revision: revision_change(old.charm.revision, new.charm.revision),
        config: (old.config != new.config).then(|| new.config.clone()),
    }
}

/// Fields whose change can't be applied in place and needs a fresh
/// deployment: the model, an explicitly declared application name, and
/// the charm itself.
pub fn replacement_fields(old: &DeclaredApplication, new: &DeclaredApplication) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if old.model != new.model {
        fields.push("model");
    }
    if new.name.is_some() && old.name != new.name {
        fields.push("name");
    }
    if old.charm.name != new.charm.name {
        fields.push("charm.name");
    }
    fields
}

fn revision_change(old: Revision, new: Revision) -> Option<u32> {
    match new {
        Revision::Latest => None,
        Revision::Pinned(n) if old == Revision::Pinned(n) => None,
        Revision::Pinned(n) => Some(n),
    }
}
