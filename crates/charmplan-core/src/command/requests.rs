// ── Typed request structs for application lifecycle calls ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{DeclaredApplication, ExposureRule};

/// Deploy a new application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateApplicationRequest {
    /// Falls back to the charm name remotely when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    pub model: String,
    pub charm_name: String,
    pub channel: String,
    /// `None` lets the remote system pick the revision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    pub units: u32,
    pub config: BTreeMap<String, String>,
    pub trust: bool,
    /// `None` leaves the application unexposed; an empty map exposes it
    /// with the remote system's defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expose: Option<BTreeMap<String, ExposureRule>>,
}

impl From<&DeclaredApplication> for CreateApplicationRequest {
    fn from(app: &DeclaredApplication) -> Self {
        Self {
            application_name: app.name.clone(),
            model: app.model.clone(),
            charm_name: app.charm.name.clone(),
            channel: app.charm.channel.clone(),
            revision: app.charm.revision.pinned(),
            series: app.charm.series.clone(),
            units: app.units,
            config: app.config.clone(),
            trust: app.trust,
            expose: app.expose.endpoints().cloned(),
        }
    }
}

/// Values the remote system computed while deploying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedApplication {
    pub name: String,
    pub revision: u32,
    pub series: String,
}
