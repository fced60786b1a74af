// ── Application domain types ──
//
// `DeclaredApplication` is what the caller tracks and edits;
// `ApplicationSnapshot` is what the remote system reports back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::exposure::{ApplicationExposure, DeclaredExposure};
use super::revision::Revision;

pub const DEFAULT_CHANNEL: &str = "latest/stable";

// ── Declared state ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclaredCharm {
    pub name: String,
    /// Specified as `<track>/<risk>/<branch>`.
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default, skip_serializing_if = "Revision::is_latest")]
    pub revision: Revision,
    /// Computed by the remote system when not declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

impl DeclaredCharm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channel: default_channel(),
            revision: Revision::Latest,
            series: None,
        }
    }
}

/// Desired state for one application deployed into a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclaredApplication {
    /// Application name; defaults to the charm name on the remote side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub model: String,
    pub charm: DeclaredCharm,
    #[serde(default = "default_units")]
    pub units: u32,
    /// Only the keys listed here are managed; everything else the remote
    /// reports is ignored.
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub trust: bool,
    #[serde(default, skip_serializing_if = "DeclaredExposure::is_absent")]
    pub expose: DeclaredExposure,
}

impl DeclaredApplication {
    pub fn new(model: impl Into<String>, charm: DeclaredCharm) -> Self {
        Self {
            name: None,
            model: model.into(),
            charm,
            units: default_units(),
            config: BTreeMap::new(),
            trust: false,
            expose: DeclaredExposure::Absent,
        }
    }

    /// The name the application is (or will be) deployed under.
    pub fn effective_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.charm.name)
    }
}

fn default_channel() -> String {
    DEFAULT_CHANNEL.into()
}

fn default_units() -> u32 {
    1
}

// ── Remote state ────────────────────────────────────────────────────

/// Authoritative application state read back from the remote system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSnapshot {
    /// Application name.
    pub name: String,
    /// Charm name.
    pub charm: String,
    pub channel: String,
    pub revision: u32,
    pub series: String,
    pub units: u32,
    #[serde(default)]
    pub trust: bool,
    /// `None` when the application is not exposed at all.
    #[serde(default)]
    pub expose: Option<ApplicationExposure>,
    /// Every config key the charm declares, defaults included.
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::ExposureRule;

    #[test]
    fn document_defaults() {
        let app: DeclaredApplication = toml::from_str(
            r#"
model = "prod"

[charm]
name = "postgresql"
"#,
        )
        .unwrap();

        assert_eq!(app.units, 1);
        assert!(!app.trust);
        assert!(app.config.is_empty());
        assert!(app.expose.is_absent());
        assert_eq!(app.charm.channel, DEFAULT_CHANNEL);
        assert_eq!(app.charm.revision, Revision::Latest);
        assert_eq!(app.effective_name(), "postgresql");
    }

    #[test]
    fn document_with_expose_block() {
        let app: DeclaredApplication = toml::from_str(
            r#"
name = "db"
model = "prod"
units = 3

[charm]
name = "postgresql"
channel = "14/stable"
revision = 0

[config]
profile = "production"

[expose.db-admin]
cidrs = "10.0.0.0/8, 192.168.0.0/16"
"#,
        )
        .unwrap();

        assert_eq!(app.charm.revision, Revision::Pinned(0));
        assert_eq!(app.effective_name(), "db");
        let endpoints = app.expose.endpoints().unwrap();
        assert_eq!(
            endpoints.get("db-admin"),
            Some(&ExposureRule::cidrs(["10.0.0.0/8", "192.168.0.0/16"]))
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<DeclaredApplication, _> = toml::from_str(
            r#"
model = "prod"
replicas = 3

[charm]
name = "postgresql"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn absent_expose_and_latest_revision_are_not_serialized() {
        let app = DeclaredApplication::new("prod", DeclaredCharm::new("redis"));
        let rendered = serde_yaml::to_string(&app).unwrap();
        assert!(!rendered.contains("expose"));
        assert!(!rendered.contains("revision"));
    }
}
