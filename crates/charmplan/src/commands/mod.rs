//! Command handlers, one module per subcommand.

pub mod config_cmd;
pub mod plan;
pub mod refresh;

use std::collections::BTreeMap;
use std::fmt::Write as _;

use charmplan_core::{ExposureRule, Mutation, UnexposeTarget};

// ── Shared formatting ───────────────────────────────────────────────

/// `key=value` pairs joined with commas.
pub(crate) fn format_config(config: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (i, (key, value)) in config.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{key}={value}");
    }
    out
}

/// One `endpoint (rule)` entry per endpoint. The empty endpoint name
/// stands for every endpoint of the application.
pub(crate) fn format_endpoints(endpoints: &BTreeMap<String, ExposureRule>) -> String {
    if endpoints.is_empty() {
        return "(defaults)".into();
    }
    let mut out = String::new();
    for (i, (name, rule)) in endpoints.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let name = if name.is_empty() { "*" } else { name.as_str() };
        let _ = write!(out, "{name} ({rule})");
    }
    out
}

/// Human-readable argument of a mutation.
pub(crate) fn mutation_value(mutation: &Mutation) -> String {
    match mutation {
        Mutation::SetUnits(units) => units.to_string(),
        Mutation::SetTrust(trust) => trust.to_string(),
        Mutation::Unexpose(UnexposeTarget::All) => "all endpoints".into(),
        Mutation::Unexpose(UnexposeTarget::Endpoints(names)) => names.join(", "),
        Mutation::Expose(endpoints) => format_endpoints(endpoints),
        Mutation::SetRevision(revision) => revision.to_string(),
        Mutation::SetConfig(config) => format_config(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_endpoint_is_starred() {
        let endpoints = BTreeMap::from([
            (String::new(), ExposureRule::default()),
            ("db".to_owned(), ExposureRule::cidrs(["10.0.0.0/8"])),
        ]);
        assert_eq!(
            format_endpoints(&endpoints),
            "* (unrestricted), db (cidrs=10.0.0.0/8)"
        );
    }

    #[test]
    fn mutation_values() {
        assert_eq!(
            mutation_value(&Mutation::Unexpose(UnexposeTarget::All)),
            "all endpoints"
        );
        let config = BTreeMap::from([
            ("a".to_owned(), "1".to_owned()),
            ("b".to_owned(), String::new()),
        ]);
        assert_eq!(mutation_value(&Mutation::SetConfig(config)), "a=1, b=");
    }
}
