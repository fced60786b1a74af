//! `charmplan refresh`: fold a controller snapshot into tracked state.

use std::fmt::Write as _;

use serde::Serialize;
use tabled::Tabled;
use tracing::{debug, info};

use charmplan_core::{
    ApplicationId, ApplicationSnapshot, DeclaredApplication, DeclaredExposure, UpdateField,
    compute_update_delta, merge_snapshot,
};

use crate::cli::RefreshArgs;
use crate::error::{CliError, exit_code};
use crate::output::{self, Printer};

use super::{format_config, format_endpoints};

#[derive(Debug, Serialize)]
pub struct RefreshReport {
    pub id: String,
    /// Fields the next plan would change to restore the tracked values.
    pub drift: Vec<UpdateField>,
    pub state: DeclaredApplication,
}

/// Merge `snapshot` into `tracked`. When `id` is given its model wins,
/// and its application must be the one the snapshot describes.
pub fn refresh(
    tracked: &DeclaredApplication,
    snapshot: &ApplicationSnapshot,
    id: Option<&ApplicationId>,
) -> Result<RefreshReport, CliError> {
    if let Some(id) = id.filter(|id| id.application != snapshot.name) {
        return Err(CliError::Validation {
            field: "id".into(),
            reason: format!(
                "ID names application '{}' but the snapshot is of '{}'",
                id.application, snapshot.name
            ),
        });
    }

    let mut state = merge_snapshot(tracked, snapshot);
    if let Some(id) = id {
        state.model.clone_from(&id.model);
    }
    let id = ApplicationId::new(&state.model, state.effective_name());
    let drift = compute_update_delta(&state, tracked).fields();
    Ok(RefreshReport {
        id: id.to_string(),
        drift,
        state,
    })
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "Attribute")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn state_rows(state: &DeclaredApplication) -> Vec<StateRow> {
    let row = |name, value| StateRow { name, value };
    vec![
        row("name", state.effective_name().to_owned()),
        row("model", state.model.clone()),
        row("charm", state.charm.name.clone()),
        row("channel", state.charm.channel.clone()),
        row("revision", state.charm.revision.to_string()),
        row("series", state.charm.series.clone().unwrap_or_default()),
        row("units", state.units.to_string()),
        row("trust", state.trust.to_string()),
        row(
            "expose",
            match &state.expose {
                DeclaredExposure::Absent => "(not exposed)".into(),
                DeclaredExposure::Present(endpoints) => format_endpoints(endpoints),
            },
        ),
        row("config", format_config(&state.config)),
    ]
}

fn detail(report: &RefreshReport) -> String {
    let mut out = output::render_table(&state_rows(&report.state));
    if report.drift.is_empty() {
        let _ = write!(out, "\n{} matches the tracked state.", report.id);
    } else {
        let fields: Vec<_> = report.drift.iter().map(ToString::to_string).collect();
        let _ = write!(out, "\ndrift on {}: {}", report.id, fields.join(", "));
    }
    out
}

fn plain(report: &RefreshReport) -> String {
    report
        .drift
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &RefreshArgs, printer: &Printer) -> Result<i32, CliError> {
    let id = args
        .id
        .as_deref()
        .map(str::parse::<ApplicationId>)
        .transpose()?;
    let tracked = charmplan_config::load_declared(&args.tracked)?;
    let snapshot = charmplan_config::load_snapshot(&args.snapshot)?;

    let report = refresh(&tracked, &snapshot, id.as_ref())?;
    debug!(id = %report.id, "snapshot merged");
    if !report.drift.is_empty() {
        info!(id = %report.id, drift = ?report.drift, "remote state drifted");
    }

    let out = output::render_single(printer.format, &report, detail, plain)?;
    printer.print(&out);
    Ok(exit_code::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use charmplan_core::{DeclaredCharm, Revision};

    use super::*;

    fn tracked() -> DeclaredApplication {
        let mut app = DeclaredApplication::new("prod", DeclaredCharm::new("postgresql"));
        app.units = 3;
        app.config = BTreeMap::from([("profile".to_owned(), "production".to_owned())]);
        app
    }

    fn snapshot() -> ApplicationSnapshot {
        ApplicationSnapshot {
            name: "postgresql".into(),
            charm: "postgresql".into(),
            channel: "14/stable".into(),
            revision: 363,
            series: "jammy".into(),
            units: 3,
            trust: false,
            expose: None,
            config: BTreeMap::from([
                ("profile".to_owned(), "production".to_owned()),
                ("max_connections".to_owned(), "100".to_owned()),
            ]),
        }
    }

    #[test]
    fn matching_snapshot_has_no_drift() {
        let report = refresh(&tracked(), &snapshot(), None).unwrap();
        assert_eq!(report.id, "prod:postgresql");
        assert!(report.drift.is_empty());
        assert_eq!(report.state.charm.revision, Revision::Pinned(363));
        assert!(!report.state.config.contains_key("max_connections"));
    }

    #[test]
    fn scaled_down_remote_shows_units_drift() {
        let mut remote = snapshot();
        remote.units = 1;
        remote.config.insert("profile".into(), "testing".into());

        let report = refresh(&tracked(), &remote, None).unwrap();
        assert_eq!(report.drift, vec![UpdateField::Units, UpdateField::Config]);
        assert_eq!(report.state.units, 1);
        assert_eq!(plain(&report), "units\nconfig");
    }

    #[test]
    fn explicit_id_sets_model() {
        let id: ApplicationId = "staging:postgresql".parse().unwrap();
        let report = refresh(&tracked(), &snapshot(), Some(&id)).unwrap();
        assert_eq!(report.id, "staging:postgresql");
        assert_eq!(report.state.model, "staging");
    }

    #[test]
    fn id_for_another_application_is_rejected() {
        let id: ApplicationId = "staging:other".parse().unwrap();
        let err = refresh(&tracked(), &snapshot(), Some(&id)).unwrap_err();
        assert!(matches!(
            err,
            CliError::Validation { ref field, ref reason }
                if field == "id" && reason.contains("'other'") && reason.contains("'postgresql'")
        ));
        assert_eq!(err.exit_code(), exit_code::INVALID_INPUT);
    }
}
