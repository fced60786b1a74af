//! `charmplan plan`: diff two declared documents into remote mutations.

use std::fmt::Write as _;

use serde::Serialize;
use tabled::Tabled;
use tracing::{debug, warn};

use charmplan_core::{
    ApplicationId, CreateApplicationRequest, DeclaredApplication, Mutation, UpdateDelta,
    compute_update_delta, replacement_fields, retained_endpoints,
};

use crate::cli::PlanArgs;
use crate::error::{CliError, exit_code};
use crate::output::{self, Marker, Printer};

use super::{format_config, format_endpoints, mutation_value};

// ── Report ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    Replace,
    Update,
    NoChanges,
}

#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub application: String,
    pub action: PlanAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<CreateApplicationRequest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires_replacement: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<UpdateDelta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mutations: Vec<Mutation>,
    /// Endpoints dropped from the expose block that stay exposed remotely.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub retained_endpoints: Vec<String>,
}

impl PlanReport {
    fn empty(application: String, action: PlanAction) -> Self {
        Self {
            application,
            action,
            create: None,
            requires_replacement: Vec::new(),
            delta: None,
            mutations: Vec::new(),
            retained_endpoints: Vec::new(),
        }
    }

    pub fn has_changes(&self) -> bool {
        self.action != PlanAction::NoChanges
    }
}

/// Work out what applying `new` over `old` would do.
pub fn build_plan(old: Option<&DeclaredApplication>, new: &DeclaredApplication) -> PlanReport {
    let Some(old) = old else {
        let id = ApplicationId::new(&new.model, new.effective_name());
        let mut report = PlanReport::empty(id.to_string(), PlanAction::Create);
        report.create = Some(CreateApplicationRequest::from(new));
        return report;
    };

    let id = ApplicationId::new(&old.model, old.effective_name());

    let fields = replacement_fields(old, new);
    if !fields.is_empty() {
        let mut report = PlanReport::empty(id.to_string(), PlanAction::Replace);
        report.requires_replacement = fields;
        report.create = Some(CreateApplicationRequest::from(new));
        return report;
    }

    let delta = compute_update_delta(old, new);
    if delta.is_empty() {
        return PlanReport::empty(id.to_string(), PlanAction::NoChanges);
    }

    let mut report = PlanReport::empty(id.to_string(), PlanAction::Update);
    report.mutations = delta.mutations();
    report.retained_endpoints = retained_endpoints(&old.expose, &new.expose);
    report.delta = Some(delta);
    report
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct MutationRow {
    #[tabled(rename = "#")]
    step: usize,
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Mutation")]
    kind: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct AttributeRow {
    #[tabled(rename = "Attribute")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn mutation_rows(mutations: &[Mutation]) -> Vec<MutationRow> {
    mutations
        .iter()
        .enumerate()
        .map(|(i, m)| MutationRow {
            step: i + 1,
            field: m.field().to_string(),
            kind: m.kind().to_string(),
            value: mutation_value(m),
        })
        .collect()
}

fn create_rows(request: &CreateApplicationRequest) -> Vec<AttributeRow> {
    let mut rows = vec![
        AttributeRow {
            name: "charm",
            value: request.charm_name.clone(),
        },
        AttributeRow {
            name: "channel",
            value: request.channel.clone(),
        },
        AttributeRow {
            name: "revision",
            value: request
                .revision
                .map_or_else(|| "(latest)".into(), |r| r.to_string()),
        },
        AttributeRow {
            name: "units",
            value: request.units.to_string(),
        },
        AttributeRow {
            name: "trust",
            value: request.trust.to_string(),
        },
    ];
    if let Some(series) = &request.series {
        rows.push(AttributeRow {
            name: "series",
            value: series.clone(),
        });
    }
    if !request.config.is_empty() {
        rows.push(AttributeRow {
            name: "config",
            value: format_config(&request.config),
        });
    }
    if let Some(expose) = &request.expose {
        rows.push(AttributeRow {
            name: "expose",
            value: format_endpoints(expose),
        });
    }
    rows
}

fn detail(report: &PlanReport, color: bool) -> String {
    let mut out = String::new();
    match report.action {
        PlanAction::NoChanges => {
            let _ = write!(
                out,
                "No changes. {} matches the declared state.",
                report.application
            );
        }
        PlanAction::Create => {
            let _ = writeln!(
                out,
                "{} {} will be created",
                Marker::Create.paint(color),
                report.application
            );
            if let Some(request) = &report.create {
                out.push_str(&output::render_table(&create_rows(request)));
            }
        }
        PlanAction::Replace => {
            let _ = writeln!(
                out,
                "{} {} must be replaced (changed: {})",
                Marker::Replace.paint(color),
                report.application,
                report.requires_replacement.join(", ")
            );
            if let Some(request) = &report.create {
                out.push_str(&output::render_table(&create_rows(request)));
            }
        }
        PlanAction::Update => {
            let _ = writeln!(
                out,
                "{} {} will be updated in place",
                Marker::Change.paint(color),
                report.application
            );
            out.push_str(&output::render_table(&mutation_rows(&report.mutations)));
            if !report.retained_endpoints.is_empty() {
                let _ = write!(
                    out,
                    "\nnote: endpoints removed from the expose block stay exposed: {}",
                    report.retained_endpoints.join(", ")
                );
            }
        }
    }
    out
}

fn plain(report: &PlanReport) -> String {
    match report.action {
        PlanAction::NoChanges => String::new(),
        PlanAction::Create => "create".into(),
        PlanAction::Replace => report.requires_replacement.join("\n"),
        PlanAction::Update => report
            .mutations
            .iter()
            .map(|m| m.kind().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &PlanArgs, printer: &Printer) -> Result<i32, CliError> {
    let new = charmplan_config::load_declared(&args.new)?;
    let old = args
        .old
        .as_deref()
        .map(charmplan_config::load_declared)
        .transpose()?;

    let report = build_plan(old.as_ref(), &new);
    debug!(application = %report.application, action = ?report.action, "plan built");
    if !report.retained_endpoints.is_empty() {
        warn!(
            endpoints = ?report.retained_endpoints,
            "endpoints removed from expose block stay exposed"
        );
    }

    let color = printer.color;
    let out = output::render_single(printer.format, &report, |r| detail(r, color), plain)?;
    printer.print(&out);

    if args.detailed_exitcode && report.has_changes() {
        Ok(exit_code::CHANGES_PENDING)
    } else {
        Ok(exit_code::SUCCESS)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use charmplan_core::{
        DeclaredCharm, DeclaredExposure, ExposureRule, MutationKind, UnexposeTarget,
    };

    use super::*;

    fn app() -> DeclaredApplication {
        let mut app = DeclaredApplication::new("prod", DeclaredCharm::new("postgresql"));
        app.units = 3;
        app
    }

    #[test]
    fn no_old_state_plans_a_create() {
        let report = build_plan(None, &app());
        assert_eq!(report.action, PlanAction::Create);
        assert_eq!(report.application, "prod:postgresql");
        assert_eq!(report.create.unwrap().units, 3);
    }

    #[test]
    fn identical_documents_have_no_changes() {
        let report = build_plan(Some(&app()), &app());
        assert_eq!(report.action, PlanAction::NoChanges);
        assert!(!report.has_changes());
        assert_eq!(plain(&report), "");
    }

    #[test]
    fn charm_swap_requires_replacement() {
        let mut new = app();
        new.charm = DeclaredCharm::new("mysql");
        let report = build_plan(Some(&app()), &new);
        assert_eq!(report.action, PlanAction::Replace);
        assert_eq!(report.requires_replacement, vec!["charm.name"]);
        assert!(report.mutations.is_empty());
    }

    #[test]
    fn dropped_endpoint_is_reported_not_unexposed() {
        let mut old = app();
        old.expose = [
            ("web", ExposureRule::default()),
            ("admin", ExposureRule::spaces(["mgmt"])),
        ]
        .into_iter()
        .collect();
        let mut new = app();
        new.expose = [("web", ExposureRule::default())].into_iter().collect();

        let report = build_plan(Some(&old), &new);
        assert_eq!(report.action, PlanAction::Update);
        assert_eq!(report.retained_endpoints, vec!["admin".to_owned()]);
        let kinds: Vec<_> = report.mutations.iter().map(Mutation::kind).collect();
        assert_eq!(kinds, vec![MutationKind::Expose]);
    }

    #[test]
    fn empty_expose_block_plans_an_expose() {
        let mut new = app();
        new.expose = DeclaredExposure::Present(BTreeMap::new());

        let report = build_plan(Some(&app()), &new);
        assert_eq!(report.action, PlanAction::Update);
        assert_eq!(report.mutations, vec![Mutation::Expose(BTreeMap::new())]);
        assert!(detail(&report, false).contains("(defaults)"));
    }

    #[test]
    fn removed_block_unexposes_all_in_table() {
        let mut old = app();
        old.expose = [("web", ExposureRule::default())].into_iter().collect();
        let mut new = app();
        new.units = 4;
        new.config = BTreeMap::from([("profile".to_owned(), "production".to_owned())]);

        let report = build_plan(Some(&old), &new);
        assert_eq!(
            report.mutations,
            vec![
                Mutation::SetUnits(4),
                Mutation::Unexpose(UnexposeTarget::All),
                Mutation::SetConfig(new.config.clone()),
            ]
        );
        let table = detail(&report, false);
        assert!(table.starts_with("~ prod:postgresql will be updated in place"));
        assert!(table.contains("all endpoints"));
        assert!(table.contains("profile=production"));
        assert_eq!(plain(&report), "set_units\nunexpose\nset_config");
    }
}
