//! Reconciliation core for declared charm application state.
//!
//! Given what a caller declared before and what it declares now, this
//! crate works out the smallest set of remote mutations that converge a
//! deployed application, and how to fold the remote system's answer back
//! into tracked state:
//!
//! - **[`reconcile`]**: Pure functions. [`compute_update_delta`] detects
//!   per-field changes, [`compute_exposure_delta`] turns exposure blocks
//!   into expose/unexpose directives, and [`merge_snapshot`] applies a
//!   remote read-back without surfacing config keys the caller never
//!   asked to manage.
//!
//! - **[`Mutation`]**: One remote write per changed field, produced in
//!   the order they must be issued.
//!
//! - **[`ApplicationResource`]**: Create / read / update / destroy
//!   orchestration over an injected [`ApplicationClient`]. Updates stop
//!   at the first failing mutation and report what was already applied.

pub mod client;
pub mod command;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod resource;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::ApplicationClient;
pub use command::{CreateApplicationRequest, CreatedApplication, Mutation, MutationKind};
pub use error::{ClientError, CoreError};
pub use reconcile::{
    ExposureDelta, UnexposeTarget, UpdateDelta, UpdateField, compute_exposure_delta,
    compute_update_delta, merge_config, merge_exposure, merge_snapshot, replacement_fields,
    retained_endpoints,
};
pub use resource::{ApplicationResource, UpdateOutcome};

pub use model::{
    ApplicationExposure, ApplicationId, ApplicationSnapshot, DEFAULT_CHANNEL, DeclaredApplication,
    DeclaredCharm, DeclaredExposure, ExposureRule, Revision,
};
