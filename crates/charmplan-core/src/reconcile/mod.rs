// ── Reconciliation ──
//
// Pure functions only: no I/O, no shared state. Diffing runs on update;
// merging runs on every read, including the one right after a create.

mod exposure;
mod merge;
mod update;

pub use exposure::{ExposureDelta, UnexposeTarget, compute_exposure_delta, retained_endpoints};
pub use merge::{merge_config, merge_exposure, merge_snapshot};
pub use update::{UpdateDelta, UpdateField, compute_update_delta, replacement_fields};
