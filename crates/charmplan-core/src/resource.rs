// ── Application resource lifecycle ──
//
// Drives create / read / update / destroy against an injected client,
// using the pure reconcile functions to decide what to send and how to
// fold the answer back into tracked state.

use tracing::{debug, info, warn};

use crate::client::ApplicationClient;
use crate::command::CreateApplicationRequest;
use crate::error::CoreError;
use crate::model::{ApplicationId, DeclaredApplication, Revision};
use crate::reconcile::{
    UpdateDelta, compute_update_delta, merge_snapshot, replacement_fields, retained_endpoints,
};

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// What was sent.
    pub delta: UpdateDelta,
    /// Tracked state after the post-update read.
    pub state: DeclaredApplication,
}

/// Lifecycle operations for one kind of resource: a deployed application.
pub struct ApplicationResource<'a, C> {
    client: &'a C,
}

impl<'a, C: ApplicationClient> ApplicationResource<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Deploy `declared`, then read it back.
    ///
    /// Returns the identifier to track and the merged state. If the deploy
    /// succeeded but the read-back did not, the error is
    /// [`CoreError::CreatedButUnread`] carrying the identifier.
    pub async fn create(
        &self,
        declared: &DeclaredApplication,
    ) -> Result<(ApplicationId, DeclaredApplication), CoreError> {
        let request = CreateApplicationRequest::from(declared);
        debug!(model = %request.model, charm = %request.charm_name, "creating application");

        let created = self
            .client
            .create_application(&request)
            .await
            .map_err(CoreError::client)?;

        let id = ApplicationId::new(&declared.model, &created.name);
        info!(%id, revision = created.revision, "application created");

        let mut tracked = declared.clone();
        tracked.name = Some(created.name);
        tracked.charm.revision = Revision::Pinned(created.revision);
        tracked.charm.series = Some(created.series);

        let state = match self.read(&id, &tracked).await {
            Ok(Some(state)) => state,
            Ok(None) => {
                return Err(CoreError::CreatedButUnread {
                    source: Box::new(CoreError::NotFound { id: id.to_string() }),
                    id,
                });
            }
            Err(err) => {
                warn!(%id, error = %err, "read after create failed");
                return Err(CoreError::CreatedButUnread {
                    id,
                    source: Box::new(err),
                });
            }
        };
        Ok((id, state))
    }

    /// Refresh tracked state from the remote system.
    ///
    /// `Ok(None)` means the application is gone and should be dropped
    /// from tracked state.
    pub async fn read(
        &self,
        id: &ApplicationId,
        tracked: &DeclaredApplication,
    ) -> Result<Option<DeclaredApplication>, CoreError> {
        let Some(snapshot) = self
            .client
            .read_application(id)
            .await
            .map_err(CoreError::client)?
        else {
            warn!(%id, "application no longer exists");
            return Ok(None);
        };

        let mut merged = merge_snapshot(tracked, &snapshot);
        merged.model.clone_from(&id.model);
        debug!(%id, units = merged.units, revision = %merged.charm.revision, "merged read-back");
        Ok(Some(merged))
    }

    /// Converge the application from `old` to `new`.
    ///
    /// Changes to the model, application name or charm are refused with
    /// [`CoreError::RequiresReplacement`] before anything is sent.
    /// Mutations are issued one at a time. The first failure stops the
    /// update with [`CoreError::PartialUpdate`]; earlier mutations stay
    /// applied and the caller should re-read to learn the real state.
    pub async fn update(
        &self,
        id: &ApplicationId,
        old: &DeclaredApplication,
        new: &DeclaredApplication,
    ) -> Result<UpdateOutcome, CoreError> {
        let fields = replacement_fields(old, new);
        if !fields.is_empty() {
            return Err(CoreError::RequiresReplacement {
                id: id.to_string(),
                fields,
            });
        }

        let delta = compute_update_delta(old, new);
        if delta.is_empty() {
            debug!(%id, "no changes to apply");
        }

        let retained = retained_endpoints(&old.expose, &new.expose);
        if !retained.is_empty() {
            warn!(%id, endpoints = ?retained, "endpoints removed from expose block stay exposed");
        }

        let mut applied = Vec::new();
        for mutation in delta.mutations() {
            let kind = mutation.kind();
            debug!(%id, %kind, "applying mutation");
            if let Err(err) = self.client.apply_mutation(id, &mutation).await {
                warn!(%id, %kind, applied = applied.len(), "mutation failed");
                return Err(CoreError::PartialUpdate {
                    id: id.to_string(),
                    applied,
                    failed: kind,
                    source: Box::new(err),
                });
            }
            applied.push(kind);
        }
        info!(%id, fields = ?delta.fields(), "application updated");

        let state = self
            .read(id, new)
            .await?
            .ok_or_else(|| CoreError::NotFound { id: id.to_string() })?;
        Ok(UpdateOutcome { delta, state })
    }

    pub async fn destroy(&self, id: &ApplicationId) -> Result<(), CoreError> {
        self.client
            .destroy_application(id)
            .await
            .map_err(CoreError::client)?;
        info!(%id, "application destroyed");
        Ok(())
    }
}
