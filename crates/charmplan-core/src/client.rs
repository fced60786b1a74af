// ── Remote application client seam ──
//
// The core never talks to the remote system itself. Whatever performs
// the calls (and owns retries, timeouts and rate limits) implements this
// trait and is handed to `ApplicationResource` explicitly.

use std::future::Future;

use crate::command::{CreateApplicationRequest, CreatedApplication, Mutation};
use crate::model::{ApplicationId, ApplicationSnapshot};

/// Remote operations on deployed applications.
///
/// Every failure must surface as `Err`; a default-valued success is
/// never read as "nothing changed".
pub trait ApplicationClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_application(
        &self,
        request: &CreateApplicationRequest,
    ) -> impl Future<Output = Result<CreatedApplication, Self::Error>> + Send;

    /// `Ok(None)` when the application no longer exists.
    fn read_application(
        &self,
        id: &ApplicationId,
    ) -> impl Future<Output = Result<Option<ApplicationSnapshot>, Self::Error>> + Send;

    /// Apply one mutation. Must not return before the remote acknowledged it.
    fn apply_mutation(
        &self,
        id: &ApplicationId,
        mutation: &Mutation,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn destroy_application(
        &self,
        id: &ApplicationId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
