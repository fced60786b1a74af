// ── Core error types ──
//
// Reconciliation itself never fails: malformed declared input is
// normalized rather than rejected. Errors only arise at the edges,
// when an identifier can't be parsed or the remote client reports a
// failure. Client errors are carried as the `source` untouched so
// callers can downcast to the concrete client error type.

use std::fmt::Write as _;

use thiserror::Error;

use crate::command::MutationKind;
use crate::model::ApplicationId;

/// Boxed error produced by a remote application client.
pub type ClientError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Identity errors ──────────────────────────────────────────────
    #[error("unable to parse model and application name from provided ID '{id}'")]
    InvalidResourceId { id: String },

    #[error("application {id} not found")]
    NotFound { id: String },

    #[error("changing {} requires replacing application {id}", .fields.join(", "))]
    RequiresReplacement {
        id: String,
        fields: Vec<&'static str>,
    },

    /// The application was deployed but the follow-up read failed. `id`
    /// must be tracked so the caller can re-read or destroy it.
    #[error("application {id} was created but could not be read back")]
    CreatedButUnread {
        id: ApplicationId,
        #[source]
        source: Box<CoreError>,
    },

    // ── Remote errors (propagated unmodified) ────────────────────────
    #[error(transparent)]
    Client(ClientError),

    /// A multi-mutation update stopped part-way. Mutations listed in
    /// `applied` have already taken effect remotely and are not rolled back.
    #[error(
        "update of {id} failed at {failed} (already applied: {})",
        describe_applied(.applied)
    )]
    PartialUpdate {
        id: String,
        applied: Vec<MutationKind>,
        failed: MutationKind,
        #[source]
        source: ClientError,
    },
}

impl CoreError {
    /// Wrap a client error without altering it.
    pub fn client<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Client(Box::new(err))
    }
}

fn describe_applied(applied: &[MutationKind]) -> String {
    if applied.is_empty() {
        return "none".into();
    }
    let mut out = String::new();
    for (i, kind) in applied.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{kind}");
    }
    out
}
