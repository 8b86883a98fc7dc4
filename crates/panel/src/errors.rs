//! Error taxonomy for the control panel client.
//!
//! [`PanelError`] is the single error type surfaced by every layer, from the
//! wire decoder up to the resource reconcilers. Nothing in this workspace
//! retries: every error is returned to the immediate caller on first
//! occurrence, with enough context (method name, record id, remote message)
//! to print a precise diagnostic.
//!
//! Entity operations wrap their failure in [`PanelError::Operation`] so the
//! action, record kind and id travel with the underlying cause. Use
//! [`PanelError::root`] to look through that wrapper.

use thiserror::Error;

use crate::entity::EntityKind;

/// Result alias used throughout the workspace.
pub type PanelResult<T> = Result<T, PanelError>;

/// Every failure the client, the operation set or a reconciler can produce.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Network failure, timeout, non-2xx HTTP status or an unparseable body.
    #[error("transport failure calling '{method}': {message}")]
    Transport {
        /// RPC method that was being called.
        method: String,
        /// Description of the transport failure.
        message: String,
    },

    /// Well-formed envelope whose `code` is not `"ok"`.
    ///
    /// `message` is the remote message, verbatim.
    #[error("remote call '{method}' failed ({code}): {message}")]
    Protocol {
        /// RPC method that was being called.
        method: String,
        /// Envelope `code` returned by the remote.
        code: String,
        /// Envelope `message` returned by the remote.
        message: String,
    },

    /// The envelope parsed, but `response` did not have the expected shape.
    #[error("unexpected response from '{method}': {message}")]
    Decoding {
        /// RPC method (or decoding context) the payload came from.
        method: String,
        /// What was expected and what arrived.
        message: String,
    },

    /// Login was refused or returned something other than a session token.
    #[error("authentication failed: {message}")]
    Authentication {
        /// Remote message, or a description of the malformed payload.
        message: String,
    },

    /// A `get` call answered with an empty payload.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of record that was looked up.
        kind: EntityKind,
        /// Identity that was looked up.
        id: u64,
    },

    /// Locally detected invalid input; raised before any remote call.
    #[error("invalid input: {message}")]
    Validation {
        /// Description of the problem.
        message: String,
    },

    /// A required setting could not be resolved.
    #[error("configuration error for '{field}': {message}")]
    Configuration {
        /// Name of the unresolved field (e.g. `server_id`).
        field: String,
        /// How the value could have been supplied.
        message: String,
    },

    /// A persisted record could not be migrated to the current schema.
    #[error("cannot migrate '{field}': {message}")]
    Migration {
        /// Field whose stored representation was not understood.
        field: String,
        /// What was found.
        message: String,
    },

    /// Failure of one entity operation, with the record context attached.
    #[error("failed to {action} {kind}{}: {source}", id_suffix(.id))]
    Operation {
        /// `add`, `get`, `update`, `delete` or `list`.
        action: &'static str,
        /// Kind of record the operation targeted.
        kind: EntityKind,
        /// Record identity, when known.
        id: Option<u64>,
        /// Underlying failure.
        #[source]
        source: Box<PanelError>,
    },
}

fn id_suffix(id: &Option<u64>) -> String {
    id.map(|id| format!(" {id}")).unwrap_or_default()
}

impl PanelError {
    /// Convenience constructor for [`PanelError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`PanelError::Decoding`].
    pub fn decoding(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decoding {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Attaches entity-operation context to this error.
    pub fn in_operation(self, action: &'static str, kind: EntityKind, id: Option<u64>) -> Self {
        Self::Operation {
            action,
            kind,
            id,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, looking through [`PanelError::Operation`].
    pub fn root(&self) -> &PanelError {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns `true` if the root cause is [`PanelError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. })
    }
}
