//! Entity kinds and the traits that tie a record type to its method family.
//!
//! Each managed record kind is an independent struct in [`crate::records`].
//! The [`Entity`] trait carries the protocol facts for that kind (method
//! prefix, identity parameter name, response quirks) so a single generic
//! operation set can serve every kind without a catch-all record type.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::identifiers::Identifier;

/// The kinds of records this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    WebDomain,
    ShellUser,
    Database,
    DatabaseUser,
    MailDomain,
    MailUser,
    CronJob,
    Customer,
}

impl EntityKind {
    /// Human-readable name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebDomain => "web domain",
            Self::ShellUser => "shell user",
            Self::Database => "database",
            Self::DatabaseUser => "database user",
            Self::MailDomain => "mail domain",
            Self::MailUser => "mail inbox",
            Self::CronJob => "cron job",
            Self::Customer => "client",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record kind that can be read from the remote by identity.
pub trait Entity: DeserializeOwned + Send + Sync + 'static {
    /// Identity newtype of this kind.
    type Id: Identifier;

    /// Kind tag used in diagnostics.
    const KIND: EntityKind;

    /// Method family prefix; operations append `_add`, `_get`, ….
    const METHOD_PREFIX: &'static str;

    /// Name of the parameter carrying the identity on get/update/delete.
    ///
    /// This is not uniform across families and must match the remote exactly.
    const ID_PARAM: &'static str;

    /// Whether `<prefix>_get` may answer with the record wrapped in a
    /// one-element array. Only set for the families that actually do this;
    /// an array from any other family is a decoding error.
    const WRAPPED_GET: bool = false;

    /// Remote identity of a decoded record, when present.
    fn id(&self) -> Option<Self::Id>;

    /// Full method name for `operation` (e.g. `"get"` → `"mail_domain_get"`).
    fn method(operation: &str) -> String {
        format!("{}_{}", Self::METHOD_PREFIX, operation)
    }
}

/// A record kind that also supports add, update and delete.
pub trait ManagedEntity: Entity + Serialize {}
