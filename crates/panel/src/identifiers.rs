//! Newtype identifiers for remote-assigned records.
//!
//! Every record the control panel manages is identified by a positive integer
//! assigned by the remote system. Each family gets its own newtype so that a
//! [`WebDomainId`] can never be passed where a [`MailDomainId`] is expected,
//! even though both are `u64` under the hood.
//!
//! Identifiers are never fabricated locally: they only come out of a
//! successful `*_add` call or a decoded record. On the wire they may arrive as
//! JSON numbers or as numeric strings, so deserialization goes through the
//! flexible scalar decoder in [`crate::wire::flex`].

use serde::de::Error as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Common behaviour of every remote identifier newtype.
///
/// Generic code (the operation set, the default resolution chain, the
/// `flex::opt_id` deserializer) is written against this trait.
pub trait Identifier:
    Copy
    + Eq
    + Ord
    + std::hash::Hash
    + std::fmt::Debug
    + std::fmt::Display
    + From<u64>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Returns the underlying integer value.
    fn get(self) -> u64;

    /// Returns `true` for the zero sentinel the remote uses for "not set".
    fn is_unset(self) -> bool {
        self.get() == 0
    }
}

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (remote-assigned integers).
// Generates: struct (Copy), new(), as_u64(), From<u64>, Display, a flexible
// Deserialize and the Identifier impl.
// ---------------------------------------------------------------------------
macro_rules! remote_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = crate::wire::flex::int(deserializer)?;
                u64::try_from(raw)
                    .map(Self)
                    .map_err(|_| D::Error::custom(format!("negative identifier: {raw}")))
            }
        }

        impl Identifier for $name {
            fn get(self) -> u64 {
                self.0
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Scope identifiers
// ---------------------------------------------------------------------------

remote_id! {
    /// Identifies a customer ("client" in the panel's vocabulary) that owns
    /// hosted records.
    ClientId
}

remote_id! {
    /// Identifies a managed server (web, mail or database node).
    ServerId
}

// ---------------------------------------------------------------------------
// Record identifiers
// ---------------------------------------------------------------------------

remote_id! {
    /// Identifies a hosting domain (`web_domain.domain_id`).
    WebDomainId
}

remote_id! {
    /// Identifies a shell user attached to a hosting domain.
    ShellUserId
}

remote_id! {
    /// Identifies a database.
    DatabaseId
}

remote_id! {
    /// Identifies a database user.
    DatabaseUserId
}

remote_id! {
    /// Identifies a mail domain.
    MailDomainId
}

remote_id! {
    /// Identifies a mailbox (`mail_user.mailuser_id`).
    MailUserId
}

remote_id! {
    /// Identifies a cron job.
    CronJobId
}

remote_id! {
    /// Identifies one PHP runtime registered on a server (`server_php_id`).
    ///
    /// Only meaningful together with the server and handler type it was
    /// discovered for; see [`crate::php::PhpCatalog`].
    PhpId
}
