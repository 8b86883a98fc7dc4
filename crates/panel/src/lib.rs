//! Core domain for the hosting control panel client.
//!
//! This crate contains every record type, newtype identifier, wire encoding and
//! error type used by the remote client and the resource reconcilers.
//! Infrastructure crates implement the port traits defined here; they never add
//! domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! [`RemoteApi`] defines *what* the upper layers need from the remote;
//! the `remote` crate defines *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype record identifiers (`WebDomainId`, `ServerId`, etc.) |
//! | [`errors`] | The [`PanelError`] taxonomy |
//! | [`wire`] | Flexible scalar decoding and `"y"`/`"n"` booleans |
//! | [`entity`] | Entity kinds and the method-family traits |
//! | [`records`] | One wire record per managed entity kind |
//! | [`api`] | The [`RemoteApi`] port |
//! | [`php`] | PHP version catalog |
//! | [`scope`] | Default resolution chain for client and server ids |
//! | [`docroot`] | Document root composition |
//! | [`schedule`] | Five-field cron schedules |
//! | [`upgrade`] | Persisted-state upgrader |

pub mod api;
pub mod docroot;
pub mod entity;
pub mod errors;
pub mod identifiers;
pub mod php;
pub mod records;
pub mod schedule;
pub mod scope;
pub mod upgrade;
pub mod wire;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use api::{Params, RemoteApi};
pub use entity::{Entity, EntityKind, ManagedEntity};
pub use errors::{PanelError, PanelResult};
pub use identifiers::{
    ClientId, CronJobId, DatabaseId, DatabaseUserId, Identifier, MailDomainId, MailUserId, PhpId,
    ServerId, ShellUserId, WebDomainId,
};
pub use php::{PhpCatalog, PhpHandler};
pub use records::{CronJob, Customer, Database, DatabaseUser, MailDomain, MailUser, ShellUser, WebDomain};
pub use schedule::CronSchedule;
pub use scope::{ProviderDefaults, ScopeChain, ScopeField};
pub use upgrade::{BoolFieldUpgrade, StateUpgrade};
