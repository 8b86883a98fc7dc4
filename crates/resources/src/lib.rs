//! Resource reconcilers for the hosting control panel.
//!
//! One reconciler per managed record kind. Each one turns a desired
//! configuration (`*Spec`) into remote calls and maps the record the remote
//! returns back into observed state (`*State`). Reconcilers are stateless
//! apart from the injected [`ResourceContext`]; persisted state belongs to the
//! caller.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Reconcilers sequence calls between the domain
//! rules in the [`panel`] crate and the [`remote`] operation sets. The scope
//! chain, document-root composition and PHP catalog all live in `panel`;
//! this crate only decides when to call them.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | Provider configuration and environment fallback |
//! | [`context`] | Injected API handle and provider defaults |
//! | [`catalog`] | Per-session PHP catalog cache |
//! | [`import`] | Import id parsing |
//! | [`web_hosting`] | Hosting domains |
//! | [`web_user`] | Shell users |
//! | [`web_database`] | Databases |
//! | [`web_database_user`] | Database logins |
//! | [`mail_domain`] | Mail domains |
//! | [`mail_inbox`] | Mailboxes |
//! | [`cron_task`] | Cron jobs |
//! | [`customer`] | Read-only customer lookups |

pub mod catalog;
pub mod config;
pub mod context;
pub mod cron_task;
pub mod customer;
pub mod import;
pub mod mail_domain;
pub mod mail_inbox;
pub mod web_database;
pub mod web_database_user;
pub mod web_hosting;
pub mod web_user;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use catalog::CatalogCache;
pub use config::ProviderConfig;
pub use context::ResourceContext;
pub use cron_task::{CronTask, CronTaskSpec, CronTaskState};
pub use customer::Customers;
pub use import::import_id;
pub use mail_domain::{MailDomain, MailDomainSpec, MailDomainState};
pub use mail_inbox::{MailInbox, MailInboxSpec, MailInboxState};
pub use web_database::{WebDatabase, WebDatabaseSpec, WebDatabaseState};
pub use web_database_user::{WebDatabaseUser, WebDatabaseUserSpec, WebDatabaseUserState};
pub use web_hosting::{WebHosting, WebHostingSpec, WebHostingState};
pub use web_user::{WebUser, WebUserSpec, WebUserState};
