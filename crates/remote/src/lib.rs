//! Hosting control panel remote API client.
//!
//! Implements the [`panel::RemoteApi`] port over the panel's JSON endpoint:
//! one HTTPS `POST` per call, the method name in the query string, a JSON
//! object body and a `{code, message, response}` envelope in reply.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Session handling, HTTP transport, envelope unwrapping
//! and the typed operation set live here. The reconcilers in the `resources`
//! crate see only [`panel::RemoteApi`] and [`Operations`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | [`ClientConfig`]: endpoint, credentials, TLS and timeout |
//! | [`session`] | [`SessionClient`]: login, logout and authenticated calls |
//! | [`envelope`] | The response envelope |
//! | [`operations`] | [`Operations`]: typed add / get / update / delete / list |
//! | [`php`] | PHP version discovery |
//!
//! No call is retried. Failures surface as [`panel::PanelError`] on first
//! occurrence.

pub mod config;
pub mod envelope;
pub mod operations;
pub mod php;
pub mod session;

pub use config::ClientConfig;
pub use operations::Operations;
pub use php::discover_php_versions;
pub use session::SessionClient;
