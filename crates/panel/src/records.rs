//! Wire records, one struct per managed entity kind.
//!
//! Each struct serializes into the `params` object of `<family>_add` /
//! `<family>_update` and deserializes from `<family>_get`. Numeric columns
//! decode through [`crate::wire::flex`] and boolean columns through
//! [`crate::wire::yes_no`].
//!
//! Optional fields are omitted from the request when `None`. A small set of
//! fields is always sent, because the remote column rejects an implicit or
//! empty value and would otherwise fall back to a disabled or zero state:
//!
//! | Record | Always sent |
//! |--------|-------------|
//! | [`WebDomain`] | `domain`, `disable_symlinknotowner` |
//! | [`ShellUser`] | `username`, `parent_domain_id` |
//! | [`Database`] | `database_name`, `parent_domain_id` |
//! | [`DatabaseUser`] | `database_user`, `database_password` |
//! | [`MailDomain`] | `domain`, `active`, `local_delivery` |
//! | [`MailUser`] | `email`, `move_junk`, `purge_trash_days`, `purge_junk_days` |
//! | [`CronJob`] | `parent_domain_id`, `command`, `run_*` |

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, ManagedEntity};
use crate::identifiers::{
    ClientId, CronJobId, DatabaseId, DatabaseUserId, MailDomainId, MailUserId, PhpId, ServerId,
    ShellUserId, WebDomainId,
};
use crate::wire::{flex, yes_no};

// ---------------------------------------------------------------------------
// Hosting domain
// ---------------------------------------------------------------------------

/// A hosting domain (`sites_web_domain_*`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebDomain {
    #[serde(rename = "domain_id", default, skip_serializing, deserialize_with = "flex::opt_id")]
    pub id: Option<WebDomainId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub client_id: Option<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub server_id: Option<ServerId>,
    #[serde(default)]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub parent_domain_id: Option<WebDomainId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_root: Option<String>,
    /// System user that owns the site's files; read-only, used by shell users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_int")]
    pub hd_quota: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_int")]
    pub traffic_quota: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub cgi: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub ssi: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub perl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub ruby: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub python: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub suexec: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub ssl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    /// PHP handler type (`php-fpm`, `fast-cgi`, …). The column is named `php`.
    #[serde(rename = "php", default, skip_serializing_if = "Option::is_none")]
    pub php_handler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub server_php_id: Option<PhpId>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm_process_idle_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_int")]
    pub pm_max_requests: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_int")]
    pub http_port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_int")]
    pub https_port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub php_open_basedir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apache_directives: Option<String>,
    #[serde(rename = "disable_symlinknotowner", default, with = "yes_no::required")]
    pub disable_symlink_restriction: bool,
}

impl Entity for WebDomain {
    type Id = WebDomainId;
    const KIND: EntityKind = EntityKind::WebDomain;
    const METHOD_PREFIX: &'static str = "sites_web_domain";
    const ID_PARAM: &'static str = "primary_id";

    fn id(&self) -> Option<WebDomainId> {
        self.id
    }
}

impl ManagedEntity for WebDomain {}

// ---------------------------------------------------------------------------
// Shell user
// ---------------------------------------------------------------------------

/// A shell (SSH) user attached to a hosting domain (`sites_shell_user_*`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShellUser {
    #[serde(rename = "shell_user_id", default, skip_serializing, deserialize_with = "flex::opt_id")]
    pub id: Option<ShellUserId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub server_id: Option<ServerId>,
    #[serde(default)]
    pub parent_domain_id: WebDomainId,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_int")]
    pub quota_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
    /// System user of the parent domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puser: Option<String>,
    /// System group of the parent domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pgroup: Option<String>,
}

impl Entity for ShellUser {
    type Id = ShellUserId;
    const KIND: EntityKind = EntityKind::ShellUser;
    const METHOD_PREFIX: &'static str = "sites_shell_user";
    const ID_PARAM: &'static str = "primary_id";

    fn id(&self) -> Option<ShellUserId> {
        self.id
    }
}

impl ManagedEntity for ShellUser {}

// ---------------------------------------------------------------------------
// Database and database user
// ---------------------------------------------------------------------------

/// A database (`sites_database_*`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(rename = "database_id", default, skip_serializing, deserialize_with = "flex::opt_id")]
    pub id: Option<DatabaseId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub server_id: Option<ServerId>,
    #[serde(default)]
    pub parent_domain_id: WebDomainId,
    /// Engine: `mysql` or `pgsql`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default)]
    pub database_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub database_user_id: Option<DatabaseUserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_charset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub remote_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_ips: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_int")]
    pub backup_copies: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_int")]
    pub database_quota: Option<i64>,
}

impl Entity for Database {
    type Id = DatabaseId;
    const KIND: EntityKind = EntityKind::Database;
    const METHOD_PREFIX: &'static str = "sites_database";
    const ID_PARAM: &'static str = "primary_id";

    fn id(&self) -> Option<DatabaseId> {
        self.id
    }
}

impl ManagedEntity for Database {}

/// A database login (`sites_database_user_*`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseUser {
    #[serde(rename = "database_user_id", default, skip_serializing, deserialize_with = "flex::opt_id")]
    pub id: Option<DatabaseUserId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub server_id: Option<ServerId>,
    #[serde(default)]
    pub database_user: String,
    #[serde(default)]
    pub database_password: String,
}

impl Entity for DatabaseUser {
    type Id = DatabaseUserId;
    const KIND: EntityKind = EntityKind::DatabaseUser;
    const METHOD_PREFIX: &'static str = "sites_database_user";
    const ID_PARAM: &'static str = "primary_id";

    fn id(&self) -> Option<DatabaseUserId> {
        self.id
    }
}

impl ManagedEntity for DatabaseUser {}

// ---------------------------------------------------------------------------
// Mail
// ---------------------------------------------------------------------------

/// A mail domain (`mail_domain_*`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailDomain {
    #[serde(rename = "domain_id", default, skip_serializing, deserialize_with = "flex::opt_id")]
    pub id: Option<MailDomainId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub server_id: Option<ServerId>,
    #[serde(default)]
    pub domain: String,
    #[serde(default, with = "yes_no::required")]
    pub active: bool,
    #[serde(default, with = "yes_no::required")]
    pub local_delivery: bool,
}

impl Entity for MailDomain {
    type Id = MailDomainId;
    const KIND: EntityKind = EntityKind::MailDomain;
    const METHOD_PREFIX: &'static str = "mail_domain";
    const ID_PARAM: &'static str = "primary_id";
    const WRAPPED_GET: bool = true;

    fn id(&self) -> Option<MailDomainId> {
        self.id
    }
}

impl ManagedEntity for MailDomain {}

/// A mailbox (`mail_user_*`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailUser {
    #[serde(rename = "mailuser_id", default, skip_serializing, deserialize_with = "flex::opt_id")]
    pub id: Option<MailUserId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub server_id: Option<ServerId>,
    #[serde(rename = "maildomain_id", default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub mail_domain_id: Option<MailDomainId>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maildir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_int")]
    pub quota: Option<i64>,
    /// Forward incoming mail to this address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    /// Blind-copy outgoing mail to this address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_cc: Option<String>,
    #[serde(default, with = "yes_no::required")]
    pub move_junk: bool,
    /// Days before trash is purged; `0` disables purging. Sent as a string.
    #[serde(default, serialize_with = "flex::int_as_string", deserialize_with = "flex::int")]
    pub purge_trash_days: i64,
    /// Days before junk is purged; `0` disables purging. Sent as a string.
    #[serde(default, serialize_with = "flex::int_as_string", deserialize_with = "flex::int")]
    pub purge_junk_days: i64,
}

impl Entity for MailUser {
    type Id = MailUserId;
    const KIND: EntityKind = EntityKind::MailUser;
    const METHOD_PREFIX: &'static str = "mail_user";
    const ID_PARAM: &'static str = "primary_id";
    const WRAPPED_GET: bool = true;

    fn id(&self) -> Option<MailUserId> {
        self.id
    }
}

impl ManagedEntity for MailUser {}

// ---------------------------------------------------------------------------
// Cron
// ---------------------------------------------------------------------------

/// A cron job attached to a hosting domain (`sites_cron_*`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CronJob {
    #[serde(rename = "id", default, skip_serializing, deserialize_with = "flex::opt_id")]
    pub id: Option<CronJobId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "flex::opt_id")]
    pub server_id: Option<ServerId>,
    #[serde(default)]
    pub parent_domain_id: WebDomainId,
    /// `url`, `chrooted` or `full`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub run_min: String,
    #[serde(default)]
    pub run_hour: String,
    #[serde(default)]
    pub run_mday: String,
    #[serde(default)]
    pub run_month: String,
    #[serde(default)]
    pub run_wday: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "yes_no::optional")]
    pub active: Option<bool>,
}

impl Entity for CronJob {
    type Id = CronJobId;
    const KIND: EntityKind = EntityKind::CronJob;
    const METHOD_PREFIX: &'static str = "sites_cron";
    const ID_PARAM: &'static str = "primary_id";

    fn id(&self) -> Option<CronJobId> {
        self.id
    }
}

impl ManagedEntity for CronJob {}

// ---------------------------------------------------------------------------
// Customer (read-only)
// ---------------------------------------------------------------------------

/// A customer account (`client_get`, `client_get_all`). Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "client_id", default, deserialize_with = "flex::opt_id")]
    pub id: Option<ClientId>,
    #[serde(default, deserialize_with = "flex::opt_id")]
    pub parent_client_id: Option<ClientId>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub customer_no: Option<String>,
    #[serde(rename = "vat_id", default)]
    pub vat_number: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(rename = "telephone", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub internet: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, with = "yes_no::optional")]
    pub locked: Option<bool>,
    #[serde(default, with = "yes_no::optional")]
    pub canceled: Option<bool>,
    #[serde(default, deserialize_with = "flex::opt_id")]
    pub default_webserver: Option<ServerId>,
    #[serde(default, deserialize_with = "flex::opt_id")]
    pub default_mailserver: Option<ServerId>,
    #[serde(default, deserialize_with = "flex::opt_id")]
    pub default_dbserver: Option<ServerId>,
    #[serde(rename = "limit_web_domain", default, deserialize_with = "flex::opt_int")]
    pub limit_web_domains: Option<i64>,
    #[serde(rename = "limit_database", default, deserialize_with = "flex::opt_int")]
    pub limit_databases: Option<i64>,
    #[serde(rename = "limit_shell_user", default, deserialize_with = "flex::opt_int")]
    pub limit_shell_users: Option<i64>,
    #[serde(rename = "limit_maildomain", default, deserialize_with = "flex::opt_int")]
    pub limit_mail_domains: Option<i64>,
    #[serde(rename = "limit_mailbox", default, deserialize_with = "flex::opt_int")]
    pub limit_mailboxes: Option<i64>,
}

impl Entity for Customer {
    type Id = ClientId;
    const KIND: EntityKind = EntityKind::Customer;
    const METHOD_PREFIX: &'static str = "client";
    const ID_PARAM: &'static str = "client_id";

    fn id(&self) -> Option<ClientId> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn web_domain_decodes_mixed_scalars() {
        let domain: WebDomain = serde_json::from_value(json!({
            "domain_id": "10",
            "server_id": 1,
            "client_id": "",
            "domain": "example.com",
            "document_root": "/var/www/clients/client2/web10",
            "hd_quota": "-1",
            "server_php_id": "11",
            "active": "y",
            "cgi": "n",
            "disable_symlinknotowner": "n",
            "parent_domain_id": "0",
            "ipv6_address": null
        }))
        .unwrap();

        assert_eq!(domain.id, Some(WebDomainId::new(10)));
        assert_eq!(domain.server_id, Some(ServerId::new(1)));
        assert_eq!(domain.client_id, None);
        assert_eq!(domain.parent_domain_id, None);
        assert_eq!(domain.hd_quota, Some(-1));
        assert_eq!(domain.server_php_id, Some(PhpId::new(11)));
        assert_eq!(domain.active, Some(true));
        assert_eq!(domain.cgi, Some(false));
        assert_eq!(domain.ipv6_address, None);
    }

    #[test]
    fn unset_fields_are_omitted_but_allowlisted_fields_are_sent() {
        let params = serde_json::to_value(WebDomain {
            id: Some(WebDomainId::new(3)),
            domain: "example.com".into(),
            server_id: Some(ServerId::new(1)),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            params,
            json!({
                "server_id": 1,
                "domain": "example.com",
                "disable_symlinknotowner": "n"
            })
        );
    }

    #[test]
    fn mail_domain_always_sends_flags() {
        let params = serde_json::to_value(MailDomain {
            domain: "example.com".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            params,
            json!({"domain": "example.com", "active": "n", "local_delivery": "n"})
        );
    }

    #[test]
    fn mail_user_sends_purge_intervals_as_strings() {
        let params = serde_json::to_value(MailUser {
            email: "info@example.com".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params["move_junk"], json!("n"));
        assert_eq!(params["purge_trash_days"], json!("0"));
        assert_eq!(params["purge_junk_days"], json!("0"));
        assert!(params.get("quota").is_none());
    }

    #[test]
    fn shell_user_always_sends_parent_domain() {
        let params = serde_json::to_value(ShellUser {
            username: "deploy".into(),
            parent_domain_id: WebDomainId::new(10),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params, json!({"parent_domain_id": 10, "username": "deploy"}));
    }

    #[test]
    fn cron_job_sends_schedule_fields() {
        let params = serde_json::to_value(CronJob {
            parent_domain_id: WebDomainId::new(10),
            command: "https://example.com/cron".into(),
            run_min: "*/5".into(),
            run_hour: "*".into(),
            run_mday: "*".into(),
            run_month: "*".into(),
            run_wday: "*".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params["run_min"], json!("*/5"));
        assert_eq!(params["parent_domain_id"], json!(10));
        assert!(params.get("server_id").is_none());
    }

    #[test]
    fn customer_decodes_default_servers() {
        let customer: Customer = serde_json::from_value(json!({
            "client_id": "2",
            "company_name": "Acme",
            "default_webserver": "1",
            "default_mailserver": 0,
            "limit_web_domain": "-1",
            "locked": "n"
        }))
        .unwrap();
        assert_eq!(customer.id, Some(ClientId::new(2)));
        assert_eq!(customer.default_webserver, Some(ServerId::new(1)));
        assert_eq!(customer.default_mailserver, None);
        assert_eq!(customer.limit_web_domains, Some(-1));
        assert_eq!(customer.locked, Some(false));
    }
}
