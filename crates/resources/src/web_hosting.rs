//! Hosting domain reconciler.
//!
//! Besides plain field mapping this reconciler handles two derived values:
//!
//! - `php_version`: a label such as `"8.2"` that maps to the remote's
//!   per-server `server_php_id` through a [`panel::PhpCatalog`].
//! - `root_subdir`: a subdirectory appended to the remote-assigned document
//!   root after creation. The applied value is kept in state so the next
//!   update can strip it before appending the new one.

use panel::docroot;
use panel::{ClientId, PanelResult, PhpHandler, PhpId, ServerId, WebDomain, WebDomainId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::catalog::CatalogCache;
use crate::context::ResourceContext;
use crate::import::import_id;

// ---------------------------------------------------------------------------
// Desired and observed state
// ---------------------------------------------------------------------------

/// Desired configuration of a hosting domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebHostingSpec {
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub domain: String,
    pub ip_address: Option<String>,
    pub ipv6_address: Option<String>,
    /// `vhost`, `alias`, `subdomain`, …
    pub kind: Option<String>,
    pub parent_domain_id: Option<WebDomainId>,
    /// Absolute document root. Mutually exclusive with `root_subdir`.
    pub document_root: Option<String>,
    /// Subdirectory below the remote-assigned document root.
    pub root_subdir: Option<String>,
    /// PHP handler type (`php-fpm`, `fast-cgi`, …).
    pub php: Option<String>,
    /// PHP version label, e.g. `"8.2"`.
    pub php_version: Option<String>,
    pub active: Option<bool>,
    pub hd_quota: Option<i64>,
    pub traffic_quota: Option<i64>,
    pub cgi: Option<bool>,
    pub ssi: Option<bool>,
    pub perl: Option<bool>,
    pub ruby: Option<bool>,
    pub python: Option<bool>,
    pub suexec: Option<bool>,
    pub ssl: Option<bool>,
    pub subdomain: Option<String>,
    pub redirect_type: Option<String>,
    pub redirect_path: Option<String>,
    pub allow_override: Option<String>,
    pub pm: Option<String>,
    pub pm_process_idle_timeout: Option<String>,
    pub pm_max_requests: Option<i64>,
    pub http_port: Option<i64>,
    pub https_port: Option<i64>,
    pub php_open_basedir: Option<String>,
    pub apache_directives: Option<String>,
    pub disable_symlink_restriction: bool,
}

impl WebHostingSpec {
    /// A domain with the panel's usual defaults.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }
}

impl Default for WebHostingSpec {
    fn default() -> Self {
        Self {
            client_id: None,
            server_id: None,
            domain: String::new(),
            ip_address: None,
            ipv6_address: None,
            kind: Some("vhost".into()),
            parent_domain_id: None,
            document_root: None,
            root_subdir: None,
            php: None,
            php_version: None,
            active: Some(true),
            hd_quota: None,
            traffic_quota: None,
            cgi: Some(false),
            ssi: Some(false),
            perl: Some(false),
            ruby: Some(false),
            python: Some(false),
            suexec: Some(true),
            ssl: Some(false),
            subdomain: Some("www".into()),
            redirect_type: None,
            redirect_path: None,
            allow_override: Some("All".into()),
            pm: Some("ondemand".into()),
            pm_process_idle_timeout: Some("10".into()),
            pm_max_requests: None,
            http_port: Some(80),
            https_port: Some(443),
            php_open_basedir: None,
            apache_directives: None,
            disable_symlink_restriction: false,
        }
    }
}

/// Observed state of a hosting domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebHostingState {
    pub id: WebDomainId,
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub domain: String,
    pub ip_address: Option<String>,
    pub ipv6_address: Option<String>,
    pub kind: Option<String>,
    pub parent_domain_id: Option<WebDomainId>,
    pub document_root: Option<String>,
    /// Last applied subdirectory.
    pub root_subdir: Option<String>,
    pub php: Option<String>,
    pub php_version: Option<String>,
    pub server_php_id: Option<PhpId>,
    pub active: bool,
    pub hd_quota: Option<i64>,
    pub traffic_quota: Option<i64>,
    pub cgi: bool,
    pub ssi: bool,
    pub perl: bool,
    pub ruby: bool,
    pub python: bool,
    pub suexec: bool,
    pub ssl: bool,
    pub subdomain: Option<String>,
    pub redirect_type: Option<String>,
    pub redirect_path: Option<String>,
    pub allow_override: Option<String>,
    pub pm: Option<String>,
    pub pm_process_idle_timeout: Option<String>,
    pub pm_max_requests: Option<i64>,
    pub http_port: Option<i64>,
    pub https_port: Option<i64>,
    pub php_open_basedir: Option<String>,
    pub apache_directives: Option<String>,
    pub disable_symlink_restriction: bool,
    pub system_user: Option<String>,
    pub system_group: Option<String>,
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Create, read, update, delete and import for hosting domains.
#[derive(Debug)]
pub struct WebHosting {
    ctx: ResourceContext,
    catalog: CatalogCache,
}

impl WebHosting {
    pub fn new(ctx: ResourceContext) -> Self {
        Self {
            ctx,
            catalog: CatalogCache::new(),
        }
    }

    #[instrument(skip(self, spec), fields(domain = %spec.domain))]
    pub async fn create(&self, spec: &WebHostingSpec) -> PanelResult<WebHostingState> {
        docroot::validate_overrides(spec.document_root.as_deref(), spec.root_subdir.as_deref())?;
        let client = self.ctx.require_client(spec.client_id)?;
        let server = self.ctx.server_chain(spec.server_id).require()?;
        let php_id = self.resolve_php_id(spec, server).await?;

        let ops = self.ctx.operations::<WebDomain>();
        let mut record = to_record(spec, server, php_id);
        if subdir(spec).is_some() {
            record.document_root = None;
        }
        let id = ops.add(&record, client).await?;
        info!(%id, "Created hosting domain");

        let mut created = ops.get(id).await?;
        if let Some(sub) = subdir(spec) {
            let base = created.document_root.clone().unwrap_or_default();
            let combined = docroot::combine(&base, sub);
            debug!(%base, subdir = %sub, %combined, "Applying document root subdirectory");
            record.document_root = Some(combined);
            ops.update(id, client, &record).await?;
            created = ops.get(id).await?;
        }

        Ok(self
            .observe(created, Some(client), subdir(spec).map(str::to_string), spec.php_version.clone())
            .await)
    }

    /// Refreshes `state` from the remote.
    #[instrument(skip(self, state), fields(id = %state.id))]
    pub async fn read(&self, state: &WebHostingState) -> PanelResult<WebHostingState> {
        let record = self.ctx.operations::<WebDomain>().get(state.id).await?;
        Ok(self
            .observe(record, state.client_id, state.root_subdir.clone(), None)
            .await)
    }

    #[instrument(skip(self, spec, state), fields(id = %state.id))]
    pub async fn update(
        &self,
        spec: &WebHostingSpec,
        state: &WebHostingState,
    ) -> PanelResult<WebHostingState> {
        docroot::validate_overrides(spec.document_root.as_deref(), spec.root_subdir.as_deref())?;
        let client = self.ctx.require_client(spec.client_id)?;
        let ops = self.ctx.operations::<WebDomain>();
        let current = ops.get(state.id).await?;
        let server = self.ctx.server_chain(spec.server_id).require()?;
        let php_id = self.resolve_php_id(spec, server).await?;

        let mut record = to_record(spec, server, php_id);
        let previous = state.root_subdir.as_deref().filter(|s| !s.trim_matches('/').is_empty());
        if subdir(spec).is_some() || previous.is_some() {
            let current_root = current.document_root.as_deref().unwrap_or_default();
            let recomposed = docroot::recompose(current_root, previous, subdir(spec));
            debug!(current = %current_root, %recomposed, "Recomposing document root");
            record.document_root = Some(recomposed);
        }

        ops.update(state.id, client, &record).await?;
        info!("Updated hosting domain");
        let updated = ops.get(state.id).await?;
        Ok(self
            .observe(updated, Some(client), subdir(spec).map(str::to_string), spec.php_version.clone())
            .await)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: WebDomainId) -> PanelResult<()> {
        self.ctx.operations::<WebDomain>().delete(id).await?;
        info!("Deleted hosting domain");
        Ok(())
    }

    /// Reads an existing domain by its numeric id.
    pub async fn import(&self, raw_id: &str) -> PanelResult<WebHostingState> {
        let id = import_id::<WebDomainId>(raw_id)?;
        let state = WebHostingState {
            id,
            client_id: self.ctx.defaults().client_id,
            ..Default::default()
        };
        self.read(&state).await
    }

    async fn resolve_php_id(
        &self,
        spec: &WebHostingSpec,
        server: ServerId,
    ) -> PanelResult<Option<PhpId>> {
        let Some(label) = spec.php_version.as_deref() else {
            return Ok(None);
        };
        let handler = PhpHandler::or_default(spec.php.as_deref());
        let catalog = self.catalog.get(self.ctx.api(), server, &handler).await?;
        catalog.to_id(label).map(Some)
    }

    /// Normalizes a remote record. `known_label` is the label that was just
    /// applied; without it the label is looked up in the catalog.
    async fn observe(
        &self,
        record: WebDomain,
        client_id: Option<ClientId>,
        root_subdir: Option<String>,
        known_label: Option<String>,
    ) -> WebHostingState {
        let php_version = match (known_label, record.server_php_id, record.server_id) {
            (Some(label), _, _) => Some(label),
            (None, Some(php_id), Some(server)) => {
                let handler = PhpHandler::or_default(record.php_handler.as_deref());
                match self.catalog.get(self.ctx.api(), server, &handler).await {
                    Ok(catalog) => catalog.to_label(php_id).map(str::to_string),
                    Err(e) => {
                        warn!(error = %e, %server, "Could not discover PHP versions; php_version left unset");
                        None
                    }
                }
            }
            _ => None,
        };

        WebHostingState {
            id: record.id.unwrap_or_default(),
            client_id,
            server_id: record.server_id,
            domain: record.domain,
            ip_address: record.ip_address,
            ipv6_address: record.ipv6_address,
            kind: record.kind,
            parent_domain_id: record.parent_domain_id,
            document_root: record.document_root,
            root_subdir,
            php: record.php_handler,
            php_version,
            server_php_id: record.server_php_id,
            active: record.active.unwrap_or(false),
            hd_quota: record.hd_quota,
            traffic_quota: record.traffic_quota,
            cgi: record.cgi.unwrap_or(false),
            ssi: record.ssi.unwrap_or(false),
            perl: record.perl.unwrap_or(false),
            ruby: record.ruby.unwrap_or(false),
            python: record.python.unwrap_or(false),
            suexec: record.suexec.unwrap_or(false),
            ssl: record.ssl.unwrap_or(false),
            subdomain: record.subdomain,
            redirect_type: record.redirect_type,
            redirect_path: record.redirect_path,
            allow_override: record.allow_override,
            pm: record.pm,
            pm_process_idle_timeout: record.pm_process_idle_timeout,
            pm_max_requests: record.pm_max_requests,
            http_port: record.http_port,
            https_port: record.https_port,
            php_open_basedir: record.php_open_basedir,
            apache_directives: record.apache_directives,
            disable_symlink_restriction: record.disable_symlink_restriction,
            system_user: record.system_user,
            system_group: record.system_group,
        }
    }
}

fn subdir(spec: &WebHostingSpec) -> Option<&str> {
    spec.root_subdir
        .as_deref()
        .filter(|s| !s.trim_matches('/').is_empty())
}

fn to_record(spec: &WebHostingSpec, server: ServerId, php_id: Option<PhpId>) -> WebDomain {
    WebDomain {
        id: None,
        client_id: None,
        server_id: Some(server),
        domain: spec.domain.clone(),
        ip_address: spec.ip_address.clone(),
        ipv6_address: spec.ipv6_address.clone(),
        kind: spec.kind.clone(),
        parent_domain_id: spec.parent_domain_id,
        document_root: spec.document_root.clone(),
        system_user: None,
        system_group: None,
        hd_quota: spec.hd_quota,
        traffic_quota: spec.traffic_quota,
        cgi: spec.cgi,
        ssi: spec.ssi,
        perl: spec.perl,
        ruby: spec.ruby,
        python: spec.python,
        suexec: spec.suexec,
        ssl: spec.ssl,
        subdomain: spec.subdomain.clone(),
        php_handler: spec.php.clone(),
        server_php_id: php_id,
        active: spec.active,
        redirect_type: spec.redirect_type.clone(),
        redirect_path: spec.redirect_path.clone(),
        allow_override: spec.allow_override.clone(),
        pm: spec.pm.clone(),
        pm_process_idle_timeout: spec.pm_process_idle_timeout.clone(),
        pm_max_requests: spec.pm_max_requests,
        http_port: spec.http_port,
        https_port: spec.https_port,
        php_open_basedir: spec.php_open_basedir.clone(),
        apache_directives: spec.apache_directives.clone(),
        disable_symlink_restriction: spec.disable_symlink_restriction,
    }
}
