//! Cron job reconciler.

use panel::{
    ClientId, CronJob, CronJobId, CronSchedule, PanelResult, ServerId, WebDomain, WebDomainId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::context::ResourceContext;
use crate::import::import_id;

/// Desired configuration of a cron job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CronTaskSpec {
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub parent_domain_id: WebDomainId,
    /// `"minute hour day-of-month month day-of-week"`.
    pub schedule: String,
    /// URL for `url` jobs, shell command otherwise.
    pub command: String,
    /// `url`, `chrooted` or `full`.
    pub kind: String,
    pub active: bool,
}

impl CronTaskSpec {
    pub fn new(
        parent_domain_id: WebDomainId,
        schedule: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            client_id: None,
            server_id: None,
            parent_domain_id,
            schedule: schedule.into(),
            command: command.into(),
            kind: "url".into(),
            active: true,
        }
    }
}

/// Observed state of a cron job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CronTaskState {
    pub id: CronJobId,
    pub client_id: Option<ClientId>,
    pub server_id: Option<ServerId>,
    pub parent_domain_id: WebDomainId,
    pub schedule: String,
    pub command: String,
    pub kind: Option<String>,
    pub active: bool,
}

/// Create, read, update, delete and import for cron jobs.
#[derive(Debug, Clone)]
pub struct CronTask {
    ctx: ResourceContext,
}

impl CronTask {
    pub fn new(ctx: ResourceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, spec), fields(schedule = %spec.schedule))]
    pub async fn create(&self, spec: &CronTaskSpec) -> PanelResult<CronTaskState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let record = self.to_record(spec).await?;
        let ops = self.ctx.operations::<CronJob>();
        let id = ops.add(&record, client).await?;
        info!(%id, "Created cron job");
        let created = ops.get(id).await?;
        Ok(observe(created, Some(client)))
    }

    #[instrument(skip(self, state), fields(id = %state.id))]
    pub async fn read(&self, state: &CronTaskState) -> PanelResult<CronTaskState> {
        let record = self.ctx.operations::<CronJob>().get(state.id).await?;
        Ok(observe(record, state.client_id))
    }

    #[instrument(skip(self, spec, state), fields(id = %state.id))]
    pub async fn update(&self, spec: &CronTaskSpec, state: &CronTaskState) -> PanelResult<CronTaskState> {
        let client = self.ctx.require_client(spec.client_id)?;
        let record = self.to_record(spec).await?;
        let ops = self.ctx.operations::<CronJob>();
        ops.update(state.id, client, &record).await?;
        info!("Updated cron job");
        let updated = ops.get(state.id).await?;
        Ok(observe(updated, Some(client)))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: CronJobId) -> PanelResult<()> {
        self.ctx.operations::<CronJob>().delete(id).await?;
        info!("Deleted cron job");
        Ok(())
    }

    pub async fn import(&self, raw_id: &str) -> PanelResult<CronTaskState> {
        let id = import_id::<CronJobId>(raw_id)?;
        let state = CronTaskState {
            id,
            client_id: self.ctx.defaults().client_id,
            ..Default::default()
        };
        self.read(&state).await
    }

    /// Parses the schedule before any remote call.
    async fn to_record(&self, spec: &CronTaskSpec) -> PanelResult<CronJob> {
        let schedule = CronSchedule::parse(&spec.schedule)?;

        let mut chain = self.ctx.server_chain(spec.server_id);
        if chain.needs_parent() {
            debug!(parent = %spec.parent_domain_id, "Inheriting server from parent domain");
            let parent = self
                .ctx
                .operations::<WebDomain>()
                .get(spec.parent_domain_id)
                .await?;
            chain = chain.parent(parent.server_id);
        }

        Ok(CronJob {
            id: None,
            server_id: chain.resolve(),
            parent_domain_id: spec.parent_domain_id,
            kind: Some(spec.kind.clone()),
            command: spec.command.clone(),
            run_min: schedule.minute,
            run_hour: schedule.hour,
            run_mday: schedule.day_of_month,
            run_month: schedule.month,
            run_wday: schedule.day_of_week,
            active: Some(spec.active),
        })
    }
}

fn observe(record: CronJob, client_id: Option<ClientId>) -> CronTaskState {
    let schedule = CronSchedule::from_fields(
        &record.run_min,
        &record.run_hour,
        &record.run_mday,
        &record.run_month,
        &record.run_wday,
    );
    CronTaskState {
        id: record.id.unwrap_or_default(),
        client_id,
        server_id: record.server_id,
        parent_domain_id: record.parent_domain_id,
        schedule: schedule.to_string(),
        command: record.command,
        kind: record.kind,
        active: record.active.unwrap_or(false),
    }
}
