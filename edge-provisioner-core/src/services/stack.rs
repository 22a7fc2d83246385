//! Stack orchestration: dependency-ordered convergence and teardown.

use std::sync::Arc;

use edge_provisioner_provider::{BucketSummary, RecordType};

use crate::error::CoreResult;
use crate::services::zone_resolver::ZoneResolver;
use crate::services::{
    AliasService, CertificateService, DistributionService, ServiceContext, resource_gone,
};
use crate::types::{
    DistributionOutput, DomainParts, ResourceKind, StackOutputs, StackRequest,
};

/// Orchestrates one stack: certificate, distribution, alias record and
/// (conditionally) a logs bucket, treated as a single provisionable unit.
///
/// Re-running [`up`](Self::up) against already-provisioned infrastructure
/// performs no spurious mutations, and a run that fails or is cancelled
/// part-way leaves every created resource registered, so
/// [`down`](Self::down) can always clean up.
pub struct StackService {
    ctx: Arc<ServiceContext>,
    certificates: CertificateService,
    distributions: DistributionService,
    aliases: AliasService,
}

impl StackService {
    /// Create a stack service instance.
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            certificates: CertificateService::new(Arc::clone(&ctx)),
            distributions: DistributionService::new(Arc::clone(&ctx)),
            aliases: AliasService::new(Arc::clone(&ctx)),
            ctx,
        }
    }

    /// Converge the stack on the requested state.
    ///
    /// Dependency order: the certificate (which itself waits on the zone
    /// lookup and the validation handshake) strictly precedes the
    /// distribution, which strictly precedes the alias record. The
    /// certificate and the logs bucket are independent and converge
    /// concurrently; zone lookups triggered by the certificate and the alias
    /// publisher share one memoized resolution.
    ///
    /// The first error terminates the run; partial progress stays registered
    /// and a later run converges from wherever this one stopped.
    pub async fn up(&self, req: &StackRequest) -> CoreResult<StackOutputs> {
        log::info!(
            "provisioning stack '{}' for {} in {}",
            req.name,
            req.target_domain,
            self.ctx.config.region
        );
        if let Some(profile) = &self.ctx.config.profile {
            log::debug!("using credential profile '{profile}'");
        }

        let parts = DomainParts::split(&req.target_domain)?;
        let zones = ZoneResolver::new(Arc::clone(&self.ctx.dns));

        let (certificate, logs) = futures::future::try_join(
            self.certificates.provision(&req.name, &parts, &zones),
            self.ensure_logs_target(req),
        )
        .await?;

        let config = DistributionService::compose(
            &req.target_domain,
            &req.content_origin,
            &req.api_origin,
            &certificate,
            &logs,
        )?;
        let distribution = self.distributions.converge(&req.name, &config).await?;
        let alias_record = self
            .aliases
            .publish(&req.name, &parts, &zones, &distribution)
            .await?;

        log::info!(
            "stack '{}' converged: {} -> {}",
            req.name,
            req.target_domain,
            distribution.domain_name
        );
        Ok(StackOutputs {
            certificate_arn: certificate.arn,
            distribution: DistributionOutput {
                id: distribution.id,
                domain_name: distribution.domain_name,
                hosted_zone_id: distribution.hosted_zone_id,
            },
            alias_record,
        })
    }

    /// Destroy everything the stack owns, children before owners: alias
    /// record, distribution, validation record, certificate, logs bucket.
    /// The zone is referenced, never owned, and is never touched.
    ///
    /// Re-entrant: resources already gone are skipped, so teardown after a
    /// cancelled or partially-converged run works on whatever subset exists.
    pub async fn down(&self, name: &str) -> CoreResult<()> {
        let Some(state) = self.ctx.state_store.load(name).await? else {
            log::debug!("stack '{name}' has no recorded state");
            return Ok(());
        };

        for resource in state.teardown_order() {
            let result = match resource.kind {
                ResourceKind::AliasRecord => {
                    self.ctx
                        .dns
                        .delete_record(&resource.label, &resource.id, RecordType::A)
                        .await
                }
                ResourceKind::Distribution => {
                    self.ctx.cdn.delete_distribution(&resource.id).await
                }
                ResourceKind::ValidationRecord => {
                    self.ctx
                        .dns
                        .delete_record(&resource.label, &resource.id, RecordType::Cname)
                        .await
                }
                ResourceKind::Certificate => {
                    self.ctx
                        .certificate_authority
                        .delete_certificate(&resource.id)
                        .await
                }
                ResourceKind::LogsBucket => {
                    self.ctx.object_store.delete_bucket(&resource.id).await
                }
            };
            match result {
                Ok(()) => log::info!("destroyed {:?} {}", resource.kind, resource.id),
                Err(e) if resource_gone(&e) => {
                    log::debug!("{:?} {} already gone", resource.kind, resource.id);
                }
                Err(e) => return Err(e.into()),
            }
            self.ctx
                .remove_resource(name, resource.kind, &resource.id)
                .await?;
        }

        self.ctx.state_store.clear(name).await?;
        log::info!("stack '{name}' torn down");
        Ok(())
    }

    /// The log destination for this run: the caller-supplied target when
    /// given, otherwise a stack-owned `"<name>-logs"` bucket.
    async fn ensure_logs_target(&self, req: &StackRequest) -> CoreResult<BucketSummary> {
        if let Some(target) = &req.logs_target {
            return Ok(target.clone());
        }

        let bucket_name = format!("{}-logs", req.name);
        if self
            .ctx
            .find_resource(&req.name, ResourceKind::LogsBucket)
            .await?
            .is_some()
        {
            if let Some(existing) = self.ctx.object_store.find_bucket(&bucket_name).await? {
                return Ok(existing);
            }
            // registered but gone; recreate below
        }

        // a foreign bucket squatting the name surfaces as a Conflict,
        // verbatim; the caller must resolve it
        let bucket = self.ctx.object_store.create_bucket(&bucket_name).await?;
        self.ctx
            .record_resource(
                &req.name,
                ResourceKind::LogsBucket,
                &bucket.name,
                &bucket.domain_name,
            )
            .await?;
        log::info!("created logs bucket {}", bucket.name);
        Ok(bucket)
    }
}
