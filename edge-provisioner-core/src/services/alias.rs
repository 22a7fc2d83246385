//! Alias record publication.

use std::sync::Arc;

use edge_provisioner_provider::{
    AliasTarget, DistributionSummary, RecordData, RecordType, UpsertRecordRequest,
};

use crate::error::CoreResult;
use crate::services::zone_resolver::ZoneResolver;
use crate::services::{ServiceContext, resource_gone};
use crate::types::{AliasRecord, DomainParts, ResourceKind};

/// Alias record publication service.
pub struct AliasService {
    ctx: Arc<ServiceContext>,
}

impl AliasService {
    /// Create an alias service instance.
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Point the target domain at the distribution's endpoint.
    ///
    /// Publishes an alias record rather than a plain address record, so
    /// resolution follows the distribution's own endpoint and hosted zone,
    /// with target health evaluation enabled. Upsert semantics make
    /// re-publishing with identical inputs a no-op.
    pub async fn publish(
        &self,
        stack: &str,
        parts: &DomainParts,
        zones: &ZoneResolver,
        distribution: &DistributionSummary,
    ) -> CoreResult<AliasRecord> {
        let zone = zones.resolve(&parts.parent_domain).await?;
        let name = if parts.subdomain.is_empty() {
            "@".to_string()
        } else {
            parts.subdomain.clone()
        };

        // A renamed target leaves a stale alias behind; retire it first.
        if let Some(previous) = self.ctx.find_resource(stack, ResourceKind::AliasRecord).await? {
            if previous.id != name {
                match self
                    .ctx
                    .dns
                    .delete_record(&previous.label, &previous.id, RecordType::A)
                    .await
                {
                    Ok(()) => {}
                    Err(e) if resource_gone(&e) => {}
                    Err(e) => return Err(e.into()),
                }
                self.ctx
                    .remove_resource(stack, ResourceKind::AliasRecord, &previous.id)
                    .await?;
            }
        }

        self.ctx
            .dns
            .upsert_record(&UpsertRecordRequest {
                zone_id: zone.id.clone(),
                name: name.clone(),
                ttl: None,
                data: RecordData::Alias {
                    target: AliasTarget {
                        dns_name: distribution.domain_name.clone(),
                        hosted_zone_id: distribution.hosted_zone_id.clone(),
                        evaluate_target_health: true,
                    },
                },
            })
            .await?;
        self.ctx
            .record_resource(stack, ResourceKind::AliasRecord, &name, &zone.id)
            .await?;
        log::info!(
            "alias '{name}' in zone {} -> {}",
            zone.id,
            distribution.domain_name
        );

        Ok(AliasRecord {
            name,
            zone_id: zone.id,
        })
    }
}
