//! Certificate provisioning with DNS-validated domain ownership.

use std::sync::Arc;

use edge_provisioner_provider::{
    CertificateRequest, CertificateStatus, IssuedCertificate, RecordData, RecordType,
    UpsertRecordRequest, ValidationMethod, names,
};

use crate::error::{CoreError, CoreResult};
use crate::services::zone_resolver::ZoneResolver;
use crate::services::{ServiceContext, resource_gone};
use crate::types::{DomainParts, OwnedResource, ResourceKind};

/// TTL of the published validation record.
const VALIDATION_RECORD_TTL: u32 = 300;

/// Certificate provisioning service.
pub struct CertificateService {
    ctx: Arc<ServiceContext>,
}

impl CertificateService {
    /// Create a certificate service instance.
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Provision a validated certificate for the target domain.
    ///
    /// Requests the certificate, publishes the authority's DNS challenge
    /// under the owning zone, and waits for the authority to confirm. The
    /// usable [`IssuedCertificate`] exists only after confirmation; the
    /// challenge record is always durably published before the wait begins.
    ///
    /// Re-provisioning with an unchanged domain reuses the recorded
    /// certificate instead of requesting a new one. A changed domain replaces
    /// the certificate (the old one and its validation record are destroyed
    /// first); certificates are never mutated in place.
    pub async fn provision(
        &self,
        stack: &str,
        parts: &DomainParts,
        zones: &ZoneResolver,
    ) -> CoreResult<IssuedCertificate> {
        let target_domain = parts.fqdn();

        if let Some(existing) = self.ctx.find_resource(stack, ResourceKind::Certificate).await? {
            if existing.label == target_domain {
                match self
                    .ctx
                    .certificate_authority
                    .describe_certificate(&existing.id)
                    .await
                {
                    Ok(detail) if detail.status == CertificateStatus::Issued => {
                        log::debug!("reusing issued certificate {}", existing.id);
                        return Ok(IssuedCertificate { arn: existing.id });
                    }
                    // still pending: fall through, re-publish the challenge
                    // and wait again
                    Ok(_) => {}
                    Err(e) if resource_gone(&e) => {
                        // stale registration; the authority no longer knows it
                        self.ctx
                            .remove_resource(stack, ResourceKind::Certificate, &existing.id)
                            .await?;
                    }
                    Err(e) => return Err(e.into()),
                }
            } else {
                self.replace(stack, &existing).await?;
            }
        }

        let zone = zones.resolve(&parts.parent_domain).await?;

        let pending = self
            .ctx
            .certificate_authority
            .request_certificate(&CertificateRequest {
                domain_name: target_domain.clone(),
                validation_method: ValidationMethod::Dns,
            })
            .await?;
        self.ctx
            .record_resource(
                stack,
                ResourceKind::Certificate,
                &pending.arn,
                &target_domain,
            )
            .await?;

        // One challenge per covered name; exactly one name is covered here.
        let option = pending.validation_options.into_iter().next().ok_or_else(|| {
            CoreError::ValidationError(
                "certificate authority returned no validation options".to_string(),
            )
        })?;

        let record_name = names::full_name_to_relative(&option.record_name, &zone.name);
        self.ctx
            .dns
            .upsert_record(&UpsertRecordRequest {
                zone_id: zone.id.clone(),
                name: record_name.clone(),
                ttl: Some(VALIDATION_RECORD_TTL),
                data: RecordData::Cname {
                    target: option.record_value.clone(),
                },
            })
            .await?;
        self.ctx
            .record_resource(stack, ResourceKind::ValidationRecord, &record_name, &zone.id)
            .await?;
        log::info!(
            "published validation record {record_name} for {target_domain}, awaiting confirmation"
        );

        // The challenge is durably published; only now may we wait on the
        // authority.
        let issued = self
            .ctx
            .certificate_authority
            .await_validation(&pending.arn)
            .await?;
        log::info!("certificate {} validated for {target_domain}", issued.arn);
        Ok(issued)
    }

    /// Destroy a superseded certificate and its validation record, children
    /// first.
    async fn replace(&self, stack: &str, existing: &OwnedResource) -> CoreResult<()> {
        log::info!(
            "target domain changed from '{}'; replacing certificate {}",
            existing.label,
            existing.id
        );
        if let Some(record) = self
            .ctx
            .find_resource(stack, ResourceKind::ValidationRecord)
            .await?
        {
            match self
                .ctx
                .dns
                .delete_record(&record.label, &record.id, RecordType::Cname)
                .await
            {
                Ok(()) => {}
                Err(e) if resource_gone(&e) => {}
                Err(e) => return Err(e.into()),
            }
            self.ctx
                .remove_resource(stack, ResourceKind::ValidationRecord, &record.id)
                .await?;
        }
        match self
            .ctx
            .certificate_authority
            .delete_certificate(&existing.id)
            .await
        {
            Ok(()) => {}
            Err(e) if resource_gone(&e) => {}
            Err(e) => return Err(e.into()),
        }
        self.ctx
            .remove_resource(stack, ResourceKind::Certificate, &existing.id)
            .await
    }
}
