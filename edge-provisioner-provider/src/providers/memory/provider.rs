//! Control-plane trait implementations for [`MemoryCloud`].

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::{ProviderError, Result};
use crate::traits::{CdnApi, CertificateAuthority, DnsApi, ObjectStore};
use crate::types::{
    BucketSummary, CertificateDetail, CertificateRequest, CertificateStatus,
    DISTRIBUTION_HOSTED_ZONE_ID, DistributionConfig, DistributionStatus, DistributionSummary,
    DomainValidationOption, HostedZone, IssuedCertificate, PendingCertificate, RecordData,
    RecordType, UpsertRecordRequest, ZoneRecord,
};
use crate::utils::names::{full_name_to_relative, normalize_domain_name};

use super::{CertificateEntry, DistributionEntry, MemoryCloud, PROVIDER_ID, resource_id};

fn provider() -> String {
    PROVIDER_ID.to_string()
}

#[async_trait]
impl DnsApi for MemoryCloud {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn find_zone_by_name(&self, name: &str) -> Result<HostedZone> {
        let mut state = self.state.write().await;
        state.zone_lookups += 1;
        let wanted = normalize_domain_name(name);
        state
            .zones
            .values()
            .find(|entry| normalize_domain_name(&entry.zone.name) == wanted)
            .map(|entry| entry.zone.clone())
            .ok_or_else(|| ProviderError::ZoneNotFound {
                provider: provider(),
                domain: name.to_string(),
                raw_message: None,
            })
    }

    async fn upsert_record(&self, req: &UpsertRecordRequest) -> Result<ZoneRecord> {
        let mut state = self.state.write().await;
        let Some(entry) = state.zones.get_mut(&req.zone_id) else {
            return Err(ProviderError::ZoneNotFound {
                provider: provider(),
                domain: req.zone_id.clone(),
                raw_message: None,
            });
        };

        let record = ZoneRecord {
            zone_id: req.zone_id.clone(),
            name: req.name.clone(),
            ttl: req.ttl,
            data: req.data.clone(),
        };
        let key = (req.name.clone(), req.data.record_type());
        if entry.records.get(&key) == Some(&record) {
            // identical upsert, nothing to change
            return Ok(record);
        }
        entry.records.insert(key, record.clone());
        state.mutations += 1;
        state.record_event(format!(
            "upsert record {} {} = {}",
            req.name,
            req.data.record_type(),
            req.data.display_value()
        ));
        log::debug!(
            "[{PROVIDER_ID}] upserted {} {} in zone {}",
            req.name,
            req.data.record_type(),
            req.zone_id
        );
        Ok(record)
    }

    async fn delete_record(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(entry) = state.zones.get_mut(zone_id) else {
            return Err(ProviderError::ZoneNotFound {
                provider: provider(),
                domain: zone_id.to_string(),
                raw_message: None,
            });
        };
        if entry
            .records
            .remove(&(name.to_string(), record_type))
            .is_none()
        {
            return Err(ProviderError::RecordNotFound {
                provider: provider(),
                zone_id: zone_id.to_string(),
                record_name: name.to_string(),
            });
        }
        state.mutations += 1;
        state.record_event(format!("delete record {name} {record_type}"));
        Ok(())
    }
}

#[async_trait]
impl CertificateAuthority for MemoryCloud {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn request_certificate(&self, req: &CertificateRequest) -> Result<PendingCertificate> {
        let mut state = self.state.write().await;
        let domain = normalize_domain_name(&req.domain_name);

        // Repeat requests for the same domain return the existing
        // certificate, matching idempotency-token semantics.
        if let Some(entry) = state
            .certificates
            .values()
            .find(|c| c.detail.domain_name == domain && c.detail.status != CertificateStatus::Failed)
        {
            return Ok(PendingCertificate {
                arn: entry.detail.arn.clone(),
                validation_options: vec![entry.validation_option.clone()],
            });
        }

        let token = hex::encode(Sha256::digest(domain.as_bytes()));
        let arn = format!(
            "arn:aws:acm:{}:000000000000:certificate/{}",
            self.region,
            uuid::Uuid::new_v4()
        );
        let option = DomainValidationOption {
            domain_name: domain.clone(),
            record_name: format!("_{}.{domain}.", &token[..16]),
            record_type: RecordType::Cname,
            record_value: format!("_{}.acm-validations.aws.", &token[16..32]),
        };
        state.certificates.insert(
            arn.clone(),
            CertificateEntry {
                detail: CertificateDetail {
                    arn: arn.clone(),
                    domain_name: domain.clone(),
                    status: CertificateStatus::PendingValidation,
                },
                validation_option: option.clone(),
            },
        );
        state.mutations += 1;
        state.record_event(format!("request certificate {domain}"));
        Ok(PendingCertificate {
            arn,
            validation_options: vec![option],
        })
    }

    async fn describe_certificate(&self, arn: &str) -> Result<CertificateDetail> {
        let state = self.state.read().await;
        state
            .certificates
            .get(arn)
            .map(|entry| entry.detail.clone())
            .ok_or_else(|| ProviderError::CertificateNotFound {
                provider: provider(),
                arn: arn.to_string(),
            })
    }

    async fn await_validation(&self, arn: &str) -> Result<IssuedCertificate> {
        let mut state = self.state.write().await;
        let Some(entry) = state.certificates.get(arn) else {
            return Err(ProviderError::CertificateNotFound {
                provider: provider(),
                arn: arn.to_string(),
            });
        };
        if entry.detail.status == CertificateStatus::Issued {
            return Ok(IssuedCertificate {
                arn: arn.to_string(),
            });
        }
        let option = entry.validation_option.clone();
        let domain = entry.detail.domain_name.clone();

        // The authority confirms only once the challenge is publicly visible
        // in the owning zone.
        let visible = state.zones.values().any(|z| {
            let relative = full_name_to_relative(&option.record_name, &z.zone.name);
            z.records
                .get(&(relative, RecordType::Cname))
                .is_some_and(|r| {
                    matches!(&r.data, RecordData::Cname { target } if *target == option.record_value)
                })
        });
        if !visible {
            return Err(ProviderError::ValidationTimeout {
                provider: provider(),
                domain,
                waited_secs: None,
            });
        }

        if let Some(entry) = state.certificates.get_mut(arn) {
            entry.detail.status = CertificateStatus::Issued;
        }
        state.record_event(format!("certificate issued {domain}"));
        log::debug!("[{PROVIDER_ID}] certificate for {domain} issued");
        Ok(IssuedCertificate {
            arn: arn.to_string(),
        })
    }

    async fn delete_certificate(&self, arn: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(entry) = state.certificates.remove(arn) else {
            return Err(ProviderError::CertificateNotFound {
                provider: provider(),
                arn: arn.to_string(),
            });
        };
        state.mutations += 1;
        state.record_event(format!("delete certificate {}", entry.detail.domain_name));
        Ok(())
    }
}

#[async_trait]
impl CdnApi for MemoryCloud {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn find_distribution_by_alias(
        &self,
        alias: &str,
    ) -> Result<Option<DistributionSummary>> {
        let state = self.state.read().await;
        Ok(state
            .distributions
            .values()
            .find(|entry| entry.config.aliases.iter().any(|a| a == alias))
            .map(|entry| entry.summary.clone()))
    }

    async fn get_distribution(&self, id: &str) -> Result<DistributionSummary> {
        let state = self.state.read().await;
        state
            .distributions
            .get(id)
            .map(|entry| entry.summary.clone())
            .ok_or_else(|| ProviderError::DistributionNotFound {
                provider: provider(),
                distribution_id: id.to_string(),
            })
    }

    async fn get_distribution_config(&self, id: &str) -> Result<DistributionConfig> {
        let state = self.state.read().await;
        state
            .distributions
            .get(id)
            .map(|entry| entry.config.clone())
            .ok_or_else(|| ProviderError::DistributionNotFound {
                provider: provider(),
                distribution_id: id.to_string(),
            })
    }

    async fn create_distribution(
        &self,
        config: &DistributionConfig,
    ) -> Result<DistributionSummary> {
        let mut state = self.state.write().await;
        for alias in &config.aliases {
            if let Some(existing) = state
                .distributions
                .values()
                .find(|entry| entry.config.aliases.contains(alias))
            {
                return Err(ProviderError::Conflict {
                    provider: provider(),
                    resource: "distribution".to_string(),
                    detail: format!(
                        "alias '{alias}' already associated with {}",
                        existing.summary.id
                    ),
                });
            }
        }

        let id = resource_id("E");
        let summary = DistributionSummary {
            id: id.clone(),
            domain_name: format!("{}.cloudfront.net", id.to_lowercase()),
            hosted_zone_id: DISTRIBUTION_HOSTED_ZONE_ID.to_string(),
            status: DistributionStatus::Deployed,
        };
        state.distributions.insert(
            id.clone(),
            DistributionEntry {
                summary: summary.clone(),
                config: config.clone(),
            },
        );
        state.mutations += 1;
        state.record_event(format!("create distribution {id}"));
        log::debug!("[{PROVIDER_ID}] created distribution {id}");
        Ok(summary)
    }

    async fn update_distribution(
        &self,
        id: &str,
        config: &DistributionConfig,
    ) -> Result<DistributionSummary> {
        let mut state = self.state.write().await;
        let Some(entry) = state.distributions.get_mut(id) else {
            return Err(ProviderError::DistributionNotFound {
                provider: provider(),
                distribution_id: id.to_string(),
            });
        };
        if entry.config == *config {
            return Ok(entry.summary.clone());
        }
        entry.config = config.clone();
        let summary = entry.summary.clone();
        state.mutations += 1;
        state.record_event(format!("update distribution {id}"));
        Ok(summary)
    }

    async fn delete_distribution(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.distributions.remove(id).is_none() {
            return Err(ProviderError::DistributionNotFound {
                provider: provider(),
                distribution_id: id.to_string(),
            });
        }
        state.mutations += 1;
        state.record_event(format!("delete distribution {id}"));
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryCloud {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn find_bucket(&self, name: &str) -> Result<Option<BucketSummary>> {
        let state = self.state.read().await;
        Ok(state.buckets.get(name).cloned())
    }

    async fn create_bucket(&self, name: &str) -> Result<BucketSummary> {
        let mut state = self.state.write().await;
        if state.buckets.contains_key(name) {
            return Err(ProviderError::Conflict {
                provider: provider(),
                resource: "bucket".to_string(),
                detail: format!("'{name}' already exists"),
            });
        }
        let bucket = BucketSummary {
            name: name.to_string(),
            domain_name: format!("{name}.s3.amazonaws.com"),
        };
        state.buckets.insert(name.to_string(), bucket.clone());
        state.mutations += 1;
        state.record_event(format!("create bucket {name}"));
        Ok(bucket)
    }

    async fn delete_bucket(&self, name: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.buckets.remove(name).is_none() {
            return Err(ProviderError::BucketNotFound {
                provider: provider(),
                bucket: name.to_string(),
            });
        }
        state.mutations += 1;
        state.record_event(format!("delete bucket {name}"));
        Ok(())
    }
}
