use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    BucketSummary, CertificateDetail, CertificateRequest, DistributionConfig,
    DistributionSummary, HostedZone, IssuedCertificate, PendingCertificate, RecordType,
    UpsertRecordRequest, ZoneRecord,
};

/// DNS registry interface.
///
/// Zones are externally owned; implementations expose lookup and record
/// mutation only. Record upserts must be idempotent.
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Backend identifier, used in errors and logs.
    fn id(&self) -> &'static str;

    /// Look up the zone owning `name`.
    ///
    /// `name` may carry a trailing dot; implementations normalize before
    /// matching. Fails with [`ProviderError::ZoneNotFound`] when no zone
    /// matches, a configuration error that is never retried here.
    ///
    /// [`ProviderError::ZoneNotFound`]: crate::ProviderError::ZoneNotFound
    async fn find_zone_by_name(&self, name: &str) -> Result<HostedZone>;

    /// Create or replace a record. Re-submitting an identical request is a
    /// no-op.
    async fn upsert_record(&self, req: &UpsertRecordRequest) -> Result<ZoneRecord>;

    /// Delete a record by zone, name and type.
    async fn delete_record(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<()>;
}

/// Certificate authority interface.
///
/// An implementation is bound to one region at construction time; callers
/// needing certificates in a region other than the rest of their stack hold a
/// separately constructed instance.
#[async_trait]
pub trait CertificateAuthority: Send + Sync {
    /// Backend identifier, used in errors and logs.
    fn id(&self) -> &'static str;

    /// Request a certificate. The returned certificate is pending: its ARN
    /// exists but must not be bound anywhere until
    /// [`await_validation`](Self::await_validation) succeeds.
    async fn request_certificate(&self, req: &CertificateRequest) -> Result<PendingCertificate>;

    /// Describe an existing certificate.
    async fn describe_certificate(&self, arn: &str) -> Result<CertificateDetail>;

    /// Wait for the authority to confirm domain validation.
    ///
    /// The authority observes the public visibility of the DNS challenge; the
    /// challenge record must therefore be durably published before this call.
    /// Fails with [`ProviderError::ValidationTimeout`] when confirmation
    /// never arrives.
    ///
    /// [`ProviderError::ValidationTimeout`]: crate::ProviderError::ValidationTimeout
    async fn await_validation(&self, arn: &str) -> Result<IssuedCertificate>;

    /// Delete a certificate.
    async fn delete_certificate(&self, arn: &str) -> Result<()>;
}

/// CDN control-plane interface.
///
/// No retry mechanics live here; creation and update failures propagate to
/// the caller unchanged.
#[async_trait]
pub trait CdnApi: Send + Sync {
    /// Backend identifier, used in errors and logs.
    fn id(&self) -> &'static str;

    /// Find the distribution answering for `alias`, if any.
    async fn find_distribution_by_alias(
        &self,
        alias: &str,
    ) -> Result<Option<DistributionSummary>>;

    /// Describe a distribution by id.
    async fn get_distribution(&self, id: &str) -> Result<DistributionSummary>;

    /// Fetch the current configuration of a distribution.
    async fn get_distribution_config(&self, id: &str) -> Result<DistributionConfig>;

    /// Create a distribution. Resolves once the control plane has
    /// acknowledged the creation.
    async fn create_distribution(&self, config: &DistributionConfig)
    -> Result<DistributionSummary>;

    /// Replace a distribution's configuration.
    async fn update_distribution(
        &self,
        id: &str,
        config: &DistributionConfig,
    ) -> Result<DistributionSummary>;

    /// Delete a distribution.
    async fn delete_distribution(&self, id: &str) -> Result<()>;
}

/// Object-store interface, used for log buckets.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Backend identifier, used in errors and logs.
    fn id(&self) -> &'static str;

    /// Find a bucket by name.
    async fn find_bucket(&self, name: &str) -> Result<Option<BucketSummary>>;

    /// Create a private bucket. Fails with [`ProviderError::Conflict`] when
    /// the name is already taken.
    ///
    /// [`ProviderError::Conflict`]: crate::ProviderError::Conflict
    async fn create_bucket(&self, name: &str) -> Result<BucketSummary>;

    /// Delete a bucket.
    async fn delete_bucket(&self, name: &str) -> Result<()>;
}
