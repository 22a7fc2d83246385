//! # edge-provisioner-provider
//!
//! Control-plane abstraction for provisioning a CDN-fronted, TLS-secured
//! domain: DNS zones and records, TLS certificates with DNS validation, CDN
//! distributions, and log buckets.
//!
//! The orchestration layer (`edge-provisioner-core`) talks to the cloud only
//! through the four traits defined here:
//!
//! | Trait | Concern |
//! |-------|---------|
//! | [`DnsApi`] | Zone lookup, record upsert/delete |
//! | [`CertificateAuthority`] | Certificate request, DNS validation, issuance |
//! | [`CdnApi`] | Distribution create/update/delete |
//! | [`ObjectStore`] | Log bucket create/delete |
//!
//! Implementations carry no retry mechanics and surface failures unchanged;
//! deciding what exists and in what order is the orchestrator's job, not the
//! transport's.
//!
//! ## Feature Flags
//!
//! - **`memory`** *(default)* — [`MemoryCloud`], an instrumented in-process
//!   control plane implementing all four traits. Used by the test suites and
//!   for dry runs.
//!
//! ## Quick Start
//!
//! ```rust
//! use edge_provisioner_provider::{DnsApi, MemoryCloud};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cloud = MemoryCloud::new("us-east-1");
//!     let zone = cloud.add_zone("example.com").await;
//!
//!     let found = cloud.find_zone_by_name("example.com.").await?;
//!     assert_eq!(found.id, zone.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). The
//! variants mirror the failure modes a provisioning run must distinguish:
//!
//! - [`ProviderError::ZoneNotFound`] — missing external configuration
//! - [`ProviderError::ValidationTimeout`] — DNS challenge never confirmed
//! - [`ProviderError::Conflict`] — a conflicting resource already exists
//!
//! Nothing is retried here; see [`ProviderError`] for the full list.

mod error;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export control-plane traits
pub use traits::{CdnApi, CertificateAuthority, DnsApi, ObjectStore};

// Re-export types
pub use types::{
    AliasTarget, AllowedMethods, BucketSummary, CacheBehavior, CertificateDetail,
    CertificateRequest, CertificateStatus, CookieForwarding, CustomErrorResponse,
    DISTRIBUTION_HOSTED_ZONE_ID, DistributionConfig, DistributionStatus, DistributionSummary,
    DomainValidationOption, GeoRestriction, HostedZone, IssuedCertificate, LoggingConfig,
    OriginConfig, OriginProtocolPolicy, PendingCertificate, PriceClass, RecordData, RecordType,
    SslSupportMethod, UpsertRecordRequest, ValidationMethod, ViewerCertificate,
    ViewerProtocolPolicy, ZoneRecord,
};

// Re-export name-handling helpers
pub use utils::names;

// Re-export concrete backends (behind feature flags)
#[cfg(feature = "memory")]
pub use providers::{CloudEvent, MemoryCloud};
