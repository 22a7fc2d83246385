//! Provisioning service layer.

mod alias;
mod certificate;
mod distribution;
mod stack;
mod zone_resolver;

pub use alias::AliasService;
pub use certificate::CertificateService;
pub use distribution::DistributionService;
pub use stack::StackService;
pub use zone_resolver::ZoneResolver;

use std::sync::Arc;

use chrono::Utc;

use edge_provisioner_provider::{CdnApi, CertificateAuthority, DnsApi, ObjectStore, ProviderError};

use crate::config::StackConfig;
use crate::error::CoreResult;
use crate::traits::StackStateStore;
use crate::types::{OwnedResource, ResourceKind};

/// Service context - holds all dependencies
///
/// The platform layer creates this context and injects its control-plane
/// backends and state store. The core reads no ambient configuration; every
/// recognized option lives in [`StackConfig`].
pub struct ServiceContext {
    /// DNS registry (zone lookup, record mutation)
    pub dns: Arc<dyn DnsApi>,
    /// Certificate authority. Must be constructed bound to
    /// [`StackConfig::certificate_region`], which is distinct from the rest
    /// of the stack's region.
    pub certificate_authority: Arc<dyn CertificateAuthority>,
    /// CDN control plane
    pub cdn: Arc<dyn CdnApi>,
    /// Object store for log buckets
    pub object_store: Arc<dyn ObjectStore>,
    /// Ownership registry persistence
    pub state_store: Arc<dyn StackStateStore>,
    /// Explicit orchestrator configuration
    pub config: StackConfig,
}

impl ServiceContext {
    /// Create a service context
    #[must_use]
    pub fn new(
        dns: Arc<dyn DnsApi>,
        certificate_authority: Arc<dyn CertificateAuthority>,
        cdn: Arc<dyn CdnApi>,
        object_store: Arc<dyn ObjectStore>,
        state_store: Arc<dyn StackStateStore>,
        config: StackConfig,
    ) -> Self {
        Self {
            dns,
            certificate_authority,
            cdn,
            object_store,
            state_store,
            config,
        }
    }

    /// First registered resource of `kind` for `stack`, if any.
    pub async fn find_resource(
        &self,
        stack: &str,
        kind: ResourceKind,
    ) -> CoreResult<Option<OwnedResource>> {
        Ok(self
            .state_store
            .load(stack)
            .await?
            .and_then(|state| state.find(kind).cloned()))
    }

    /// Register an owned resource. Registration happens before any wait on
    /// the resource, so a cancelled run always leaves it discoverable for
    /// teardown.
    pub async fn record_resource(
        &self,
        stack: &str,
        kind: ResourceKind,
        id: &str,
        label: &str,
    ) -> CoreResult<()> {
        self.state_store
            .record(
                stack,
                OwnedResource {
                    kind,
                    id: id.to_string(),
                    label: label.to_string(),
                    created_at: Utc::now(),
                },
            )
            .await
    }

    /// Forget an owned resource.
    pub async fn remove_resource(
        &self,
        stack: &str,
        kind: ResourceKind,
        id: &str,
    ) -> CoreResult<()> {
        self.state_store.remove(stack, kind, id).await
    }
}

/// Whether a deletion-path error just means the resource is already gone.
/// Teardown is re-entrant; missing resources are not failures.
pub(crate) fn resource_gone(err: &ProviderError) -> bool {
    matches!(
        err,
        ProviderError::ZoneNotFound { .. }
            | ProviderError::RecordNotFound { .. }
            | ProviderError::CertificateNotFound { .. }
            | ProviderError::DistributionNotFound { .. }
            | ProviderError::BucketNotFound { .. }
    )
}
