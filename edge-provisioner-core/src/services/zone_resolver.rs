//! Memoized zone lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use edge_provisioner_provider::{DnsApi, HostedZone, names};

use crate::error::CoreResult;

/// Resolves the externally managed zone owning a parent domain.
///
/// Results are memoized per distinct parent domain for the lifetime of the
/// resolver; one resolver is constructed per orchestration run. Concurrent
/// consumers of the same parent domain share a single lookup and observe the
/// same zone identifier; the cell is the only synchronization the run needs,
/// since nobody mutates the zone.
pub struct ZoneResolver {
    dns: Arc<dyn DnsApi>,
    cache: Mutex<HashMap<String, Arc<OnceCell<HostedZone>>>>,
}

impl ZoneResolver {
    /// Create a resolver for one orchestration run.
    #[must_use]
    pub fn new(dns: Arc<dyn DnsApi>) -> Self {
        Self {
            dns,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Look up the zone owning `parent_domain`, suspending until the registry
    /// answers.
    ///
    /// A missing zone surfaces as
    /// [`ProviderError::ZoneNotFound`](edge_provisioner_provider::ProviderError::ZoneNotFound)
    /// and is not retried: it is a configuration error, not a transient
    /// fault.
    pub async fn resolve(&self, parent_domain: &str) -> CoreResult<HostedZone> {
        let cell = {
            let mut cache = self.cache.lock().await;
            Arc::clone(
                cache
                    .entry(names::normalize_domain_name(parent_domain))
                    .or_default(),
            )
        };
        let zone = cell
            .get_or_try_init(|| async {
                log::debug!("resolving zone for '{parent_domain}'");
                self.dns.find_zone_by_name(parent_domain).await
            })
            .await?;
        Ok(zone.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use edge_provisioner_provider::{MemoryCloud, ProviderError};

    use crate::error::CoreError;

    #[tokio::test]
    async fn concurrent_resolves_share_one_lookup() {
        let cloud = Arc::new(MemoryCloud::new("us-east-1"));
        cloud.add_zone("example.com").await;
        let resolver = ZoneResolver::new(cloud.clone());

        let (a, b) = tokio::join!(
            resolver.resolve("example.com."),
            resolver.resolve("example.com.")
        );
        assert_eq!(a.unwrap().id, b.unwrap().id);
        assert_eq!(cloud.zone_lookup_count().await, 1);
    }

    #[tokio::test]
    async fn distinct_domains_resolve_independently() {
        let cloud = Arc::new(MemoryCloud::new("us-east-1"));
        cloud.add_zone("example.com").await;
        cloud.add_zone("example.org").await;
        let resolver = ZoneResolver::new(cloud.clone());

        let com = resolver.resolve("example.com.").await.unwrap();
        let org = resolver.resolve("example.org.").await.unwrap();
        assert_ne!(com.id, org.id);
        assert_eq!(cloud.zone_lookup_count().await, 2);
    }

    #[tokio::test]
    async fn trailing_dot_does_not_split_the_cache() {
        let cloud = Arc::new(MemoryCloud::new("us-east-1"));
        cloud.add_zone("example.com").await;
        let resolver = ZoneResolver::new(cloud.clone());

        resolver.resolve("example.com.").await.unwrap();
        resolver.resolve("example.com").await.unwrap();
        assert_eq!(cloud.zone_lookup_count().await, 1);
    }

    #[tokio::test]
    async fn missing_zone_surfaces_unchanged() {
        let cloud = Arc::new(MemoryCloud::new("us-east-1"));
        let resolver = ZoneResolver::new(cloud);

        let err = resolver.resolve("missing.example.").await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Provider(ProviderError::ZoneNotFound { .. })
        ));
    }
}
