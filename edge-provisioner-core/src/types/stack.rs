//! Stack requests, outputs and ownership state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use edge_provisioner_provider::BucketSummary;

/// Website-style endpoint of the static content store.
///
/// The store itself is an external collaborator; only its endpoint is
/// consumed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentOrigin {
    /// Hostname the store serves website requests from.
    pub website_endpoint: String,
}

/// Base URL of the API backend.
///
/// Only scheme and host are used; any path is discarded in favor of the
/// distribution's fixed origin path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiOrigin {
    /// Full base URL, e.g. `https://api.example.com/prod`.
    pub url: String,
}

/// Everything a provisioning run needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StackRequest {
    /// Stack name; owned resources are grouped and named under it.
    pub name: String,
    /// Fully-qualified domain to provision.
    pub target_domain: String,
    /// Static content endpoint.
    pub content_origin: ContentOrigin,
    /// API backend endpoint.
    pub api_origin: ApiOrigin,
    /// Pre-existing log destination. When absent, a private
    /// `"<name>-logs"` bucket is provisioned and owned by the stack.
    pub logs_target: Option<BucketSummary>,
}

/// Distribution attributes exposed to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DistributionOutput {
    /// Control-plane-assigned distribution id.
    pub id: String,
    /// Endpoint the distribution serves from.
    pub domain_name: String,
    /// Zone id alias records targeting the distribution must use.
    pub hosted_zone_id: String,
}

/// The published alias record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AliasRecord {
    /// Record name relative to the zone; `@` at the apex.
    pub name: String,
    /// Zone the record lives in.
    pub zone_id: String,
}

/// The three externally meaningful outputs of a provisioning run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StackOutputs {
    /// Identifier of the validated certificate.
    pub certificate_arn: String,
    /// The provisioned distribution.
    pub distribution: DistributionOutput,
    /// The published alias record.
    pub alias_record: AliasRecord,
}

/// Kinds of resources a stack can own.
///
/// The zone is deliberately absent: it is referenced, never owned, and must
/// never be destroyed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    LogsBucket,
    Certificate,
    ValidationRecord,
    Distribution,
    AliasRecord,
}

impl ResourceKind {
    /// Teardown position: children strictly before the resources that own
    /// them. Alias and distribution go before certificate and validation
    /// record; the logs bucket outlives the distribution writing into it.
    #[must_use]
    pub fn teardown_rank(self) -> u8 {
        match self {
            Self::AliasRecord => 0,
            Self::Distribution => 1,
            Self::ValidationRecord => 2,
            Self::Certificate => 3,
            Self::LogsBucket => 4,
        }
    }
}

/// One resource owned by a stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OwnedResource {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Provider-assigned identity (ARN, distribution id, record name, …).
    pub id: String,
    /// Kind-specific context: the certificate's domain, a record's zone id,
    /// the bucket's endpoint.
    pub label: String,
    /// When the resource was first registered.
    pub created_at: DateTime<Utc>,
}

/// Ownership registry for one stack, in creation order.
///
/// Used only for lifecycle grouping and teardown ordering, never for
/// business logic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StackState {
    /// Stack name.
    pub name: String,
    /// Owned resources, in the order they were registered.
    pub resources: Vec<OwnedResource>,
}

impl StackState {
    /// Empty state for a stack.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: Vec::new(),
        }
    }

    /// First registered resource of `kind`, if any.
    #[must_use]
    pub fn find(&self, kind: ResourceKind) -> Option<&OwnedResource> {
        self.resources.iter().find(|r| r.kind == kind)
    }

    /// Register a resource. Re-registering an identical (kind, id) pair is a
    /// no-op, so converging twice never duplicates entries.
    pub fn record(&mut self, resource: OwnedResource) {
        let exists = self
            .resources
            .iter()
            .any(|r| r.kind == resource.kind && r.id == resource.id);
        if !exists {
            self.resources.push(resource);
        }
    }

    /// Forget a resource.
    pub fn remove(&mut self, kind: ResourceKind, id: &str) {
        self.resources.retain(|r| !(r.kind == kind && r.id == id));
    }

    /// Whether nothing is owned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Owned resources in destruction order (see
    /// [`ResourceKind::teardown_rank`]); stable within a kind.
    #[must_use]
    pub fn teardown_order(&self) -> Vec<OwnedResource> {
        let mut ordered = self.resources.clone();
        ordered.sort_by_key(|r| r.kind.teardown_rank());
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(kind: ResourceKind, id: &str) -> OwnedResource {
        OwnedResource {
            kind,
            id: id.to_string(),
            label: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn record_is_idempotent() {
        let mut state = StackState::new("site");
        state.record(resource(ResourceKind::Certificate, "arn:1"));
        state.record(resource(ResourceKind::Certificate, "arn:1"));
        assert_eq!(state.resources.len(), 1);
    }

    #[test]
    fn teardown_destroys_children_first() {
        let mut state = StackState::new("site");
        // creation order: bucket, certificate, validation record,
        // distribution, alias
        state.record(resource(ResourceKind::LogsBucket, "site-logs"));
        state.record(resource(ResourceKind::Certificate, "arn:1"));
        state.record(resource(ResourceKind::ValidationRecord, "_abc"));
        state.record(resource(ResourceKind::Distribution, "E1"));
        state.record(resource(ResourceKind::AliasRecord, "www"));

        let kinds: Vec<ResourceKind> =
            state.teardown_order().into_iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ResourceKind::AliasRecord,
                ResourceKind::Distribution,
                ResourceKind::ValidationRecord,
                ResourceKind::Certificate,
                ResourceKind::LogsBucket,
            ]
        );
    }

    #[test]
    fn remove_forgets_only_the_matching_resource() {
        let mut state = StackState::new("site");
        state.record(resource(ResourceKind::Certificate, "arn:1"));
        state.record(resource(ResourceKind::ValidationRecord, "_abc"));
        state.remove(ResourceKind::Certificate, "arn:1");
        assert!(state.find(ResourceKind::Certificate).is_none());
        assert!(state.find(ResourceKind::ValidationRecord).is_some());
    }
}
