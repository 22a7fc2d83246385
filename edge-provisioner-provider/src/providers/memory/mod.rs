//! In-process control plane.
//!
//! [`MemoryCloud`] implements every control-plane trait against shared
//! in-memory state, so a full provisioning run can execute without network
//! access. Used by the test suites and for dry runs.
//!
//! The backend is instrumented: it counts zone lookups and state-changing
//! writes, and keeps a timestamped event log, which is what convergence and
//! ordering tests assert against.

mod provider;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::types::{
    BucketSummary, CertificateDetail, DistributionConfig, DistributionSummary,
    DomainValidationOption, HostedZone, RecordType, ZoneRecord,
};
use crate::utils::names::normalize_domain_name;

pub(crate) const PROVIDER_ID: &str = "memory";

/// One timestamped control-plane action.
#[derive(Debug, Clone)]
pub struct CloudEvent {
    /// When the action happened.
    pub at: DateTime<Utc>,
    /// Short description, e.g. `"upsert record _abc CNAME"`.
    pub action: String,
}

pub(crate) struct ZoneEntry {
    pub(crate) zone: HostedZone,
    /// Keyed by (relative name, record type).
    pub(crate) records: HashMap<(String, RecordType), ZoneRecord>,
}

pub(crate) struct CertificateEntry {
    pub(crate) detail: CertificateDetail,
    pub(crate) validation_option: DomainValidationOption,
}

pub(crate) struct DistributionEntry {
    pub(crate) summary: DistributionSummary,
    pub(crate) config: DistributionConfig,
}

#[derive(Default)]
pub(crate) struct CloudState {
    pub(crate) zones: HashMap<String, ZoneEntry>,
    pub(crate) certificates: HashMap<String, CertificateEntry>,
    pub(crate) distributions: HashMap<String, DistributionEntry>,
    pub(crate) buckets: HashMap<String, BucketSummary>,
    pub(crate) events: Vec<CloudEvent>,
    pub(crate) mutations: u64,
    pub(crate) zone_lookups: u64,
}

impl CloudState {
    pub(crate) fn record_event(&mut self, action: impl Into<String>) {
        self.events.push(CloudEvent {
            at: Utc::now(),
            action: action.into(),
        });
    }
}

/// In-process control plane backend.
///
/// Cloning via [`in_region`](Self::in_region) yields a handle bound to a
/// different region over the *same* state, mirroring how a certificate
/// authority pinned to its own region still shares the account's resources.
pub struct MemoryCloud {
    pub(crate) region: String,
    pub(crate) state: Arc<RwLock<CloudState>>,
}

impl MemoryCloud {
    /// Create an empty control plane bound to `region`.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            state: Arc::new(RwLock::new(CloudState::default())),
        }
    }

    /// A handle over the same state, bound to another region.
    #[must_use]
    pub fn in_region(&self, region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            state: Arc::clone(&self.state),
        }
    }

    /// Region this handle is bound to.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Register a hosted zone, returning it. Test setup; zones are external
    /// state the provisioner itself never creates.
    pub async fn add_zone(&self, name: &str) -> HostedZone {
        let canonical = format!("{}.", normalize_domain_name(name));
        let id = zone_id();
        let zone = HostedZone {
            id: id.clone(),
            name: canonical,
        };
        let mut state = self.state.write().await;
        state.zones.insert(
            id,
            ZoneEntry {
                zone: zone.clone(),
                records: HashMap::new(),
            },
        );
        zone
    }

    /// A record currently stored in a zone, if any.
    pub async fn find_record(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Option<ZoneRecord> {
        let state = self.state.read().await;
        state
            .zones
            .get(zone_id)
            .and_then(|z| z.records.get(&(name.to_string(), record_type)))
            .cloned()
    }

    /// Snapshot of the event log.
    pub async fn events(&self) -> Vec<CloudEvent> {
        self.state.read().await.events.clone()
    }

    /// Number of state-changing writes so far.
    pub async fn mutation_count(&self) -> u64 {
        self.state.read().await.mutations
    }

    /// Number of zone lookups served so far.
    pub async fn zone_lookup_count(&self) -> u64 {
        self.state.read().await.zone_lookups
    }
}

fn zone_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("Z{}", &raw[..13])
}

pub(crate) fn resource_id(prefix: &str) -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{prefix}{}", &raw[..13])
}
