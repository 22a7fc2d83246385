//! Stack state persistence abstraction.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::types::{OwnedResource, ResourceKind, StackState};

/// Stack State Store Trait
///
/// Persists each stack's ownership registry so that partially-created
/// resources stay discoverable across runs. Mutations are atomic per call;
/// concurrent registrations from one run must not lose entries.
///
/// A default memory implementation is provided by
/// [`InMemoryStackStateStore`].
#[async_trait]
pub trait StackStateStore: Send + Sync {
    /// Load a stack's state, `None` if the stack has never recorded anything.
    async fn load(&self, stack: &str) -> CoreResult<Option<StackState>>;

    /// Register an owned resource. Re-registering an identical (kind, id)
    /// pair is a no-op.
    async fn record(&self, stack: &str, resource: OwnedResource) -> CoreResult<()>;

    /// Forget an owned resource.
    async fn remove(&self, stack: &str, kind: ResourceKind, id: &str) -> CoreResult<()>;

    /// Drop the stack's state entirely.
    async fn clear(&self, stack: &str) -> CoreResult<()>;
}

/// In-memory stack state store
///
/// Default implementation, available on all platforms. State lives only as
/// long as the process; platform layers wanting re-entry across processes
/// supply their own persistent implementation.
#[derive(Default)]
pub struct InMemoryStackStateStore {
    states: RwLock<HashMap<String, StackState>>,
}

impl InMemoryStackStateStore {
    /// Create a new memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StackStateStore for InMemoryStackStateStore {
    async fn load(&self, stack: &str) -> CoreResult<Option<StackState>> {
        Ok(self.states.read().await.get(stack).cloned())
    }

    async fn record(&self, stack: &str, resource: OwnedResource) -> CoreResult<()> {
        let mut states = self.states.write().await;
        states
            .entry(stack.to_string())
            .or_insert_with(|| StackState::new(stack))
            .record(resource);
        Ok(())
    }

    async fn remove(&self, stack: &str, kind: ResourceKind, id: &str) -> CoreResult<()> {
        let mut states = self.states.write().await;
        if let Some(state) = states.get_mut(stack) {
            state.remove(kind, id);
        }
        Ok(())
    }

    async fn clear(&self, stack: &str) -> CoreResult<()> {
        self.states.write().await.remove(stack);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn resource(kind: ResourceKind, id: &str) -> OwnedResource {
        OwnedResource {
            kind,
            id: id.to_string(),
            label: String::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn record_and_load() {
        let store = InMemoryStackStateStore::new();
        assert!(store.load("site").await.unwrap().is_none());

        store
            .record("site", resource(ResourceKind::Certificate, "arn:1"))
            .await
            .unwrap();
        let state = store.load("site").await.unwrap().unwrap();
        assert_eq!(state.resources.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_records_are_not_lost() {
        let store = std::sync::Arc::new(InMemoryStackStateStore::new());
        let a = {
            let store = std::sync::Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .record("site", resource(ResourceKind::Certificate, "arn:1"))
                    .await
            })
        };
        let b = {
            let store = std::sync::Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .record("site", resource(ResourceKind::LogsBucket, "site-logs"))
                    .await
            })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let state = store.load("site").await.unwrap().unwrap();
        assert_eq!(state.resources.len(), 2);
    }

    #[tokio::test]
    async fn clear_drops_the_stack() {
        let store = InMemoryStackStateStore::new();
        store
            .record("site", resource(ResourceKind::Certificate, "arn:1"))
            .await
            .unwrap();
        store.clear("site").await.unwrap();
        assert!(store.load("site").await.unwrap().is_none());
    }
}
