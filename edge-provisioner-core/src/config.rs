//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Region certificate-authority interactions are pinned to.
///
/// The CDN only accepts viewer certificates issued in this region, regardless
/// of where the rest of the stack lives.
pub const CERTIFICATE_REGION: &str = "us-east-1";

/// Explicit orchestrator configuration.
///
/// Everything the environment would otherwise supply ambiently is enumerated
/// here and passed to [`ServiceContext::new`](crate::ServiceContext::new);
/// the core reads no global state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StackConfig {
    /// Credential profile the platform layer should select, if any.
    pub profile: Option<String>,
    /// Region owned resources are provisioned in.
    pub region: String,
    /// Region the certificate authority is bound to. Distinct from
    /// [`region`](Self::region) unless the stack itself lives in
    /// [`CERTIFICATE_REGION`].
    pub certificate_region: String,
}

impl StackConfig {
    /// Configuration for a stack in `region`, with certificate operations
    /// pinned to [`CERTIFICATE_REGION`].
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            profile: None,
            region: region.into(),
            certificate_region: CERTIFICATE_REGION.to_string(),
        }
    }

    /// Select a credential profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::new(CERTIFICATE_REGION)
    }
}
