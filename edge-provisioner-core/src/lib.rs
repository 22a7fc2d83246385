//! Edge Provisioner Core Library
//!
//! Dependency-ordered provisioning of a CDN-fronted, TLS-secured public
//! domain: a content-delivery distribution over a static content store and
//! an API backend, a DNS-validated TLS certificate, an access-log bucket and
//! a DNS alias record, converged as one logical unit.
//!
//! The library is platform-independent: it talks to the cloud only through
//! the `edge-provisioner-provider` traits and persists its ownership
//! registry through [`StackStateStore`], both injected via
//! [`ServiceContext`]. Values that only exist once another resource has been
//! created (the zone identifier, the certificate identifier) flow through
//! the dependency chain as awaited futures; nothing polls and nothing is
//! known before its producer has resolved.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use edge_provisioner_core::{
//!     ApiOrigin, ContentOrigin, InMemoryStackStateStore, ServiceContext, StackConfig,
//!     StackRequest, StackService,
//! };
//! use edge_provisioner_provider::MemoryCloud;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StackConfig::new("us-east-1");
//!     let cloud = Arc::new(MemoryCloud::new(&config.region));
//!     cloud.add_zone("example.com").await;
//!
//!     // the certificate authority is a separate context pinned to its own
//!     // region
//!     let authority = Arc::new(cloud.in_region(&config.certificate_region));
//!     let ctx = Arc::new(ServiceContext::new(
//!         cloud.clone(),
//!         authority,
//!         cloud.clone(),
//!         cloud.clone(),
//!         Arc::new(InMemoryStackStateStore::new()),
//!         config,
//!     ));
//!
//!     let outputs = StackService::new(ctx)
//!         .up(&StackRequest {
//!             name: "site".to_string(),
//!             target_domain: "www.example.com".to_string(),
//!             content_origin: ContentOrigin {
//!                 website_endpoint: "site.s3-website.us-east-1.amazonaws.com".to_string(),
//!             },
//!             api_origin: ApiOrigin {
//!                 url: "https://api.example.com/prod".to_string(),
//!             },
//!             logs_target: None,
//!         })
//!         .await?;
//!     println!("certificate: {}", outputs.certificate_arn);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export common types
pub use config::{CERTIFICATE_REGION, StackConfig};
pub use error::{CoreError, CoreResult};
pub use services::{
    AliasService, CertificateService, DistributionService, ServiceContext, StackService,
    ZoneResolver,
};
pub use traits::{InMemoryStackStateStore, StackStateStore};
pub use types::{
    AliasRecord, ApiOrigin, ContentOrigin, DistributionOutput, DomainParts, OwnedResource,
    ResourceKind, StackOutputs, StackRequest, StackState,
};
