//! Core data types.

mod domain;
mod stack;

pub use domain::DomainParts;
pub use stack::{
    AliasRecord, ApiOrigin, ContentOrigin, DistributionOutput, OwnedResource, ResourceKind,
    StackOutputs, StackRequest, StackState,
};
