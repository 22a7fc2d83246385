//! Target-domain splitting.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A fully-qualified target domain split into its leaf subdomain and its
/// registered parent domain.
///
/// Derived and stateless; recompute with [`split`](Self::split) whenever
/// needed rather than persisting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DomainParts {
    /// Leaf subdomain, empty when the target is the registered domain itself.
    pub subdomain: String,
    /// Parent domain. Carries a trailing dot (the canonical form zone lookups
    /// expect) whenever a subdomain was split off.
    pub parent_domain: String,
}

impl DomainParts {
    /// Split a fully-qualified domain.
    ///
    /// Fails with [`CoreError::InvalidDomain`] when `domain` contains no `.`
    /// separator. With exactly two labels the whole string is the parent
    /// domain; with more, the first label becomes the subdomain and the rest
    /// are rejoined as the parent.
    pub fn split(domain: &str) -> CoreResult<Self> {
        let tokens: Vec<&str> = domain.split('.').collect();
        match tokens.as_slice() {
            [] | [_] => Err(CoreError::InvalidDomain(domain.to_string())),
            [_, _] => Ok(Self {
                subdomain: String::new(),
                parent_domain: domain.to_string(),
            }),
            [subdomain, rest @ ..] => Ok(Self {
                subdomain: (*subdomain).to_string(),
                parent_domain: format!("{}.", rest.join(".")),
            }),
        }
    }

    /// The fully-qualified domain these parts were split from.
    #[must_use]
    pub fn fqdn(&self) -> String {
        let parent = self.parent_domain.trim_end_matches('.');
        if self.subdomain.is_empty() {
            parent.to_string()
        } else {
            format!("{}.{parent}", self.subdomain)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_labels_have_no_subdomain() {
        let parts = DomainParts::split("example.com").unwrap();
        assert_eq!(parts.subdomain, "");
        assert_eq!(parts.parent_domain, "example.com");
    }

    #[test]
    fn three_labels_split_off_the_leaf() {
        let parts = DomainParts::split("www.example.com").unwrap();
        assert_eq!(parts.subdomain, "www");
        assert_eq!(parts.parent_domain, "example.com.");
    }

    #[test]
    fn deeper_subdomains_keep_the_remainder_as_parent() {
        let parts = DomainParts::split("a.b.example.com").unwrap();
        assert_eq!(parts.subdomain, "a");
        assert_eq!(parts.parent_domain, "b.example.com.");
    }

    #[test]
    fn single_label_is_rejected() {
        let err = DomainParts::split("localhost").unwrap_err();
        assert!(matches!(err, CoreError::InvalidDomain(_)));
    }

    #[test]
    fn fqdn_round_trips() {
        for domain in ["example.com", "www.example.com", "a.b.example.com"] {
            let parts = DomainParts::split(domain).unwrap();
            assert_eq!(parts.fqdn(), domain);
        }
    }
}
