use serde::{Deserialize, Serialize};

// ============ Zones & Records ============

/// A DNS zone managed by the external registry.
///
/// Zones are referenced, never created or destroyed, by this library.
/// `name` is stored in canonical form with a trailing dot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HostedZone {
    /// Registry-assigned zone identifier.
    pub id: String,
    /// Canonical zone name (trailing dot).
    pub name: String,
}

/// Record payload, one variant per supported record type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum RecordData {
    /// IPv4 address record.
    A {
        /// Dotted-quad address.
        address: String,
    },
    /// Canonical name record.
    Cname {
        /// Target hostname.
        target: String,
    },
    /// Text record.
    Txt {
        /// Record value.
        value: String,
    },
    /// Alias record resolving to another resource's endpoint rather than a
    /// static address. Serialized as an A record with an alias target.
    Alias {
        /// The aliased endpoint.
        target: AliasTarget,
    },
}

impl RecordData {
    /// The wire-level record type this payload is published as.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A { .. } | Self::Alias { .. } => RecordType::A,
            Self::Cname { .. } => RecordType::Cname,
            Self::Txt { .. } => RecordType::Txt,
        }
    }

    /// Human-readable value, for logs and events.
    #[must_use]
    pub fn display_value(&self) -> String {
        match self {
            Self::A { address } => address.clone(),
            Self::Cname { target } => target.clone(),
            Self::Txt { value } => value.clone(),
            Self::Alias { target } => format!("ALIAS {}", target.dns_name),
        }
    }
}

/// Wire-level DNS record types supported by the registry interface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Cname,
    Txt,
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
        };
        f.write_str(s)
    }
}

/// The endpoint an alias record resolves to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AliasTarget {
    /// DNS name of the aliased resource (e.g. a distribution endpoint).
    pub dns_name: String,
    /// Hosted zone the aliased resource lives in.
    pub hosted_zone_id: String,
    /// Whether resolution should consider the target's health.
    pub evaluate_target_health: bool,
}

/// Create-or-replace request for a single record.
///
/// Upserts are idempotent: re-submitting an identical request leaves the zone
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRecordRequest {
    /// Zone to publish into.
    pub zone_id: String,
    /// Record name relative to the zone apex; `@` for the apex itself.
    pub name: String,
    /// TTL in seconds. Alias records carry no TTL of their own.
    pub ttl: Option<u32>,
    /// Record payload.
    pub data: RecordData,
}

/// A record as stored in a zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecord {
    /// Zone the record belongs to.
    pub zone_id: String,
    /// Record name relative to the zone apex; `@` for the apex itself.
    pub name: String,
    /// TTL in seconds, absent for alias records.
    pub ttl: Option<u32>,
    /// Record payload.
    pub data: RecordData,
}

// ============ Certificates ============

/// How domain ownership is proven to the certificate authority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationMethod {
    /// Publish a challenge record under the domain's zone.
    Dns,
    /// Respond to a challenge mail sent to the domain's contacts.
    Email,
}

/// Request for a new TLS certificate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    /// Fully-qualified domain the certificate covers.
    pub domain_name: String,
    /// Ownership validation method.
    pub validation_method: ValidationMethod,
}

/// The DNS challenge the authority requires for one covered name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DomainValidationOption {
    /// Covered domain name.
    pub domain_name: String,
    /// Fully-qualified name of the challenge record.
    pub record_name: String,
    /// Record type of the challenge.
    pub record_type: RecordType,
    /// Expected challenge value.
    pub record_value: String,
}

/// A requested certificate whose validation has not yet completed.
///
/// The ARN is already assigned but must not be bound to a distribution until
/// validation succeeds and an [`IssuedCertificate`] is obtained.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingCertificate {
    /// Authority-assigned certificate identifier.
    pub arn: String,
    /// One DNS challenge per covered name, in authority order.
    pub validation_options: Vec<DomainValidationOption>,
}

/// A certificate whose domain validation has completed.
///
/// Only this type can be bound to a distribution's TLS configuration, which
/// makes "bind after validation" an ordering guarantee rather than a runtime
/// check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCertificate {
    /// Authority-assigned certificate identifier.
    pub arn: String,
}

/// Lifecycle state of a certificate at the authority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CertificateStatus {
    PendingValidation,
    Issued,
    Failed,
}

/// Point-in-time description of a certificate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDetail {
    /// Authority-assigned certificate identifier.
    pub arn: String,
    /// Domain the certificate covers.
    pub domain_name: String,
    /// Current lifecycle state.
    pub status: CertificateStatus,
}

// ============ Distributions ============

/// Hosted zone that all distribution endpoints resolve within.
///
/// Alias records targeting a distribution must reference this zone id, not
/// the zone of the aliased domain.
pub const DISTRIBUTION_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";

/// Protocol the distribution uses when fetching from an origin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OriginProtocolPolicy {
    HttpOnly,
    HttpsOnly,
    MatchViewer,
}

/// An upstream content source the distribution fetches from on cache miss.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OriginConfig {
    /// Identifier behaviors use to target this origin.
    pub id: String,
    /// Bare hostname of the origin.
    pub domain_name: String,
    /// Path prefix prepended to every origin fetch.
    pub origin_path: Option<String>,
    /// Protocol used toward the origin.
    pub protocol_policy: OriginProtocolPolicy,
    /// Plain-HTTP port.
    pub http_port: u16,
    /// TLS port.
    pub https_port: u16,
    /// TLS versions accepted toward the origin.
    pub ssl_protocols: Vec<String>,
}

/// Viewer-facing protocol policy for a behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    AllowAll,
    RedirectToHttps,
    HttpsOnly,
}

/// The HTTP method sets a behavior can accept.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AllowedMethods {
    GetHead,
    GetHeadOptions,
    All,
}

impl AllowedMethods {
    /// The concrete method names in each set.
    #[must_use]
    pub fn methods(self) -> &'static [&'static str] {
        match self {
            Self::GetHead => &["GET", "HEAD"],
            Self::GetHeadOptions => &["GET", "HEAD", "OPTIONS"],
            Self::All => &["GET", "HEAD", "OPTIONS", "PUT", "POST", "PATCH", "DELETE"],
        }
    }
}

/// Which request cookies are forwarded to the origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "forward", content = "names", rename_all = "lowercase")]
pub enum CookieForwarding {
    /// Forward no cookies (best cacheability).
    None,
    /// Forward every cookie (disables effective caching).
    All,
    /// Forward only the named cookies.
    Allowlist(Vec<String>),
}

/// A routing rule matching a path pattern to an origin with caching policy.
///
/// Ordered behaviors are evaluated in list order, first match wins; the
/// default behavior has no path pattern and catches everything else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheBehavior {
    /// Path pattern this behavior matches; `None` only on the default
    /// behavior.
    pub path_pattern: Option<String>,
    /// Origin receiving matched traffic.
    pub target_origin_id: String,
    /// Viewer-facing protocol policy.
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    /// Accepted HTTP methods.
    pub allowed_methods: AllowedMethods,
    /// Whether the query string is forwarded and part of the cache key.
    pub forward_query_string: bool,
    /// Cookie forwarding policy.
    pub forward_cookies: CookieForwarding,
    /// Minimum cache TTL in seconds.
    pub min_ttl: u64,
    /// TTL applied when the origin sends no caching headers.
    pub default_ttl: u64,
    /// Maximum cache TTL in seconds.
    pub max_ttl: u64,
}

/// Remaps an upstream error status to a fixed response page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomErrorResponse {
    /// Upstream status code being remapped.
    pub error_code: u16,
    /// Status code returned to the viewer.
    pub response_code: u16,
    /// Page served in place of the upstream body.
    pub response_page_path: String,
}

/// Edge-location pricing tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PriceClass {
    /// Least expensive tier, restricted edge coverage.
    PriceClass100,
    PriceClass200,
    PriceClassAll,
}

/// Geographic viewer restriction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "restriction", content = "countries", rename_all = "lowercase")]
pub enum GeoRestriction {
    /// Serve every geography.
    NoRestriction,
    /// Serve only the listed countries.
    Allowlist(Vec<String>),
    /// Serve everywhere except the listed countries.
    Blocklist(Vec<String>),
}

/// Access-log delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Bucket endpoint logs are written to.
    pub bucket_domain_name: String,
    /// Key prefix scoping this distribution's logs.
    pub prefix: String,
    /// Whether cookies appear in log lines.
    pub include_cookies: bool,
}

/// How the distribution presents its TLS certificate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SslSupportMethod {
    /// Server Name Indication; no dedicated addresses.
    SniOnly,
    /// Dedicated addresses per edge location.
    Vip,
}

/// TLS binding between a distribution and an issued certificate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewerCertificate {
    /// ARN of the validated certificate.
    pub certificate_arn: String,
    /// Certificate presentation mode.
    pub ssl_support_method: SslSupportMethod,
}

/// Complete desired state of a distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DistributionConfig {
    /// Alternate domain names the distribution answers for.
    pub aliases: Vec<String>,
    /// Upstream origins. Behaviors reference these by id.
    pub origins: Vec<OriginConfig>,
    /// Catch-all behavior (no path pattern).
    pub default_behavior: CacheBehavior,
    /// Path-scoped behaviors, evaluated in order before the default.
    pub ordered_behaviors: Vec<CacheBehavior>,
    /// Upstream error remappings.
    pub custom_error_responses: Vec<CustomErrorResponse>,
    /// Edge pricing tier.
    pub price_class: PriceClass,
    /// Geographic restriction, if any.
    pub geo_restriction: GeoRestriction,
    /// Access-log delivery.
    pub logging: LoggingConfig,
    /// TLS binding.
    pub viewer_certificate: ViewerCertificate,
    /// Whether the distribution accepts traffic.
    pub enabled: bool,
    /// Object served for the bare `/` request.
    pub default_root_object: Option<String>,
}

impl DistributionConfig {
    /// The behavior that handles `path`, following first-match evaluation of
    /// the ordered behaviors and falling back to the default behavior.
    #[must_use]
    pub fn behavior_for(&self, path: &str) -> &CacheBehavior {
        self.ordered_behaviors
            .iter()
            .find(|b| {
                b.path_pattern
                    .as_deref()
                    .is_some_and(|pattern| path_matches(pattern, path))
            })
            .unwrap_or(&self.default_behavior)
    }
}

/// Wildcard path matching: `*` matches any run of characters, `?` exactly
/// one.
fn path_matches(pattern: &str, path: &str) -> bool {
    fn matches(pat: &[u8], input: &[u8]) -> bool {
        match (pat.first(), input.first()) {
            (None, None) => true,
            (Some(b'*'), _) => {
                matches(&pat[1..], input)
                    || (!input.is_empty() && matches(pat, &input[1..]))
            }
            (Some(b'?'), Some(_)) => matches(&pat[1..], &input[1..]),
            (Some(p), Some(c)) if p == c => matches(&pat[1..], &input[1..]),
            _ => false,
        }
    }
    matches(pattern.as_bytes(), path.as_bytes())
}

/// Deployment state of a distribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DistributionStatus {
    InProgress,
    Deployed,
}

/// A provisioned distribution as reported by the control plane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    /// Control-plane-assigned distribution id.
    pub id: String,
    /// Endpoint the distribution serves from.
    pub domain_name: String,
    /// Zone id alias records must target (see
    /// [`DISTRIBUTION_HOSTED_ZONE_ID`]).
    pub hosted_zone_id: String,
    /// Deployment state.
    pub status: DistributionStatus,
}

// ============ Buckets ============

/// A log-storage bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    /// Bucket name.
    pub name: String,
    /// Endpoint log deliveries address the bucket by.
    pub domain_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn behavior(pattern: Option<&str>, origin: &str, default_ttl: u64) -> CacheBehavior {
        CacheBehavior {
            path_pattern: pattern.map(str::to_string),
            target_origin_id: origin.to_string(),
            viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
            allowed_methods: if pattern.is_some() {
                AllowedMethods::All
            } else {
                AllowedMethods::GetHeadOptions
            },
            forward_query_string: pattern.is_some(),
            forward_cookies: if pattern.is_some() {
                CookieForwarding::All
            } else {
                CookieForwarding::None
            },
            min_ttl: 0,
            default_ttl,
            max_ttl: default_ttl,
        }
    }

    fn config() -> DistributionConfig {
        DistributionConfig {
            aliases: vec!["www.example.com".to_string()],
            origins: vec![],
            default_behavior: behavior(None, "static-content", 600),
            ordered_behaviors: vec![behavior(Some("/api/*"), "api", 0)],
            custom_error_responses: vec![],
            price_class: PriceClass::PriceClass100,
            geo_restriction: GeoRestriction::NoRestriction,
            logging: LoggingConfig {
                bucket_domain_name: "logs.s3.amazonaws.com".to_string(),
                prefix: "www.example.com/".to_string(),
                include_cookies: false,
            },
            viewer_certificate: ViewerCertificate {
                certificate_arn: "arn:test".to_string(),
                ssl_support_method: SslSupportMethod::SniOnly,
            },
            enabled: true,
            default_root_object: Some("index.html".to_string()),
        }
    }

    #[test]
    fn api_path_hits_ordered_behavior() {
        let cfg = config();
        let b = cfg.behavior_for("/api/orders");
        assert_eq!(b.target_origin_id, "api");
        assert_eq!(b.max_ttl, 0);
        assert_eq!(b.allowed_methods.methods().len(), 7);
    }

    #[test]
    fn static_path_falls_through_to_default() {
        let cfg = config();
        let b = cfg.behavior_for("/index.html");
        assert_eq!(b.target_origin_id, "static-content");
        assert_eq!(b.default_ttl, 600);
        assert_eq!(b.forward_cookies, CookieForwarding::None);
    }

    #[test]
    fn api_root_without_trailing_segment_uses_default() {
        // "/api/*" requires at least the trailing slash
        let cfg = config();
        assert_eq!(cfg.behavior_for("/api").target_origin_id, "static-content");
        assert_eq!(cfg.behavior_for("/api/").target_origin_id, "api");
    }

    #[test]
    fn wildcard_matching() {
        assert!(path_matches("/api/*", "/api/orders/42"));
        assert!(path_matches("*", "/anything"));
        assert!(path_matches("/img/*.png", "/img/logo.png"));
        assert!(!path_matches("/img/*.png", "/img/logo.jpg"));
        assert!(path_matches("/file-?.txt", "/file-a.txt"));
        assert!(!path_matches("/file-?.txt", "/file-ab.txt"));
    }

    #[test]
    fn alias_record_data_is_type_a() {
        let data = RecordData::Alias {
            target: AliasTarget {
                dns_name: "d123.cloudfront.net".to_string(),
                hosted_zone_id: DISTRIBUTION_HOSTED_ZONE_ID.to_string(),
                evaluate_target_health: true,
            },
        };
        assert_eq!(data.record_type(), RecordType::A);
    }

    #[test]
    fn config_serde_round_trip() {
        let cfg = config();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: DistributionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
