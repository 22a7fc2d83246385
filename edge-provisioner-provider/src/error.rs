use serde::{Deserialize, Serialize};

/// Unified error type for all control-plane operations.
///
/// Each variant includes a `provider` field identifying which control-plane
/// backend produced the error, plus variant-specific context. All variants are
/// serializable for structured error reporting.
///
/// None of these errors is retried by this crate. A missing zone or a
/// validation timeout points at configuration, not at a transient fault, and
/// silently retrying would mask the misconfiguration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// No hosted zone matches the requested name.
    ///
    /// The zone is external configuration owned by the DNS registry; callers
    /// must fix their setup rather than retry.
    ZoneNotFound {
        /// Backend that produced the error.
        provider: String,
        /// Zone name that was looked up.
        domain: String,
        /// Original error message from the backend, if available.
        raw_message: Option<String>,
    },

    /// The specified record does not exist in the zone.
    RecordNotFound {
        /// Backend that produced the error.
        provider: String,
        /// Zone the record was looked up in.
        zone_id: String,
        /// Name of the record that was not found.
        record_name: String,
    },

    /// The specified certificate does not exist.
    CertificateNotFound {
        /// Backend that produced the error.
        provider: String,
        /// ARN of the certificate that was not found.
        arn: String,
    },

    /// The specified distribution does not exist.
    DistributionNotFound {
        /// Backend that produced the error.
        provider: String,
        /// ID of the distribution that was not found.
        distribution_id: String,
    },

    /// The specified bucket does not exist.
    BucketNotFound {
        /// Backend that produced the error.
        provider: String,
        /// Name of the bucket that was not found.
        bucket: String,
    },

    /// A create/update was rejected because a conflicting resource exists.
    ///
    /// Surfaced verbatim; the conflicting resource is not owned by the caller
    /// and must be resolved out of band.
    Conflict {
        /// Backend that produced the error.
        provider: String,
        /// Kind of resource that conflicted (e.g. `bucket`, `distribution`).
        resource: String,
        /// Description of the conflict.
        detail: String,
    },

    /// The certificate authority never confirmed the DNS challenge.
    ///
    /// Usually means the validation record is not publicly visible where the
    /// authority looked for it.
    ValidationTimeout {
        /// Backend that produced the error.
        provider: String,
        /// Domain whose validation did not complete.
        domain: String,
        /// How long the authority waited, in seconds, if known.
        waited_secs: Option<u64>,
    },

    /// A request parameter is invalid (e.g. malformed record data).
    InvalidParameter {
        /// Backend that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// A network-level error occurred (DNS resolution failure, connection
    /// refused, etc.).
    NetworkError {
        /// Backend that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// An unrecognized error from the backend.
    ///
    /// This is a catch-all for error codes not yet mapped to a specific
    /// variant.
    Unknown {
        /// Backend that produced the error.
        provider: String,
        /// Raw error code from the backend, if available.
        raw_code: Option<String>,
        /// Raw error message from the backend.
        raw_message: String,
    },
}

impl ProviderError {
    /// Whether the error is expected behavior (bad input, resource absent,
    /// conflicting external state), used for log level classification.
    ///
    /// Log at `warn` when this returns `true` and at `error` otherwise.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::ZoneNotFound { .. }
                | Self::RecordNotFound { .. }
                | Self::CertificateNotFound { .. }
                | Self::DistributionNotFound { .. }
                | Self::BucketNotFound { .. }
                | Self::Conflict { .. }
                | Self::InvalidParameter { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZoneNotFound {
                provider,
                domain,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Zone '{domain}' not found: {msg}")
                } else {
                    write!(f, "[{provider}] Zone '{domain}' not found")
                }
            }
            Self::RecordNotFound {
                provider,
                zone_id,
                record_name,
            } => {
                write!(
                    f,
                    "[{provider}] Record '{record_name}' not found in zone '{zone_id}'"
                )
            }
            Self::CertificateNotFound { provider, arn } => {
                write!(f, "[{provider}] Certificate '{arn}' not found")
            }
            Self::DistributionNotFound {
                provider,
                distribution_id,
            } => {
                write!(f, "[{provider}] Distribution '{distribution_id}' not found")
            }
            Self::BucketNotFound { provider, bucket } => {
                write!(f, "[{provider}] Bucket '{bucket}' not found")
            }
            Self::Conflict {
                provider,
                resource,
                detail,
            } => {
                write!(f, "[{provider}] Conflicting {resource}: {detail}")
            }
            Self::ValidationTimeout {
                provider,
                domain,
                waited_secs,
            } => {
                if let Some(secs) = waited_secs {
                    write!(
                        f,
                        "[{provider}] Validation for '{domain}' not confirmed after {secs}s"
                    )
                } else {
                    write!(f, "[{provider}] Validation for '{domain}' not confirmed")
                }
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
