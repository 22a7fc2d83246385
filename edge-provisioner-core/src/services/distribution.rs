//! Distribution composition and convergence.

use std::sync::Arc;

use url::Url;

use edge_provisioner_provider::{
    AllowedMethods, BucketSummary, CacheBehavior, CookieForwarding, CustomErrorResponse,
    DistributionConfig, DistributionSummary, GeoRestriction, IssuedCertificate, LoggingConfig,
    OriginConfig, OriginProtocolPolicy, PriceClass, SslSupportMethod, ViewerCertificate,
    ViewerProtocolPolicy,
};

use crate::error::{CoreError, CoreResult};
use crate::services::{ServiceContext, resource_gone};
use crate::types::{ApiOrigin, ContentOrigin, ResourceKind};

/// Origin id of the static content store.
const CONTENT_ORIGIN_ID: &str = "static-content";
/// Origin id of the API backend.
const API_ORIGIN_ID: &str = "api";
/// Fixed origin path prepended to API fetches.
const API_ORIGIN_PATH: &str = "/stage";
/// Path pattern routed to the API origin.
const API_PATH_PATTERN: &str = "/api/*";
/// Cache TTL ceiling for static content, in seconds.
const STATIC_MAX_TTL: u64 = 600;

/// Distribution composition and convergence service.
pub struct DistributionService {
    ctx: Arc<ServiceContext>,
}

impl DistributionService {
    /// Create a distribution service instance.
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Build the desired distribution configuration.
    ///
    /// Pure: two origins (static content over plain HTTP, API over HTTPS at
    /// the fixed origin path), a cached default behavior, an uncached
    /// `/api/*` behavior, SPA-friendly error remapping and SNI TLS binding.
    /// Accepting only an [`IssuedCertificate`] is what keeps TLS binding
    /// behind validation: there is no configuration to build until the
    /// certificate has resolved.
    pub fn compose(
        target_domain: &str,
        content: &ContentOrigin,
        api: &ApiOrigin,
        certificate: &IssuedCertificate,
        logs: &BucketSummary,
    ) -> CoreResult<DistributionConfig> {
        let api_host = Url::parse(&api.url)
            .map_err(|e| {
                CoreError::ValidationError(format!("invalid API origin URL '{}': {e}", api.url))
            })?
            .host_str()
            .ok_or_else(|| {
                CoreError::ValidationError(format!("API origin URL '{}' has no host", api.url))
            })?
            .to_string();

        Ok(DistributionConfig {
            aliases: vec![target_domain.to_string()],
            origins: vec![
                OriginConfig {
                    id: CONTENT_ORIGIN_ID.to_string(),
                    domain_name: content.website_endpoint.clone(),
                    origin_path: None,
                    protocol_policy: OriginProtocolPolicy::HttpOnly,
                    http_port: 80,
                    https_port: 443,
                    ssl_protocols: vec!["TLSv1.2".to_string()],
                },
                OriginConfig {
                    id: API_ORIGIN_ID.to_string(),
                    domain_name: api_host,
                    origin_path: Some(API_ORIGIN_PATH.to_string()),
                    protocol_policy: OriginProtocolPolicy::HttpsOnly,
                    http_port: 80,
                    https_port: 443,
                    ssl_protocols: vec!["TLSv1.2".to_string()],
                },
            ],
            default_behavior: CacheBehavior {
                path_pattern: None,
                target_origin_id: CONTENT_ORIGIN_ID.to_string(),
                viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
                allowed_methods: AllowedMethods::GetHeadOptions,
                forward_query_string: false,
                forward_cookies: CookieForwarding::None,
                min_ttl: 0,
                default_ttl: STATIC_MAX_TTL,
                max_ttl: STATIC_MAX_TTL,
            },
            ordered_behaviors: vec![CacheBehavior {
                path_pattern: Some(API_PATH_PATTERN.to_string()),
                target_origin_id: API_ORIGIN_ID.to_string(),
                viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
                allowed_methods: AllowedMethods::All,
                forward_query_string: true,
                forward_cookies: CookieForwarding::All,
                min_ttl: 0,
                default_ttl: 0,
                max_ttl: 0,
            }],
            custom_error_responses: vec![
                CustomErrorResponse {
                    error_code: 404,
                    response_code: 404,
                    response_page_path: "/404.html".to_string(),
                },
                // the content store answers 403 for unknown keys; hand those
                // to the SPA entry point instead of a hard error
                CustomErrorResponse {
                    error_code: 403,
                    response_code: 200,
                    response_page_path: "/index.html".to_string(),
                },
            ],
            price_class: PriceClass::PriceClass100,
            geo_restriction: GeoRestriction::NoRestriction,
            logging: LoggingConfig {
                bucket_domain_name: logs.domain_name.clone(),
                prefix: format!("{target_domain}/"),
                include_cookies: false,
            },
            viewer_certificate: ViewerCertificate {
                certificate_arn: certificate.arn.clone(),
                ssl_support_method: SslSupportMethod::SniOnly,
            },
            enabled: true,
            default_root_object: Some("index.html".to_string()),
        })
    }

    /// Converge the control plane on `config`.
    ///
    /// Creates the distribution when none answers for the target alias,
    /// updates it only when the live configuration differs, and touches
    /// nothing when it already matches. Failures propagate unchanged; no
    /// retries at this layer.
    pub async fn converge(
        &self,
        stack: &str,
        config: &DistributionConfig,
    ) -> CoreResult<DistributionSummary> {
        let alias = config.aliases.first().ok_or_else(|| {
            CoreError::ValidationError("distribution configuration has no alias".to_string())
        })?;

        // Prefer the distribution already answering for the alias; when the
        // target domain itself changed, fall back to the recorded one so it
        // is updated in place rather than abandoned.
        let existing = match self.ctx.cdn.find_distribution_by_alias(alias).await? {
            Some(found) => Some(found),
            None => match self
                .ctx
                .find_resource(stack, ResourceKind::Distribution)
                .await?
            {
                Some(recorded) => match self.ctx.cdn.get_distribution(&recorded.id).await {
                    Ok(found) => Some(found),
                    Err(e) if resource_gone(&e) => {
                        self.ctx
                            .remove_resource(stack, ResourceKind::Distribution, &recorded.id)
                            .await?;
                        None
                    }
                    Err(e) => return Err(e.into()),
                },
                None => None,
            },
        };

        let summary = match existing {
            Some(existing) => {
                let live = self.ctx.cdn.get_distribution_config(&existing.id).await?;
                if live == *config {
                    log::debug!("distribution {} already converged", existing.id);
                    existing
                } else {
                    log::info!("updating distribution {}", existing.id);
                    self.ctx.cdn.update_distribution(&existing.id, config).await?
                }
            }
            None => {
                let created = self.ctx.cdn.create_distribution(config).await?;
                log::info!("created distribution {} for {alias}", created.id);
                created
            }
        };
        self.ctx
            .record_resource(stack, ResourceKind::Distribution, &summary.id, alias)
            .await?;
        Ok(summary)
    }
}
