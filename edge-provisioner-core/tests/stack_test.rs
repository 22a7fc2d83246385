//! End-to-end orchestration tests against the in-process control plane.

use std::sync::Arc;

use edge_provisioner_core::{
    ApiOrigin, ContentOrigin, CoreError, InMemoryStackStateStore, ServiceContext, StackConfig,
    StackRequest, StackService,
};
use edge_provisioner_provider::{
    BucketSummary, CdnApi, CertificateAuthority, CloudEvent, DnsApi, MemoryCloud, ObjectStore,
    ProviderError, RecordType,
};

struct Harness {
    cloud: Arc<MemoryCloud>,
    service: StackService,
}

fn harness() -> Harness {
    let config = StackConfig::new("eu-west-1");
    let cloud = Arc::new(MemoryCloud::new(&config.region));
    let authority = Arc::new(cloud.in_region(&config.certificate_region));
    let ctx = Arc::new(ServiceContext::new(
        cloud.clone(),
        authority,
        cloud.clone(),
        cloud.clone(),
        Arc::new(InMemoryStackStateStore::new()),
        config,
    ));
    Harness {
        cloud: cloud.clone(),
        service: StackService::new(ctx),
    }
}

fn request(domain: &str) -> StackRequest {
    StackRequest {
        name: "site".to_string(),
        target_domain: domain.to_string(),
        content_origin: ContentOrigin {
            website_endpoint: "site.s3-website.eu-west-1.amazonaws.com".to_string(),
        },
        api_origin: ApiOrigin {
            url: "https://api.example.com/prod".to_string(),
        },
        logs_target: None,
    }
}

fn event_index(events: &[CloudEvent], desc: &str, pred: impl Fn(&str) -> bool) -> usize {
    events
        .iter()
        .position(|e| pred(&e.action))
        .unwrap_or_else(|| panic!("no event matching '{desc}'"))
}

#[tokio::test]
async fn up_provisions_the_full_chain() {
    let h = harness();
    let zone = h.cloud.add_zone("example.com").await;

    let outputs = h.service.up(&request("www.example.com")).await.unwrap();

    // certificate issued in the pinned authority region, not the stack's
    assert!(outputs.certificate_arn.starts_with("arn:aws:acm:us-east-1:"));
    let detail = h
        .cloud
        .describe_certificate(&outputs.certificate_arn)
        .await
        .unwrap();
    assert_eq!(detail.domain_name, "www.example.com");

    assert!(outputs.distribution.domain_name.ends_with(".cloudfront.net"));
    assert_eq!(outputs.distribution.hosted_zone_id, "Z2FDTNDATAQYW2");

    assert_eq!(outputs.alias_record.name, "www");
    assert_eq!(outputs.alias_record.zone_id, zone.id);
    let alias = h
        .cloud
        .find_record(&zone.id, "www", RecordType::A)
        .await
        .unwrap();
    assert_eq!(
        alias.data.display_value(),
        format!("ALIAS {}", outputs.distribution.domain_name)
    );

    // default logs bucket named after the stack
    let bucket = h.cloud.find_bucket("site-logs").await.unwrap().unwrap();
    assert_eq!(bucket.domain_name, "site-logs.s3.amazonaws.com");
}

#[tokio::test]
async fn up_twice_is_idempotent() {
    let h = harness();
    h.cloud.add_zone("example.com").await;

    let first = h.service.up(&request("www.example.com")).await.unwrap();
    let mutations = h.cloud.mutation_count().await;

    let second = h.service.up(&request("www.example.com")).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(h.cloud.mutation_count().await, mutations);
}

#[tokio::test]
async fn resource_creation_follows_the_dependency_chain() {
    let h = harness();
    h.cloud.add_zone("example.com").await;
    h.service.up(&request("www.example.com")).await.unwrap();

    let events = h.cloud.events().await;
    let validation = event_index(&events, "validation record upsert", |a| {
        a.starts_with("upsert record") && a.contains("CNAME")
    });
    let issued = event_index(&events, "certificate issued", |a| {
        a.starts_with("certificate issued")
    });
    let distribution = event_index(&events, "create distribution", |a| {
        a.starts_with("create distribution")
    });
    let alias = event_index(&events, "alias upsert", |a| {
        a.starts_with("upsert record www A")
    });

    assert!(validation < issued, "challenge published before issuance");
    assert!(issued < distribution, "TLS binding after issuance");
    assert!(distribution < alias, "alias published last");
}

#[tokio::test]
async fn one_zone_lookup_serves_both_consumers() {
    let h = harness();
    h.cloud.add_zone("example.com").await;
    h.service.up(&request("www.example.com")).await.unwrap();

    // certificate provisioner and alias publisher both resolved the parent
    // domain; the memoized resolver issued a single external lookup
    assert_eq!(h.cloud.zone_lookup_count().await, 1);
}

#[tokio::test]
async fn apex_domain_publishes_at_the_zone_apex() {
    let h = harness();
    let zone = h.cloud.add_zone("example.com").await;

    let outputs = h.service.up(&request("example.com")).await.unwrap();
    assert_eq!(outputs.alias_record.name, "@");
    assert!(
        h.cloud
            .find_record(&zone.id, "@", RecordType::A)
            .await
            .is_some()
    );
}

#[tokio::test]
async fn caller_supplied_logs_target_is_used_verbatim() {
    let h = harness();
    h.cloud.add_zone("example.com").await;

    let mut req = request("www.example.com");
    req.logs_target = Some(BucketSummary {
        name: "shared-logs".to_string(),
        domain_name: "shared-logs.s3.amazonaws.com".to_string(),
    });
    h.service.up(&req).await.unwrap();

    // nothing was provisioned for logging
    let events = h.cloud.events().await;
    assert!(!events.iter().any(|e| e.action.starts_with("create bucket")));
}

#[tokio::test]
async fn missing_zone_fails_fast() {
    let h = harness();

    let err = h.service.up(&request("www.example.com")).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Provider(ProviderError::ZoneNotFound { .. })
    ));

    // nothing past the zone lookup ran
    let events = h.cloud.events().await;
    assert!(
        !events
            .iter()
            .any(|e| e.action.starts_with("request certificate"))
    );
    assert!(
        !events
            .iter()
            .any(|e| e.action.starts_with("create distribution"))
    );
}

#[tokio::test]
async fn failed_run_converges_on_retry() {
    let h = harness();

    let err = h.service.up(&request("www.example.com")).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Provider(ProviderError::ZoneNotFound { .. })
    ));
    h.cloud.add_zone("example.com").await;

    let outputs = h.service.up(&request("www.example.com")).await.unwrap();
    assert_eq!(outputs.alias_record.name, "www");
    assert!(h.cloud.find_bucket("site-logs").await.unwrap().is_some());
}

#[tokio::test]
async fn down_destroys_in_reverse_dependency_order() {
    let h = harness();
    let zone = h.cloud.add_zone("example.com").await;
    let outputs = h.service.up(&request("www.example.com")).await.unwrap();

    h.service.down("site").await.unwrap();

    // everything owned is gone
    assert!(
        h.cloud
            .find_record(&zone.id, "www", RecordType::A)
            .await
            .is_none()
    );
    assert!(
        h.cloud
            .find_distribution_by_alias("www.example.com")
            .await
            .unwrap()
            .is_none()
    );
    let err = h
        .cloud
        .describe_certificate(&outputs.certificate_arn)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::CertificateNotFound { .. }));
    assert!(h.cloud.find_bucket("site-logs").await.unwrap().is_none());

    // the referenced zone is never touched
    assert!(h.cloud.find_zone_by_name("example.com.").await.is_ok());

    // children before owners
    let events = h.cloud.events().await;
    let alias = event_index(&events, "alias delete", |a| {
        a.starts_with("delete record www A")
    });
    let distribution = event_index(&events, "distribution delete", |a| {
        a.starts_with("delete distribution")
    });
    let validation = event_index(&events, "validation record delete", |a| {
        a.starts_with("delete record") && a.contains("CNAME")
    });
    let certificate = event_index(&events, "certificate delete", |a| {
        a.starts_with("delete certificate")
    });
    let bucket = event_index(&events, "bucket delete", |a| {
        a.starts_with("delete bucket")
    });
    assert!(alias < distribution);
    assert!(distribution < validation);
    assert!(validation < certificate);
    assert!(certificate < bucket);

    // re-entrant: a second teardown finds nothing to do
    h.service.down("site").await.unwrap();
}

#[tokio::test]
async fn changing_the_target_domain_replaces_certificate_and_alias() {
    let h = harness();
    let zone = h.cloud.add_zone("example.com").await;

    let first = h.service.up(&request("www.example.com")).await.unwrap();
    let second = h.service.up(&request("app.example.com")).await.unwrap();

    // replaced, never mutated in place
    assert_ne!(first.certificate_arn, second.certificate_arn);
    let err = h
        .cloud
        .describe_certificate(&first.certificate_arn)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::CertificateNotFound { .. }));

    // the distribution is updated in place, not recreated
    assert_eq!(first.distribution.id, second.distribution.id);
    let creates = h
        .cloud
        .events()
        .await
        .iter()
        .filter(|e| e.action.starts_with("create distribution"))
        .count();
    assert_eq!(creates, 1);

    // stale alias retired, new one published
    assert!(
        h.cloud
            .find_record(&zone.id, "www", RecordType::A)
            .await
            .is_none()
    );
    assert!(
        h.cloud
            .find_record(&zone.id, "app", RecordType::A)
            .await
            .is_some()
    );
}

#[tokio::test]
async fn foreign_bucket_conflict_surfaces_verbatim() {
    let h = harness();
    h.cloud.add_zone("example.com").await;
    // someone else owns the name the stack would pick
    h.cloud.create_bucket("site-logs").await.unwrap();

    let err = h.service.up(&request("www.example.com")).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Provider(ProviderError::Conflict { .. })
    ));
}
