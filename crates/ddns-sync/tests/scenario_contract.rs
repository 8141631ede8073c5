//! Contract Test: End-to-End Runs Against Local HTTP Services
//!
//! Wires the real `HttpIpResolver` and `CloudflareProvider` into a `Runner`
//! exactly as the binary does, with every echo service and the Cloudflare
//! API played by local mock servers.
//!
//! Constraints verified:
//! - Fallback to the next echo service, then no-op when content matches
//! - Changed address → one PUT against the existing record id
//! - No record → one POST
//! - All echo services failing → provider never contacted
//! - Missing configuration → no request of any kind

use ddns_core::config::SyncConfig;
use ddns_core::{Error, ExitStatus, ReconciliationResult, Result, Runner};
use ddns_ip_http::HttpIpResolver;
use ddns_provider_cloudflare::CloudflareProvider;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ZONE: &str = "023e105f4ecef8ad9ca31a8372d0c353";
const TOKEN: &str = "abcdef0123456789abcdef0123456789abcdef01";
const RECORD: &str = "home.example.com";

fn records_path() -> String {
    format!("/client/v4/zones/{}/dns_records", ZONE)
}

/// An echo service answering `/ip`, expected to be hit `calls` times
async fn echo_service(status: u16, body: &str, calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(calls)
        .mount(&server)
        .await;
    server
}

/// A Cloudflare API whose lookup returns `records`
async fn cloudflare_api(records: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(records_path()))
        .and(query_param("type", "A"))
        .and(query_param("name", RECORD))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": records
        })))
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn existing_record(id: &str, content: &str) -> serde_json::Value {
    json!({
        "id": id,
        "zone_id": ZONE,
        "name": RECORD,
        "type": "A",
        "content": content,
        "proxied": true,
        "ttl": 120
    })
}

fn write_response(id: &str, content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": existing_record(id, content)
    }))
}

async fn expect_no_writes(api: &MockServer) {
    for verb in ["POST", "PUT"] {
        Mock::given(method(verb))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(api)
            .await;
    }
}

fn service_list(services: &[&MockServer]) -> String {
    services
        .iter()
        .map(|s| format!("{}/ip", s.uri()))
        .collect::<Vec<_>>()
        .join(",")
}

fn config(vars: &[(&str, String)]) -> SyncConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    SyncConfig::from_vars(|key| vars.get(key).cloned()).unwrap()
}

fn full_config(api: &MockServer, services: &[&MockServer]) -> SyncConfig {
    config(&[
        ("CLOUDFLARE_API_TOKEN", TOKEN.to_string()),
        ("ZONE_ID", ZONE.to_string()),
        ("RECORD_NAME", RECORD.to_string()),
        ("CLOUDFLARE_API_BASE", format!("{}/client/v4", api.uri())),
        ("IP_DETECTION_SERVICES", service_list(services)),
        ("DDNS_HTTP_TIMEOUT_SECS", "5".to_string()),
    ])
}

/// Same wiring as the binary
async fn run(config: SyncConfig) -> Result<ReconciliationResult> {
    let resolver = HttpIpResolver::from_config(&config.ip_detection).unwrap();
    let provider = CloudflareProvider::from_config(
        &config.provider,
        config.mode,
        Duration::from_secs(config.ip_detection.timeout_secs),
    )
    .unwrap();

    Runner::new(config, Box::new(resolver), Box::new(provider))
        .run()
        .await
}

#[tokio::test]
async fn fallback_then_matching_record_is_noop() {
    let a = echo_service(500, "internal error", 1).await;
    let b = echo_service(200, "203.0.113.5\n", 1).await;
    let api = cloudflare_api(json!([existing_record("rec1", "203.0.113.5")])).await;
    expect_no_writes(&api).await;

    let outcome = run(full_config(&api, &[&a, &b])).await;

    assert_eq!(
        outcome.unwrap(),
        ReconciliationResult::Unchanged {
            content: "203.0.113.5".to_string()
        }
    );
}

#[tokio::test]
async fn changed_address_updates_existing_record() {
    let a = echo_service(200, "198.51.100.9", 1).await;
    let api = cloudflare_api(json!([existing_record("rec123", "198.51.100.1")])).await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/rec123", records_path())))
        .and(body_json(json!({
            "type": "A",
            "name": RECORD,
            "content": "198.51.100.9",
            "ttl": 120,
            "proxied": true
        })))
        .respond_with(write_response("rec123", "198.51.100.9"))
        .expect(1)
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api)
        .await;

    let outcome = run(full_config(&api, &[&a])).await;

    assert_eq!(
        outcome.unwrap(),
        ReconciliationResult::Updated {
            record_id: "rec123".to_string(),
            previous: "198.51.100.1".to_string(),
            current: "198.51.100.9".to_string(),
        }
    );
}

#[tokio::test]
async fn missing_record_is_created() {
    let a = echo_service(200, "192.0.2.77", 1).await;
    let api = cloudflare_api(json!([])).await;
    Mock::given(method("POST"))
        .and(path(records_path()))
        .and(body_json(json!({
            "type": "A",
            "name": RECORD,
            "content": "192.0.2.77",
            "ttl": 120,
            "proxied": true
        })))
        .respond_with(write_response("new1", "192.0.2.77"))
        .expect(1)
        .mount(&api)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api)
        .await;

    let outcome = run(full_config(&api, &[&a])).await;

    assert_eq!(
        outcome.unwrap(),
        ReconciliationResult::Created {
            content: "192.0.2.77".to_string()
        }
    );
}

#[tokio::test]
async fn all_services_failing_never_contacts_provider() {
    let a = echo_service(503, "unavailable", 1).await;
    let b = echo_service(500, "internal error", 1).await;
    let api = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api)
        .await;

    let outcome = run(full_config(&api, &[&a, &b])).await;

    assert!(matches!(outcome, Err(Error::Resolution(_))), "got {:?}", outcome);
    assert_eq!(ExitStatus::from_outcome(&outcome), ExitStatus::ResolutionError);
}

#[tokio::test]
async fn missing_configuration_makes_no_request() {
    let a = echo_service(200, "203.0.113.5", 0).await;
    let api = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api)
        .await;

    // RECORD_NAME absent
    let config = config(&[
        ("CLOUDFLARE_API_TOKEN", TOKEN.to_string()),
        ("ZONE_ID", ZONE.to_string()),
        ("CLOUDFLARE_API_BASE", format!("{}/client/v4", api.uri())),
        ("IP_DETECTION_SERVICES", service_list(&[&a])),
    ]);

    let outcome = run(config).await;

    assert!(matches!(outcome, Err(Error::Config(_))), "got {:?}", outcome);
    assert_eq!(ExitStatus::from_outcome(&outcome), ExitStatus::ConfigError);
}

#[tokio::test]
async fn dry_run_looks_up_but_sends_no_write() {
    let a = echo_service(200, "198.51.100.9", 1).await;
    let api = cloudflare_api(json!([existing_record("rec123", "198.51.100.1")])).await;
    expect_no_writes(&api).await;

    let mut config = full_config(&api, &[&a]);
    config.mode = ddns_core::config::RunMode::DryRun;

    let outcome = run(config).await;

    assert!(matches!(outcome, Ok(ReconciliationResult::Updated { .. })), "got {:?}", outcome);
}
