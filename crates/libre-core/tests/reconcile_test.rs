#![allow(clippy::unwrap_used)]
// Reconciliation scenarios against a wiremock LibreNMS.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use libre_core::{
    ApiErrorKind, ConnectionConfig, CoreError, DesiredState, DeviceDescriptor, QueryFilter,
    ReconcileOutcome, Reconciler, build_payload,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Reconciler) {
    let server = MockServer::start().await;
    let config =
        ConnectionConfig::new(&server.uri(), SecretString::from("token".to_string()), false)
            .unwrap();
    (server, Reconciler::new(config))
}

fn switch() -> DeviceDescriptor {
    DeviceDescriptor {
        snmpver: Some("v2c".into()),
        community: Some("public".into()),
        ..DeviceDescriptor::identified_by("192.168.1.1")
    }
}

// ── present ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_present_creates_device() {
    let (server, reconciler) = setup().await;
    let device = switch();

    let response = json!({
        "status": "ok",
        "message": "Device 192.168.1.1 (12) has been added successfully"
    });

    Mock::given(method("POST"))
        .and(path("/api/v0/devices"))
        .and(body_json(build_payload(&device)))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = reconciler
        .reconcile(DesiredState::Present, &device, &QueryFilter::new())
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::changed(response));
}

#[tokio::test]
async fn test_present_sends_all_fields() {
    let (server, reconciler) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v0/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    reconciler
        .reconcile(DesiredState::Present, &switch(), &QueryFilter::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let sent = sent.as_object().unwrap();
    assert_eq!(sent.len(), 19);
    assert_eq!(sent["hostname"], json!("192.168.1.1"));
    assert_eq!(sent["snmpver"], json!("v2c"));
    assert_eq!(sent["hardware"], Value::Null);
}

#[tokio::test]
async fn test_present_twice_converges() {
    let (server, reconciler) = setup().await;
    let device = switch();

    Mock::given(method("POST"))
        .and(path("/api/v0/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v0/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "error",
            "message": "Device 192.168.1.1 already exists"
        })))
        .mount(&server)
        .await;

    let first = reconciler
        .reconcile(DesiredState::Present, &device, &QueryFilter::new())
        .await
        .unwrap();
    let second = reconciler
        .reconcile(DesiredState::Present, &device, &QueryFilter::new())
        .await
        .unwrap();

    assert!(first.changed);
    assert_eq!(
        second,
        ReconcileOutcome::unchanged(json!("Device 192.168.1.1 already exists"))
    );
}

#[tokio::test]
async fn test_present_other_failure_propagates() {
    let (server, reconciler) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v0/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "error",
            "message": "Could not connect to 192.168.1.1, please check the snmp details and snmp reachability"
        })))
        .mount(&server)
        .await;

    let err = reconciler
        .reconcile(DesiredState::Present, &switch(), &QueryFilter::new())
        .await
        .unwrap_err();

    match err {
        CoreError::Api {
            kind,
            status,
            message,
        } => {
            assert_eq!(kind, ApiErrorKind::RemoteHttp);
            assert_eq!(status, 500);
            assert_eq!(
                message,
                "Could not connect to 192.168.1.1, please check the snmp details and snmp reachability"
            );
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_present_without_snmpver_makes_no_call() {
    let (server, reconciler) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let device = DeviceDescriptor::identified_by("192.168.1.1");
    let err = reconciler
        .reconcile(DesiredState::Present, &device, &QueryFilter::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation { .. }));
    assert!(!reconciler.client().is_connected());
}

// ── absent ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_absent_deletes_device() {
    let (server, reconciler) = setup().await;

    let response = json!({
        "status": "ok",
        "message": "Removed device 192.168.1.1"
    });

    Mock::given(method("DELETE"))
        .and(path("/api/v0/devices/192.168.1.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = reconciler
        .reconcile(
            DesiredState::Absent,
            &DeviceDescriptor::identified_by("192.168.1.1"),
            &QueryFilter::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::changed(response));
}

#[tokio::test]
async fn test_absent_twice_converges() {
    let (server, reconciler) = setup().await;
    let device = DeviceDescriptor::identified_by("192.168.1.1");

    Mock::given(method("DELETE"))
        .and(path("/api/v0/devices/192.168.1.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v0/devices/192.168.1.1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "error",
            "message": "Device 192.168.1.1 not found"
        })))
        .mount(&server)
        .await;

    let first = reconciler
        .reconcile(DesiredState::Absent, &device, &QueryFilter::new())
        .await
        .unwrap();
    let second = reconciler
        .reconcile(DesiredState::Absent, &device, &QueryFilter::new())
        .await
        .unwrap();

    assert!(first.changed);
    assert_eq!(
        second,
        ReconcileOutcome::unchanged(json!("Device 192.168.1.1 not found"))
    );
}

#[tokio::test]
async fn test_absent_other_failure_propagates() {
    let (server, reconciler) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v0/devices/192.168.1.1"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "Insufficient permissions"})),
        )
        .mount(&server)
        .await;

    let err = reconciler
        .reconcile(
            DesiredState::Absent,
            &DeviceDescriptor::identified_by("192.168.1.1"),
            &QueryFilter::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    assert_eq!(
        err.to_string(),
        "LibreNMS API error (HTTP 403): Insufficient permissions"
    );
}

#[tokio::test]
async fn test_absent_without_hostname_makes_no_call() {
    let (server, reconciler) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = reconciler
        .reconcile(DesiredState::Absent, &DeviceDescriptor::default(), &QueryFilter::new())
        .await
        .unwrap_err();

    assert!(err.is_local());
}

// ── get ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_all_devices() {
    let (server, reconciler) = setup().await;

    let response = json!({
        "status": "ok",
        "count": 1,
        "devices": [{ "device_id": 12, "hostname": "192.168.1.1" }]
    });

    Mock::given(method("GET"))
        .and(path("/api/v0/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = reconciler
        .reconcile(DesiredState::Get, &DeviceDescriptor::default(), &QueryFilter::new())
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::unchanged(response));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_get_one_device() {
    let (server, reconciler) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v0/devices/192.168.1.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "devices": [{ "device_id": 12 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = reconciler
        .reconcile(DesiredState::Get, &switch(), &QueryFilter::new())
        .await
        .unwrap();
    assert!(!outcome.changed);
}

#[tokio::test]
async fn test_get_with_filter() {
    let (server, reconciler) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v0/devices"))
        .and(query_param("type", "os"))
        .and(query_param("query", "arubaos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let filter = QueryFilter::flatten(vec![
        vec![("type", "os")],
        vec![("query", "arubaos")],
    ]);
    reconciler
        .reconcile(DesiredState::Get, &DeviceDescriptor::default(), &filter)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_failure_propagates() {
    let (server, reconciler) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v0/devices/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "error",
            "message": "Device ghost not found"
        })))
        .mount(&server)
        .await;

    let err = reconciler
        .reconcile(
            DesiredState::Get,
            &DeviceDescriptor::identified_by("ghost"),
            &QueryFilter::new(),
        )
        .await
        .unwrap_err();

    // Reads never treat "not found" as converged.
    assert_eq!(err.status_code(), Some(404));
}
