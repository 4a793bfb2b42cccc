//! Workflow tests against a mock ARM server
//!
//! Covers the two properties the CLI leans on: create-or-reuse (an existing
//! resource is never re-created; an absent one gets exactly one PUT) and
//! poll-until-absent (deletion confirmation stops exactly on 404 and
//! propagates any other error).

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use anfctl_core::{
    AccountHandler, ArmClient, CoreError, NETAPP_API_VERSION, StaticTokenCredential, VolumeHandler,
    workflows,
};

const RG: &str = "my-rg";
const ACCOUNT: &str = "anf-test-account";
const POOL: &str = "anf-test-pool";
const VOLUME: &str = "anf-test-volume";

fn account_path() -> String {
    format!(
        "/subscriptions/sub-123/resourceGroups/{}/providers/Microsoft.NetApp/netAppAccounts/{}",
        RG, ACCOUNT
    )
}

fn volume_path() -> String {
    format!("{}/capacityPools/{}/volumes/{}", account_path(), POOL, VOLUME)
}

fn client_for(server: &MockServer) -> ArmClient {
    ArmClient::builder()
        .base_url(server.uri())
        .subscription_id("sub-123")
        .credential(Arc::new(StaticTokenCredential::new("test-token")))
        .build()
        .expect("client builds")
}

fn account_body(state: &str) -> Value {
    json!({
        "id": account_path(),
        "name": ACCOUNT,
        "location": "westus",
        "properties": {"provisioningState": state}
    })
}

fn volume_body(state: &str) -> Value {
    json!({
        "id": volume_path(),
        "name": format!("{}/{}/{}", ACCOUNT, POOL, VOLUME),
        "location": "westus",
        "properties": {
            "creationToken": VOLUME,
            "serviceLevel": "Standard",
            "subnetId": "/subscriptions/sub-123/resourceGroups/my-rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/default",
            "usageThreshold": 107374182400i64,
            "protocolTypes": ["CIFS", "NFSv3"],
            "securityStyle": "ntfs",
            "provisioningState": state,
            "mountTargets": [
                {"ipAddress": "10.0.2.10", "smbServerFqdn": "testsmb-1a2b.testdomain.local"}
            ]
        }
    })
}

fn new_account_request() -> anfctl_core::NetAppAccount {
    serde_json::from_value(json!({
        "location": "westus",
        "properties": {
            "activeDirectories": [{
                "username": "testadmin",
                "password": "secret",
                "dns": "10.0.2.4,10.0.2.5",
                "domain": "testdomain.local",
                "smbServerName": "testsmb",
                "serverRootCACertificate": "Zm9v"
            }]
        }
    }))
    .expect("valid account body")
}

fn new_volume_request() -> anfctl_core::Volume {
    serde_json::from_value(volume_body("Creating")).expect("valid volume body")
}

fn fast() -> (Duration, Duration) {
    (Duration::from_secs(5), Duration::from_millis(5))
}

// ---------------------------------------------------------------------------
// Create-or-reuse
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ensure_account_reuses_existing_without_put() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(account_path()))
        .and(query_param("api-version", NETAPP_API_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body("Succeeded")))
        .expect(1)
        .mount(&server)
        .await;

    // The idempotence property: no create call when the resource exists
    Mock::given(method("PUT"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let handler = AccountHandler::new(client_for(&server));
    let (timeout, interval) = fast();
    let account = workflows::ensure_account_and_wait(
        &handler,
        RG,
        ACCOUNT,
        &new_account_request(),
        timeout,
        interval,
        None,
    )
    .await
    .expect("reuses existing account");

    assert_eq!(account.name.as_deref(), Some(ACCOUNT));
}

#[tokio::test]
async fn ensure_account_creates_when_absent_with_exactly_one_put() {
    let server = MockServer::start().await;

    // First GET: absent
    Mock::given(method("GET"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ResourceNotFound", "message": "not found"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(201).set_body_json(account_body("Creating")))
        .expect(1)
        .mount(&server)
        .await;

    // Poll: one Creating, then Succeeded
    Mock::given(method("GET"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body("Creating")))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body("Succeeded")))
        .mount(&server)
        .await;

    let handler = AccountHandler::new(client_for(&server));
    let (timeout, interval) = fast();
    let account = workflows::ensure_account_and_wait(
        &handler,
        RG,
        ACCOUNT,
        &new_account_request(),
        timeout,
        interval,
        None,
    )
    .await
    .expect("creates and waits");

    assert_eq!(
        account.properties.provisioning_state.as_deref(),
        Some("Succeeded")
    );
}

#[tokio::test]
async fn ensure_volume_returns_mount_targets_once_provisioned() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(volume_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ResourceNotFound", "message": "not found"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(volume_path()))
        .respond_with(ResponseTemplate::new(201).set_body_json(volume_body("Creating")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(volume_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(volume_body("Succeeded")))
        .mount(&server)
        .await;

    let handler = VolumeHandler::new(client_for(&server));
    let (timeout, interval) = fast();
    let volume = workflows::ensure_volume_and_wait(
        &handler,
        RG,
        ACCOUNT,
        POOL,
        VOLUME,
        &new_volume_request(),
        timeout,
        interval,
        None,
    )
    .await
    .expect("creates volume");

    assert_eq!(volume.properties.protocol_types, vec!["CIFS", "NFSv3"]);
    let target = &volume.properties.mount_targets[0];
    assert_eq!(target.ip_address.as_deref(), Some("10.0.2.10"));
    assert_eq!(
        target.smb_server_fqdn.as_deref(),
        Some("testsmb-1a2b.testdomain.local")
    );
}

#[tokio::test]
async fn ensure_account_propagates_non_404_get_error_without_put() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": "InternalServerError", "message": "boom"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let handler = AccountHandler::new(client_for(&server));
    let (timeout, interval) = fast();
    let result = workflows::ensure_account_and_wait(
        &handler,
        RG,
        ACCOUNT,
        &new_account_request(),
        timeout,
        interval,
        None,
    )
    .await;

    match result {
        Err(CoreError::Api { status, message, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn create_failure_carries_arm_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ResourceNotFound", "message": "not found"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "InvalidActiveDirectory",
                "message": "DNS list contains an unreachable server"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handler = AccountHandler::new(client_for(&server));
    let (timeout, interval) = fast();
    let result = workflows::ensure_account_and_wait(
        &handler,
        RG,
        ACCOUNT,
        &new_account_request(),
        timeout,
        interval,
        None,
    )
    .await;

    match result {
        Err(CoreError::Api { status, code, message }) => {
            assert_eq!(status, 400);
            assert_eq!(code, "InvalidActiveDirectory");
            assert!(message.contains("unreachable server"));
        }
        other => panic!("expected Api error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn provisioning_failed_state_aborts_the_wait() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ResourceNotFound", "message": "not found"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(201).set_body_json(account_body("Creating")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body("Failed")))
        .mount(&server)
        .await;

    let handler = AccountHandler::new(client_for(&server));
    let (timeout, interval) = fast();
    let result = workflows::ensure_account_and_wait(
        &handler,
        RG,
        ACCOUNT,
        &new_account_request(),
        timeout,
        interval,
        None,
    )
    .await;

    assert!(matches!(result, Err(CoreError::ProvisioningFailed(_))));
}

// ---------------------------------------------------------------------------
// Poll-until-absent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_volume_polls_until_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(volume_path()))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    // Resource lingers for two polls, then vanishes
    Mock::given(method("GET"))
        .and(path(volume_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(volume_body("Deleting")))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(volume_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ResourceNotFound", "message": "not found"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handler = VolumeHandler::new(client_for(&server));
    let (timeout, interval) = fast();
    workflows::delete_volume_and_wait(&handler, RG, ACCOUNT, POOL, VOLUME, timeout, interval, None)
        .await
        .expect("delete confirmed");
}

#[tokio::test]
async fn delete_confirmation_propagates_non_404_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(account_path()))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": "InternalServerError", "message": "flaky backend"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handler = AccountHandler::new(client_for(&server));
    let (timeout, interval) = fast();
    let result =
        workflows::delete_account_and_wait(&handler, RG, ACCOUNT, timeout, interval, None).await;

    assert!(matches!(result, Err(CoreError::Api { status: 500, .. })));
}
