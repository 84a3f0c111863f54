//! Store client tests against a mock HTTP server.

use std::time::Duration;

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use vibe_models::{CompositionSpec, ResourceIdentifier};
use vibe_store::{StoreClient, StoreConfig, StoreError};

fn config_for(server: &MockServer) -> StoreConfig {
    StoreConfig {
        api_base_url: server.uri(),
        delivery_base_url: server.uri(),
        cloud_name: "democloud".to_string(),
        api_key: "test-key".to_string(),
        api_secret: "test-secret".to_string(),
        upload_timeout: Duration::from_secs(5),
        fetch_timeout: Duration::from_secs(5),
    }
}

/// Responds to an upload with the public_id echoed from the multipart body,
/// the way the real store confirms the identifier it filed the resource
/// under.
struct EchoPublicId;

impl Respond for EchoPublicId {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body = String::from_utf8_lossy(&request.body);
        let public_id = body
            .split("name=\"public_id\"")
            .nth(1)
            .and_then(|rest| {
                let value = rest.trim_start_matches(['\r', '\n']);
                value.split(['\r', '\n']).next()
            })
            .unwrap_or("")
            .to_string();

        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "public_id": public_id,
            "secure_url": format!("https://media.test/democloud/video/upload/{}.mp4", public_id),
        }))
    }
}

#[tokio::test]
async fn publish_confirms_requested_identifier() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/democloud/video/upload"))
        .respond_with(EchoPublicId)
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("intro.mp4");
    std::fs::write(&input, b"fake mp4 bytes").unwrap();

    let client = StoreClient::new(config_for(&server)).unwrap();
    let id = ResourceIdentifier::from_string("intro");
    let resource = client.publish(&input, &id).await.unwrap();

    assert_eq!(resource.identifier, id);
    assert!(resource.delivery_url.contains("intro"));
}

#[tokio::test]
async fn publish_is_idempotent_under_same_identifier() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/democloud/video/upload"))
        .respond_with(EchoPublicId)
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("clip.mp4");
    std::fs::write(&input, b"fake mp4 bytes").unwrap();

    let client = StoreClient::new(config_for(&server)).unwrap();
    let id = ResourceIdentifier::from_string("clip");

    // Republish under the same identifier overwrites rather than erroring.
    client.publish(&input, &id).await.unwrap();
    client.publish(&input, &id).await.unwrap();
}

#[tokio::test]
async fn publish_rejects_silent_rename() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/democloud/video/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "public_id": "something_else",
            "secure_url": "https://media.test/x.mp4",
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("intro.mp4");
    std::fs::write(&input, b"fake mp4 bytes").unwrap();

    let client = StoreClient::new(config_for(&server)).unwrap();
    let err = client
        .publish(&input, &ResourceIdentifier::from_string("intro"))
        .await
        .unwrap_err();

    match err {
        StoreError::IdentifierMismatch {
            requested,
            returned,
        } => {
            assert_eq!(requested, "intro");
            assert_eq!(returned, "something_else");
        }
        other => panic!("expected IdentifierMismatch, got {other}"),
    }
}

#[tokio::test]
async fn publish_failure_carries_transport_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/democloud/video/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("intro.mp4");
    std::fs::write(&input, b"fake mp4 bytes").unwrap();

    let client = StoreClient::new(config_for(&server)).unwrap();
    let err = client
        .publish(&input, &ResourceIdentifier::from_string("intro"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::PublishFailed(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn publish_signs_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/democloud/video/upload"))
        .and(body_string_contains("signature"))
        .and(body_string_contains("signature_algorithm"))
        .and(body_string_contains("test-key"))
        .respond_with(EchoPublicId)
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("intro.mp4");
    std::fs::write(&input, b"fake mp4 bytes").unwrap();

    let client = StoreClient::new(config_for(&server)).unwrap();
    client
        .publish(&input, &ResourceIdentifier::from_string("intro"))
        .await
        .unwrap();
}

#[tokio::test]
async fn fetch_streams_to_output_path() {
    let server = MockServer::start().await;
    let payload = vec![0xABu8; 256 * 1024];

    Mock::given(method("GET"))
        .and(path("/merged.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("merged.mp4");

    let client = StoreClient::new(config_for(&server)).unwrap();
    client
        .fetch_to_file(&format!("{}/merged.mp4", server.uri()), &out)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&out).unwrap(), payload);
    assert!(
        !dir.path().join("nested").join("merged.mp4.part").exists(),
        "partial file must be renamed away"
    );
}

#[tokio::test]
async fn fetch_non_success_is_retrieval_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/merged.m4a"))
        .respond_with(ResponseTemplate::new(423).set_body_string("format not on plan"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("merged.m4a");

    let client = StoreClient::new(config_for(&server)).unwrap();
    let err = client
        .fetch_to_file(&format!("{}/merged.m4a", server.uri()), &out)
        .await
        .unwrap_err();

    assert_eq!(err.retrieval_status(), Some(423));
    assert!(!out.exists(), "no output file on failure");
    assert!(!dir.path().join("merged.m4a.part").exists());
}

#[test]
fn delivery_url_is_pure_and_encodes_order() {
    let ids = [
        ResourceIdentifier::from_string("intro"),
        ResourceIdentifier::from_string("body"),
        ResourceIdentifier::from_string("outro"),
    ];
    let spec = CompositionSpec::from_ordered(&ids, "mp4").unwrap();
    let url = vibe_store::splice_url("https://media.test", "democloud", &spec);

    assert_eq!(
        url,
        "https://media.test/democloud/video/upload/fl_splice,l_video:body/fl_splice,l_video:outro/intro.mp4"
    );
}
