//! Integration tests for HttpService + BlockingHttpService against a real server.
//!
//! Each test spawns an in-process axum server on 127.0.0.1:0 with in-memory SQLite
//! and a scratch upload directory, then exercises the HTTP client layer through
//! the full request/response cycle.

use chrono::Utc;
use gethelp_core::{CreateHelpRequest, ImageUpload};
use gethelp_server::test_helpers::{spawn_test_server, TestServer};
use gethelp_service::{BlockingHttpService, HttpService, RequestService, ServiceError};

fn create_input(title: &str, body: &str) -> CreateHelpRequest {
    CreateHelpRequest {
        title: title.into(),
        body: body.into(),
    }
}

fn png(name: &str, data: &[u8]) -> ImageUpload {
    ImageUpload {
        original_name: name.into(),
        content_type: Some("image/png".into()),
        data: data.to_vec(),
    }
}

// ---- Async HttpService tests ----

#[tokio::test]
async fn health_check_via_http() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);
    svc.health_check().await.unwrap();
}

#[tokio::test]
async fn empty_board_lists_nothing() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);
    assert!(svc.list_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn need_food_scenario() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);

    let created = svc
        .create_request(&create_input("Need food", "Family of 4"), None)
        .await
        .unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.title, "Need food");
    assert_eq!(created.body, "Family of 4");
    assert_eq!(created.image_url, "");
    let age = Utc::now() - created.created_at;
    assert!(age.num_seconds().abs() < 5, "createdAt too far from now: {age}");

    let all = svc.list_requests().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], created);
}

#[tokio::test]
async fn image_round_trip() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);
    let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    let created = svc
        .create_request(
            &create_input("Roof leak", "Photo attached"),
            Some(png("roof.png", &data)),
        )
        .await
        .unwrap();
    assert!(created.image_url.starts_with("/uploads/"));
    assert!(created.image_url.ends_with(".png"));

    let listed = svc.list_requests().await.unwrap();
    assert_eq!(listed[0].image_url, created.image_url);

    let fetched = svc.fetch_upload(&created.image_url).await.unwrap();
    assert_eq!(&fetched[..], &data[..]);
    assert_eq!(std::fs::read_dir(&server.upload_dir).unwrap().count(), 1);
}

#[tokio::test]
async fn missing_upload_is_not_found() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);
    let err = svc
        .fetch_upload("/uploads/request-0-00000000.png")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn many_creates_list_newest_first() {
    let server = spawn_test_server().await;
    let svc = HttpService::new(&server.base_url);

    for i in 0..5 {
        svc.create_request(&create_input(&format!("request {i}"), "body"), None)
            .await
            .unwrap();
    }

    let all = svc.list_requests().await.unwrap();
    assert_eq!(all.len(), 5);
    let titles: Vec<&str> = all.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        ["request 4", "request 3", "request 2", "request 1", "request 0"]
    );
    for pair in all.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[tokio::test]
async fn missing_title_via_raw_multipart() {
    let server = spawn_test_server().await;
    let form = reqwest::multipart::Form::new().text("body", "no title here");
    let resp = reqwest::Client::new()
        .post(format!("{}/api/requests", server.base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let v: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(v["title"], "");
    assert_eq!(v["body"], "no title here");
    assert_eq!(v["imageUrl"], "");
}

#[tokio::test]
async fn cors_header_on_simple_request() {
    let server = spawn_test_server().await;
    let resp = reqwest::Client::new()
        .get(format!("{}/api/requests", server.base_url))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

// ---- BlockingHttpService tests ----

/// Run the server on its own runtime so the blocking client can own the
/// calling thread.
fn spawn_server_thread() -> TestServer {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let server = spawn_test_server().await;
            tx.send(server).unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}

#[test]
fn blocking_create_and_list() {
    let server = spawn_server_thread();
    let svc = BlockingHttpService::new(&server.base_url).unwrap();

    svc.health_check().unwrap();
    let created = svc
        .create_request(
            &create_input("Need a ride", "To the clinic on Monday"),
            Some(png("map.png", b"map bytes")),
        )
        .unwrap();
    let all = svc.list_requests().unwrap();
    assert_eq!(all, vec![created.clone()]);
    assert_eq!(&svc.fetch_upload(&created.image_url).unwrap()[..], b"map bytes");
}
