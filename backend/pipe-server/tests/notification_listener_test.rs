#![allow(clippy::expect_used, clippy::unwrap_used)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use pipe_server::{app, configs};
use tower::ServiceExt;

fn service() -> app::Service {
    let mut config = configs::Config::new_with_config_path(Some(
        configs::workspace_path().join("config/development.toml"),
    ))
    .expect("Failed while parsing config");
    config.connectors.e24pipe.base_url = "https://gateway.example.com/IPGWeb/".to_string();

    app::Service::new(&config).expect("service should build")
}

async fn post_notification(body: Body) -> (StatusCode, String) {
    let response = service()
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/notification")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(body)
                .unwrap(),
        )
        .await
        .expect("router is infallible");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn test_health() {
    let response = service()
        .router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    assert_eq!(&body[..], b"health is good");
}

#[tokio::test]
async fn test_valid_notification_is_acknowledged() {
    let (status, _) = post_notification(Body::from(
        "paymentid=8455230411190950&result=CAPTURED&auth=999999&trackid=ORD-7",
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_undecodable_notification_is_still_acknowledged() {
    let (status, _) = post_notification(Body::from(vec![b'r', b'=', 0xC3, 0x28])).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_notification(Body::from("udf1=%FF%FE")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_notification_endpoint_only_accepts_post() {
    let response = service()
        .router()
        .oneshot(
            Request::builder()
                .uri("/notification")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
