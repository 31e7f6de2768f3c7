#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::time::{Duration, Instant};

use common_enums::Outcome;
use domain_types::{
    errors::PaymentPipeError,
    types::{ConnectorParams, Connectors, Proxy},
};
use hyperswitch_masking::PeekInterface;
use pipe_server::pipe::PaymentPipe;
use wiremock::{
    matchers::{body_string, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

mod common;

async fn gateway_answering(route: &str, status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn expect_protocol_error(
    report: &error_stack::Report<PaymentPipeError>,
) -> (&String, &String, &hyperswitch_masking::Secret<String>) {
    match report.current_context() {
        PaymentPipeError::GatewayProtocolError {
            response,
            attempted_url,
            attempted_params,
        } => (response, attempted_url, attempted_params),
        other => panic!("expected a protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_initialize_payment_returns_payment_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::INIT_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(common::INIT_PARAMS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("8455230411190950:https://ipg.example.com/hppaction"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let details = common::pipe_for(&server)
        .initialize_payment(common::secret(common::INIT_PARAMS), None)
        .await
        .expect("initialization should succeed");

    assert_eq!(details.payment_id, "8455230411190950");
    assert_eq!(
        details.payment_page,
        "https://ipg.example.com/hppaction?PaymentID=8455230411190950"
    );
}

#[tokio::test]
async fn test_initialize_payment_rejects_error_marked_response() {
    let server = gateway_answering(
        common::INIT_PATH,
        200,
        "!ERROR!-IPY0005-Invalid Brand.",
    )
    .await;

    let report = common::pipe_for(&server)
        .initialize_payment(common::secret(common::INIT_PARAMS), None)
        .await
        .expect_err("error marker should be rejected");

    let (response, attempted_url, attempted_params) = expect_protocol_error(&report);
    assert_eq!(response, "!ERROR!-IPY0005-Invalid Brand.");
    assert_eq!(
        attempted_url,
        &format!("{}{}", server.uri(), common::INIT_PATH)
    );
    assert_eq!(attempted_params.peek(), common::INIT_PARAMS);
}

#[tokio::test]
async fn test_initialize_payment_rejects_empty_and_unseparated_responses() {
    for body in ["", "8455230411190950"] {
        let server = gateway_answering(common::INIT_PATH, 200, body).await;

        let report = common::pipe_for(&server)
            .initialize_payment(common::secret(common::INIT_PARAMS), None)
            .await
            .expect_err("response should be rejected");

        let (response, _, _) = expect_protocol_error(&report);
        assert_eq!(response, body);
    }
}

#[tokio::test]
async fn test_server_error_is_a_protocol_error_carrying_the_body() {
    let server = gateway_answering(common::INIT_PATH, 500, "Internal Server Error").await;

    let report = common::pipe_for(&server)
        .initialize_payment(common::secret(common::INIT_PARAMS), None)
        .await
        .expect_err("5xx should be rejected");

    let (response, attempted_url, _) = expect_protocol_error(&report);
    assert_eq!(response, "Internal Server Error");
    assert!(attempted_url.ends_with("servlet/PaymentInitHTTPServlet"));
}

#[tokio::test]
async fn test_client_error_is_a_protocol_error() {
    let server = gateway_answering(common::TRAN_PATH, 404, "Not Found").await;

    let report = common::pipe_for(&server)
        .execute_transaction(common::secret(common::TRAN_PARAMS), None)
        .await
        .expect_err("4xx should be rejected");

    let (response, attempted_url, _) = expect_protocol_error(&report);
    assert_eq!(response, "Not Found");
    assert!(attempted_url.ends_with("servlet/PaymentTranHTTPServlet"));
}

#[tokio::test]
async fn test_execute_transaction_decodes_positional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::TRAN_PATH))
        .and(body_string(common::TRAN_PARAMS))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "CAPTURED:999999:811917104563::0411:2245230411190950:ORD-7:gift%20card::::",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let details = common::pipe_for(&server)
        .execute_transaction(common::secret(common::TRAN_PARAMS), None)
        .await
        .expect("transaction should succeed");

    assert_eq!(details.result, Outcome::Captured);
    assert_eq!(details.auth.as_deref(), Some("999999"));
    assert_eq!(details.reference.as_deref(), Some("811917104563"));
    assert_eq!(details.avr, None);
    assert_eq!(details.post_date.as_deref(), Some("0411"));
    assert_eq!(details.trans_id.as_deref(), Some("2245230411190950"));
    assert_eq!(details.track_id.as_deref(), Some("ORD-7"));
    assert_eq!(details.udf1.as_deref(), Some("gift card"));
    assert_eq!(details.udf2, None);
}

#[tokio::test]
async fn test_execute_transaction_maps_not_approved_quirk() {
    let server = gateway_answering(common::TRAN_PATH, 200, "NOT+APPROVED:::").await;

    let details = common::pipe_for(&server)
        .execute_transaction(common::secret(common::TRAN_PARAMS), None)
        .await
        .expect("transaction should decode");

    assert_eq!(details.result, Outcome::NotCaptured);
}

#[tokio::test]
async fn test_execute_transaction_rejects_error_marked_response() {
    let server = gateway_answering(
        common::TRAN_PATH,
        200,
        "!ERROR!-GW00201-Transaction not found.",
    )
    .await;

    let report = common::pipe_for(&server)
        .execute_transaction(common::secret(common::TRAN_PARAMS), None)
        .await
        .expect_err("error marker should be rejected");

    let (_, _, attempted_params) = expect_protocol_error(&report);
    assert_eq!(attempted_params.peek(), common::TRAN_PARAMS);
}

#[tokio::test]
async fn test_unresponsive_gateway_times_out_within_margin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("APPROVED:AUTH1")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let started = Instant::now();
    let report = common::pipe_for(&server)
        .execute_transaction(
            common::secret(common::TRAN_PARAMS),
            Some(Duration::from_millis(300)),
        )
        .await
        .expect_err("slow gateway should time out");
    let elapsed = started.elapsed();

    assert!(matches!(
        report.current_context(),
        PaymentPipeError::GatewayTimeoutError { timeout_ms: 300 }
    ));
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_secs(3), "took {elapsed:?}");
}

#[tokio::test]
async fn test_default_timeout_applies_when_none_given() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("1:https://page")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let report = common::pipe_for(&server)
        .with_default_timeout(Duration::from_millis(200))
        .initialize_payment(common::secret(common::INIT_PARAMS), None)
        .await
        .expect_err("slow gateway should time out");

    assert!(matches!(
        report.current_context(),
        PaymentPipeError::GatewayTimeoutError { timeout_ms: 200 }
    ));
}

#[tokio::test]
async fn test_unreachable_gateway_is_request_not_sent() {
    let connectors = Connectors {
        e24pipe: ConnectorParams {
            base_url: "http://127.0.0.1:9/IPGWeb/".to_string(),
        },
    };
    let pipe = PaymentPipe::new(&connectors, Proxy::default()).expect("url is absolute");

    let report = pipe
        .initialize_payment(
            common::secret(common::INIT_PARAMS),
            Some(Duration::from_secs(2)),
        )
        .await
        .expect_err("nothing listens on the discard port");

    assert!(matches!(
        report.current_context(),
        PaymentPipeError::RequestNotSent(_) | PaymentPipeError::GatewayTimeoutError { .. }
    ));
}

#[tokio::test]
async fn test_pipe_is_shareable_across_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::TRAN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("VOIDED:A1"))
        .expect(4)
        .mount(&server)
        .await;

    let pipe = std::sync::Arc::new(common::pipe_for(&server));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipe = std::sync::Arc::clone(&pipe);
            tokio::spawn(async move {
                pipe.execute_transaction(common::secret(common::TRAN_PARAMS), None)
                    .await
            })
        })
        .collect();

    for handle in handles {
        let details = handle
            .await
            .expect("task should not panic")
            .expect("transaction should succeed");
        assert_eq!(details.result, Outcome::Voided);
    }
}
