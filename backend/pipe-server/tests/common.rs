#![allow(dead_code)]

use domain_types::types::{ConnectorParams, Connectors, Proxy};
use hyperswitch_masking::Secret;
use pipe_server::pipe::PaymentPipe;
use wiremock::MockServer;

pub const INIT_PATH: &str = "/IPGWeb/servlet/PaymentInitHTTPServlet";
pub const TRAN_PATH: &str = "/IPGWeb/servlet/PaymentTranHTTPServlet";

pub const INIT_PARAMS: &str = "id=89025555&password=test&action=4&langid=ENG&currencycode=978\
    &amt=12.50&responseURL=https%3A%2F%2Fshop.example.com%2Fnotify&trackid=ORD-7";
pub const TRAN_PARAMS: &str =
    "id=89025555&password=test&action=5&amt=12.50&paymentid=8455230411190950&trackid=ORD-7";

/// Connector settings pointing at the mock gateway, without a trailing slash
pub fn connectors_for(server: &MockServer) -> Connectors {
    Connectors {
        e24pipe: ConnectorParams {
            base_url: format!("{}/IPGWeb", server.uri()),
        },
    }
}

/// # Panics
///
/// Will panic if the mock server address is not an absolute url
pub fn pipe_for(server: &MockServer) -> PaymentPipe {
    PaymentPipe::new(&connectors_for(server), Proxy::default())
        .expect("mock gateway url should be accepted")
}

pub fn secret(params: &str) -> Secret<String> {
    Secret::new(params.to_string())
}
