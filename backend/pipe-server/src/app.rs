use std::{future::Future, net, sync::Arc};

use axum::{body::Bytes, extract::State, http};
use common_utils::consts;
use external_services::{metrics, service::Tag};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::oneshot,
};
use tower_http::{request_id::MakeRequestUuid, trace as tower_trace};

use crate::{configs, error::ConfigurationError, logger, pipe::PaymentPipe, utils};

/// # Panics
///
/// Will panic if signal handling fails
pub async fn server_builder(config: configs::Config) -> Result<(), ConfigurationError> {
    let server_config = config.server.clone();
    let socket_addr = net::SocketAddr::new(server_config.host.parse()?, server_config.port);

    // Signal handler
    let (tx, rx) = oneshot::channel();

    #[allow(clippy::expect_used)]
    tokio::spawn(async move {
        let mut sig_int =
            signal(SignalKind::interrupt()).expect("Failed to initialize SIGINT signal handler");
        let mut sig_term =
            signal(SignalKind::terminate()).expect("Failed to initialize SIGTERM signal handler");

        tokio::select! {
            _ = sig_int.recv() => {
                logger::info!("Received SIGINT");
            }
            _ = sig_term.recv() => {
                logger::info!("Received SIGTERM");
            }
        }

        if tx.send(()).is_err() {
            logger::warn!("Server stopped before the shutdown signal was delivered");
        }
    });

    let shutdown_signal = async {
        if rx.await.is_err() {
            logger::warn!("Shutdown signal handler dropped");
        }
        logger::info!("Shutdown signal received");
    };

    let service = Service::new(&config)?;

    logger::info!(host = %server_config.host, port = %server_config.port, "starting payment pipe server");

    service.http_server(socket_addr, shutdown_signal).await
}

pub struct Service {
    pub payment_pipe: Arc<PaymentPipe>,
}

impl Service {
    pub fn new(config: &configs::Config) -> Result<Self, ConfigurationError> {
        let payment_pipe = PaymentPipe::new(&config.connectors, config.proxy.clone())
            .map_err(|report| {
                logger::error!(error = ?report, "invalid payment pipe configuration");
                ConfigurationError::PaymentPipeError(report.current_context().to_string())
            })?
            .with_default_timeout(config.gateway.timeout());

        Ok(Self {
            payment_pipe: Arc::new(payment_pipe),
        })
    }

    pub fn router(&self) -> axum::Router {
        let logging_layer = tower_trace::TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                utils::record_fields_from_header(request)
            })
            .on_request(tower_trace::DefaultOnRequest::new().level(tracing::Level::INFO))
            .on_response(
                tower_trace::DefaultOnResponse::new()
                    .level(tracing::Level::INFO)
                    .latency_unit(tower_http::LatencyUnit::Micros),
            )
            .on_failure(
                tower_trace::DefaultOnFailure::new()
                    .latency_unit(tower_http::LatencyUnit::Micros)
                    .level(tracing::Level::ERROR),
            );

        let request_id_layer = tower_http::request_id::SetRequestIdLayer::new(
            http::HeaderName::from_static(consts::X_REQUEST_ID),
            MakeRequestUuid,
        );

        let propagate_request_id_layer = tower_http::request_id::PropagateRequestIdLayer::new(
            http::HeaderName::from_static(consts::X_REQUEST_ID),
        );

        axum::Router::new()
            .route("/health", axum::routing::get(|| async { "health is good" }))
            .route("/notification", axum::routing::post(notification))
            .with_state(Arc::clone(&self.payment_pipe))
            .layer(logging_layer)
            .layer(propagate_request_id_layer)
            .layer(request_id_layer)
    }

    pub async fn http_server(
        self,
        socket: net::SocketAddr,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ConfigurationError> {
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(socket).await?;

        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

/// Acknowledges every callback with `200 OK`; the gateway retries anything else.
async fn notification(State(payment_pipe): State<Arc<PaymentPipe>>, body: Bytes) -> http::StatusCode {
    let outcome = match payment_pipe.decode_notification(&body) {
        Ok(message) => {
            logger::info!(
                tag = ?Tag::IncomingNotification,
                payment_id = ?message.payment_id,
                tran_id = ?message.tran_id,
                track_id = ?message.track_id,
                result = %message.result,
                "gateway notification received"
            );
            "decoded"
        }
        Err(_) => "rejected",
    };

    metrics::NOTIFICATIONS_RECEIVED
        .with_label_values(&[consts::CONNECTOR_NAME, outcome])
        .inc();

    http::StatusCode::OK
}

pub async fn metrics_server_builder(config: configs::Config) -> Result<(), ConfigurationError> {
    let listener = config.metrics.tcp_listener().await?;

    let router = axum::Router::new().route(
        "/metrics",
        axum::routing::get(|| async {
            let output = metrics::metrics_handler().await;
            match output {
                Ok(metrics) => Ok(metrics),
                Err(error) => {
                    tracing::error!(?error, "Error fetching metrics");

                    Err((
                        http::StatusCode::INTERNAL_SERVER_ERROR,
                        "Error fetching metrics".to_string(),
                    ))
                }
            }
        }),
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async {
            let output = tokio::signal::ctrl_c().await;
            tracing::error!(?output, "shutting down");
        })
        .await?;

    Ok(())
}
