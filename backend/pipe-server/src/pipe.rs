//! Client facade over the e24 payment gateway.
//!
//! A [`PaymentPipe`] is built once from validated connector settings and then
//! shared freely: every operation performs at most one outbound exchange and
//! keeps no state between calls.

use std::{fmt::Debug, marker::PhantomData, time::Duration};

use common_utils::{consts, CustomResult};
use connector_integration::types::{ConnectorData, ConnectorEnum};
use domain_types::{
    connector_flow::{InitPayment, Transaction},
    connector_types::{
        NotificationMessage, PaymentDetails, PaymentFlowData, PaymentInitData,
        PaymentTransactionData, RequestDetails, TransactionDetails,
    },
    errors::{ConnectorError, PaymentPipeError},
    router_data::ErrorResponse,
    router_data_v2::RouterDataV2,
    types::{ConnectorParams, Connectors, Proxy},
};
use error_stack::{report, Report};
use external_services::service::execute_connector_processing_step;
use hyperswitch_masking::Secret;
use interfaces::connector_integration_v2::BoxedConnectorIntegrationV2;

use crate::logger;

#[derive(Clone, Debug)]
pub struct PaymentPipe {
    connector_data: ConnectorData,
    connectors: Connectors,
    proxy: Proxy,
    default_timeout: Duration,
}

impl PaymentPipe {
    /// Builds a pipe for the gateway configured under `connectors.e24pipe`.
    ///
    /// Fails with [`PaymentPipeError::ConfigurationError`] when the base url is
    /// missing or is not an absolute url.
    pub fn new(connectors: &Connectors, proxy: Proxy) -> CustomResult<Self, PaymentPipeError> {
        let e24pipe = connectors
            .e24pipe
            .validate(consts::CONNECTOR_NAME)
            .map_err(|report| {
                let message = report.current_context().to_string();
                report.change_context(PaymentPipeError::ConfigurationError(message))
            })?;

        Ok(Self {
            connector_data: ConnectorData::get_connector_by_name(&ConnectorEnum::E24Pipe),
            connectors: Connectors { e24pipe },
            proxy,
            default_timeout: Duration::from_millis(consts::DEFAULT_GATEWAY_TIMEOUT_MS),
        })
    }

    /// Timeout applied to calls that do not carry their own
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn gateway(&self) -> &ConnectorParams {
        &self.connectors.e24pipe
    }

    /// Opens a payment session and returns the hosted page the shopper is sent to.
    #[logger::instrument(skip_all, fields(connector = consts::CONNECTOR_NAME))]
    pub async fn initialize_payment(
        &self,
        params: Secret<String>,
        timeout: Option<Duration>,
    ) -> CustomResult<PaymentDetails, PaymentPipeError> {
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            InitPayment,
            PaymentFlowData,
            PaymentInitData,
            PaymentDetails,
        > = self.connector_data.connector.get_connector_integration_v2();

        let router_data = RouterDataV2 {
            flow: PhantomData,
            resource_common_data: self.flow_data(timeout),
            request: PaymentInitData {
                params: params.clone(),
            },
            response: Err(ErrorResponse::default()),
        };

        let details = self
            .execute(connector_integration, router_data, &params)
            .await?;

        logger::info!(payment_id = %details.payment_id, "payment session opened");
        Ok(details)
    }

    /// Runs a transaction against the gateway and decodes its synchronous result.
    #[logger::instrument(skip_all, fields(connector = consts::CONNECTOR_NAME))]
    pub async fn execute_transaction(
        &self,
        params: Secret<String>,
        timeout: Option<Duration>,
    ) -> CustomResult<TransactionDetails, PaymentPipeError> {
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            Transaction,
            PaymentFlowData,
            PaymentTransactionData,
            TransactionDetails,
        > = self.connector_data.connector.get_connector_integration_v2();

        let router_data = RouterDataV2 {
            flow: PhantomData,
            resource_common_data: self.flow_data(timeout),
            request: PaymentTransactionData {
                params: params.clone(),
            },
            response: Err(ErrorResponse::default()),
        };

        let details = self
            .execute(connector_integration, router_data, &params)
            .await?;

        logger::info!(
            result = %details.result,
            track_id = ?details.track_id,
            "transaction executed"
        );
        Ok(details)
    }

    /// Decodes the body of a gateway-initiated notification.
    ///
    /// Never performs I/O. A failure carries the decoding diagnostic and is
    /// logged here, so callers only decide how to acknowledge the callback.
    pub fn decode_notification(
        &self,
        raw_body: &[u8],
    ) -> CustomResult<NotificationMessage, PaymentPipeError> {
        self.connector_data
            .connector
            .process_notification(RequestDetails::from_body(raw_body))
            .map_err(|report| {
                logger::error!(error = ?report, "failed to decode gateway notification");
                into_pipe_error(report)
            })
    }

    fn flow_data(&self, timeout: Option<Duration>) -> PaymentFlowData {
        PaymentFlowData {
            connectors: self.connectors.clone(),
            timeout: timeout.unwrap_or(self.default_timeout),
        }
    }

    async fn execute<F, Req, Resp>(
        &self,
        connector_integration: BoxedConnectorIntegrationV2<'_, F, PaymentFlowData, Req, Resp>,
        router_data: RouterDataV2<F, PaymentFlowData, Req, Resp>,
        params: &Secret<String>,
    ) -> CustomResult<Resp, PaymentPipeError>
    where
        F: Clone + 'static,
        Req: Clone + Debug + 'static,
        Resp: Clone + Debug + 'static,
    {
        let attempted_url = connector_integration
            .get_url(&router_data)
            .map_err(into_pipe_error)?;

        let router_data =
            execute_connector_processing_step(&self.proxy, connector_integration, router_data)
                .await
                .map_err(into_pipe_error)?;

        router_data.response.map_err(|error| {
            let status_code = error.status_code;
            logger::warn!(
                status_code,
                url = %attempted_url,
                "gateway answered with an HTTP error"
            );
            report!(PaymentPipeError::GatewayProtocolError {
                response: error.raw_connector_response.unwrap_or_default(),
                attempted_url,
                attempted_params: params.clone(),
            })
            .attach_printable(format!("Gateway answered with HTTP status {status_code}"))
        })
    }
}

fn into_pipe_error(report: Report<ConnectorError>) -> Report<PaymentPipeError> {
    let error = PaymentPipeError::from(report.current_context());
    report.change_context(error)
}
