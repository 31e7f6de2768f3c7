pub mod transformers;

use std::time::Duration;

use common_utils::{
    consts::{self, PAYMENT_INIT_SERVLET, PAYMENT_TRAN_SERVLET, SERVLET_PATH},
    ext_traits::BytesExt,
    request::RequestContent,
    CustomResult,
};
use domain_types::{
    connector_flow::{InitPayment, Transaction},
    connector_types::{
        NotificationMessage, PaymentDetails, PaymentFlowData, PaymentInitData,
        PaymentTransactionData, RequestDetails, TransactionDetails,
    },
    errors,
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Connectors,
};
use hyperswitch_masking::Secret;
use interfaces::{
    api::ConnectorCommon,
    connector_integration_v2::ConnectorIntegrationV2,
    connector_types::{
        ConnectorServiceTrait, IncomingNotification, PaymentInitV2, PaymentTransactionV2,
    },
};
use transformers::{self as e24pipe, E24GatewayResponse, E24InitResponse};

use crate::types::ResponseRouterData;

#[derive(Clone, Debug)]
pub struct E24Pipe;

impl ConnectorServiceTrait for E24Pipe {}
impl PaymentInitV2 for E24Pipe {}
impl PaymentTransactionV2 for E24Pipe {}

impl E24Pipe {
    pub const fn new() -> &'static Self {
        &Self
    }

    fn servlet_url(&self, connectors: &Connectors, servlet: &str) -> String {
        format!("{}{SERVLET_PATH}{servlet}", self.base_url(connectors))
    }

    fn bad_response(
        response: String,
        attempted_url: String,
        attempted_params: &Secret<String>,
    ) -> errors::ConnectorError {
        tracing::warn!(url = %attempted_url, %response, "gateway answered with an unusable response");
        errors::ConnectorError::BadResponseFromGateway {
            response,
            attempted_url,
            attempted_params: attempted_params.clone(),
        }
    }
}

impl ConnectorCommon for E24Pipe {
    fn id(&self) -> &'static str {
        consts::CONNECTOR_NAME
    }

    fn common_get_content_type(&self) -> &'static str {
        consts::FORM_URL_ENCODED
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str {
        connectors.e24pipe.base_url.as_ref()
    }
}

impl ConnectorIntegrationV2<InitPayment, PaymentFlowData, PaymentInitData, PaymentDetails>
    for E24Pipe
{
    fn get_url(
        &self,
        req: &RouterDataV2<InitPayment, PaymentFlowData, PaymentInitData, PaymentDetails>,
    ) -> CustomResult<String, errors::ConnectorError> {
        Ok(self.servlet_url(&req.resource_common_data.connectors, PAYMENT_INIT_SERVLET))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<InitPayment, PaymentFlowData, PaymentInitData, PaymentDetails>,
    ) -> CustomResult<Option<RequestContent>, errors::ConnectorError> {
        Ok(Some(RequestContent::FormUrlEncoded(req.request.params.clone())))
    }

    fn get_request_timeout(
        &self,
        req: &RouterDataV2<InitPayment, PaymentFlowData, PaymentInitData, PaymentDetails>,
    ) -> Option<Duration> {
        Some(req.resource_common_data.timeout)
    }

    fn handle_response_v2(
        &self,
        data: &RouterDataV2<InitPayment, PaymentFlowData, PaymentInitData, PaymentDetails>,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<InitPayment, PaymentFlowData, PaymentInitData, PaymentDetails>,
        errors::ConnectorError,
    > {
        let raw_response = res.response.to_text_lossy();

        let response = match E24GatewayResponse::try_from(raw_response.as_str())
            .and_then(|response| E24InitResponse::try_from(&response))
        {
            Ok(response) => response,
            Err(report) => {
                let attempted_url = self.get_url(data)?;
                return Err(report.change_context(Self::bad_response(
                    raw_response,
                    attempted_url,
                    &data.request.params,
                )));
            }
        };

        RouterDataV2::try_from(ResponseRouterData {
            response,
            router_data: data.clone(),
        })
    }
}

impl
    ConnectorIntegrationV2<Transaction, PaymentFlowData, PaymentTransactionData, TransactionDetails>
    for E24Pipe
{
    fn get_url(
        &self,
        req: &RouterDataV2<Transaction, PaymentFlowData, PaymentTransactionData, TransactionDetails>,
    ) -> CustomResult<String, errors::ConnectorError> {
        Ok(self.servlet_url(&req.resource_common_data.connectors, PAYMENT_TRAN_SERVLET))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<Transaction, PaymentFlowData, PaymentTransactionData, TransactionDetails>,
    ) -> CustomResult<Option<RequestContent>, errors::ConnectorError> {
        Ok(Some(RequestContent::FormUrlEncoded(req.request.params.clone())))
    }

    fn get_request_timeout(
        &self,
        req: &RouterDataV2<Transaction, PaymentFlowData, PaymentTransactionData, TransactionDetails>,
    ) -> Option<Duration> {
        Some(req.resource_common_data.timeout)
    }

    fn handle_response_v2(
        &self,
        data: &RouterDataV2<
            Transaction,
            PaymentFlowData,
            PaymentTransactionData,
            TransactionDetails,
        >,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<Transaction, PaymentFlowData, PaymentTransactionData, TransactionDetails>,
        errors::ConnectorError,
    > {
        let raw_response = res.response.to_text_lossy();
        tracing::debug!(response = %raw_response, "transaction response from gateway");

        let response = match E24GatewayResponse::try_from(raw_response.as_str()) {
            Ok(response) => TransactionDetails::from(&response),
            Err(report) => {
                let attempted_url = self.get_url(data)?;
                return Err(report.change_context(Self::bad_response(
                    raw_response,
                    attempted_url,
                    &data.request.params,
                )));
            }
        };

        RouterDataV2::try_from(ResponseRouterData {
            response,
            router_data: data.clone(),
        })
    }
}

impl IncomingNotification for E24Pipe {
    fn process_notification(
        &self,
        request: RequestDetails,
    ) -> Result<NotificationMessage, error_stack::Report<errors::ConnectorError>> {
        let body = request
            .body
            .parse_text("NotificationBody")
            .map_err(|report| {
                let reason = report.current_context().to_string();
                report.change_context(errors::ConnectorError::NotificationDecodingFailed(reason))
            })?;

        e24pipe::parse_notification_body(&body).map_err(|report| {
            let reason = report.current_context().to_string();
            report.change_context(errors::ConnectorError::NotificationDecodingFailed(reason))
        })
    }
}
