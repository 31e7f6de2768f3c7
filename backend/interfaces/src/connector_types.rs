use domain_types::{
    connector_flow::{InitPayment, Transaction},
    connector_types::{
        NotificationMessage, PaymentDetails, PaymentFlowData, PaymentInitData,
        PaymentTransactionData, RequestDetails, TransactionDetails,
    },
    errors::ConnectorError,
};

use crate::{api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2};

pub trait ConnectorServiceTrait:
    ConnectorCommon + PaymentInitV2 + PaymentTransactionV2 + IncomingNotification
{
}

pub type BoxedConnector = Box<&'static (dyn ConnectorServiceTrait + Sync)>;

pub trait PaymentInitV2:
    ConnectorIntegrationV2<InitPayment, PaymentFlowData, PaymentInitData, PaymentDetails>
{
}

pub trait PaymentTransactionV2:
    ConnectorIntegrationV2<Transaction, PaymentFlowData, PaymentTransactionData, TransactionDetails>
{
}

/// Server-to-server callbacks the gateway sends once a transaction settles.
pub trait IncomingNotification {
    fn process_notification(
        &self,
        _request: RequestDetails,
    ) -> Result<NotificationMessage, error_stack::Report<ConnectorError>> {
        Err(ConnectorError::NotificationDecodingFailed(
            "notifications are not supported by this connector".to_string(),
        )
        .into())
    }
}
