use std::time::Duration;

use common_enums::{CardBrand, LiabilityShift, Outcome, PaymentInstrument};
use hyperswitch_masking::Secret;

use crate::types::Connectors;

#[derive(Debug, Clone)]
pub struct PaymentFlowData {
    pub connectors: Connectors,
    /// Upper bound on the outbound exchange, decoding is not included
    pub timeout: Duration,
}

/// Url-encoded init message produced by the caller's parameter builder
#[derive(Debug, Clone)]
pub struct PaymentInitData {
    pub params: Secret<String>,
}

/// Url-encoded payment message produced by the caller's parameter builder
#[derive(Debug, Clone)]
pub struct PaymentTransactionData {
    pub params: Secret<String>,
}

/// Session handed back by the gateway on initialization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PaymentDetails {
    pub payment_id: String,
    /// Hosted payment page, already carrying the `PaymentID` query parameter
    pub payment_page: String,
}

/// Synchronous result of a transaction request.
///
/// Fields the gateway left empty stay `None`; they are never set to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransactionDetails {
    pub result: Outcome,
    pub auth: Option<String>,
    pub reference: Option<String>,
    pub avr: Option<String>,
    pub post_date: Option<String>,
    pub trans_id: Option<String>,
    pub track_id: Option<String>,
    pub udf1: Option<String>,
    pub udf2: Option<String>,
    pub udf3: Option<String>,
    pub udf4: Option<String>,
    pub udf5: Option<String>,
}

/// Asynchronous, gateway-initiated report of a transaction's final outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NotificationMessage {
    pub payment_id: Option<String>,
    pub tran_id: Option<String>,
    pub result: Outcome,
    pub auth: Option<String>,
    pub post_date: Option<String>,
    pub track_id: Option<String>,
    pub reference: Option<String>,
    pub udf1: Option<String>,
    pub udf2: Option<String>,
    pub udf3: Option<String>,
    pub udf4: Option<String>,
    pub udf5: Option<String>,
    pub response_code: Option<String>,
    pub card_type: Option<CardBrand>,
    pub payment_instrument: Option<PaymentInstrument>,
    pub liability_shift: Option<LiabilityShift>,
    pub error: Option<String>,
    pub error_text: Option<String>,
}

/// Raw inbound callback body as received by an HTTP handler
#[derive(Debug, Clone)]
pub struct RequestDetails {
    pub body: Vec<u8>,
}

impl RequestDetails {
    pub fn from_body(body: &[u8]) -> Self {
        Self {
            body: body.to_vec(),
        }
    }
}
