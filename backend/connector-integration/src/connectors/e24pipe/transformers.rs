use common_enums::{CardBrand, LiabilityShift, Outcome, PaymentInstrument};
use common_utils::{
    consts::{
        GATEWAY_ERROR_MARKER, NOTIFICATION_KEY_VALUE_SEPARATOR, NOTIFICATION_PAIR_SEPARATOR,
        PAYMENT_ID_QUERY_PARAM, RESPONSE_FIELD_SEPARATOR,
    },
    errors::ParsingError,
    ext_traits::StringExt,
    CustomResult,
};
use domain_types::{
    connector_flow::{InitPayment, Transaction},
    connector_types::{
        NotificationMessage, PaymentDetails, PaymentFlowData, PaymentInitData,
        PaymentTransactionData, TransactionDetails,
    },
    errors::ConnectorError,
    router_data_v2::RouterDataV2,
};
use error_stack::{report, ResultExt};

use crate::types::ResponseRouterData;

// =============================================================================
// Token vocabularies
// =============================================================================

/// Result tokens as the gateway sends them, spaces already form-encoded as `+`.
///
/// `NOT+APPROVED` lands on `NotCaptured`, not `NotApproved`. Deployed integrations
/// rely on that mapping, so it stays until the gateway vendor says otherwise.
pub const RESULT_CODES: [(&str, Outcome); 8] = [
    ("APPROVED", Outcome::Approved),
    ("NOT+APPROVED", Outcome::NotCaptured),
    ("CAPTURED", Outcome::Captured),
    ("NOT+CAPTURED", Outcome::NotCaptured),
    ("DENIED+BY+RISK", Outcome::DeniedByRisk),
    ("HOST+TIMEOUT", Outcome::HostTimeout),
    ("REVERSED", Outcome::Reversed),
    ("VOIDED", Outcome::Voided),
];

pub const CARD_BRANDS: [(&str, CardBrand); 5] = [
    ("VISA", CardBrand::Visa),
    ("MC", CardBrand::Mastercard),
    ("AMEX", CardBrand::AmericanExpress),
    ("DINERS", CardBrand::DinersClub),
    ("JCB", CardBrand::Jcb),
];

pub const PAYMENT_INSTRUMENTS: [(&str, PaymentInstrument); 2] = [
    ("VPAS", PaymentInstrument::ThreeDsAuthenticated),
    ("CC", PaymentInstrument::CreditCard),
];

pub const LIABILITY_SHIFTS: [(&str, LiabilityShift); 2] = [
    ("Y", LiabilityShift::Shifted),
    ("N", LiabilityShift::NotShifted),
];

fn lookup<T: Copy>(table: &[(&str, T)], token: &str) -> Option<T> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == token)
        .map(|(_, value)| *value)
}

/// Result token exactly as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct E24ResultCode<'a>(pub &'a str);

impl From<E24ResultCode<'_>> for Outcome {
    fn from(code: E24ResultCode<'_>) -> Self {
        lookup(&RESULT_CODES, code.0).unwrap_or_default()
    }
}

// =============================================================================
// Synchronous responses
// =============================================================================

/// Gateway answer that is non-empty, not error-marked and carries at least one `:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct E24GatewayResponse(String);

impl TryFrom<&str> for E24GatewayResponse {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        if raw.is_empty() {
            Err(report!(ConnectorError::ResponseDeserializationFailed))
                .attach_printable("Gateway returned an empty response")
        } else if raw.starts_with(GATEWAY_ERROR_MARKER) {
            Err(report!(ConnectorError::ResponseDeserializationFailed))
                .attach_printable("Gateway returned an error-marked response")
        } else if !raw.contains(RESPONSE_FIELD_SEPARATOR) {
            Err(report!(ConnectorError::ResponseDeserializationFailed))
                .attach_printable("Gateway response carries no field separator")
        } else {
            Ok(Self(raw.to_owned()))
        }
    }
}

/// `<paymentId>:<paymentPageUrl>`, split on the first colon only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct E24InitResponse {
    pub payment_id: String,
    pub payment_page: String,
}

impl TryFrom<&E24GatewayResponse> for E24InitResponse {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(response: &E24GatewayResponse) -> Result<Self, Self::Error> {
        let (payment_id, payment_page) = response
            .0
            .split_once(RESPONSE_FIELD_SEPARATOR)
            .ok_or(ConnectorError::ResponseDeserializationFailed)?;

        Ok(Self {
            payment_id: payment_id.to_owned(),
            payment_page: payment_page.to_owned(),
        })
    }
}

type TransactionField = fn(&mut TransactionDetails, String);

/// Assignments for segments 1 through 11 of a transaction response, in wire order.
/// Segment 0 is the result code and goes through [`RESULT_CODES`] instead.
const TRANSACTION_FIELDS: [TransactionField; 11] = [
    |details, value| details.auth = Some(value),
    |details, value| details.reference = Some(value),
    |details, value| details.avr = Some(value),
    |details, value| details.post_date = Some(value),
    |details, value| details.trans_id = Some(value),
    |details, value| details.track_id = Some(value),
    |details, value| details.udf1 = Some(value),
    |details, value| details.udf2 = Some(value),
    |details, value| details.udf3 = Some(value),
    |details, value| details.udf4 = Some(value),
    |details, value| details.udf5 = Some(value),
];

impl From<&E24GatewayResponse> for TransactionDetails {
    /// Never fails on field content. Escapes that do not decode to UTF-8 stay as
    /// their `%XX` text.
    fn from(response: &E24GatewayResponse) -> Self {
        let mut segments = response.0.split(RESPONSE_FIELD_SEPARATOR);
        let mut details = Self::default();

        if let Some(code) = segments.next().filter(|code| !code.is_empty()) {
            details.result = Outcome::from(E24ResultCode(code));
        }

        // Segments past the last known position are dropped by the zip.
        for (segment, assign) in segments.zip(TRANSACTION_FIELDS) {
            if !segment.is_empty() {
                assign(&mut details, segment.unescape_data_string_lenient());
            }
        }

        details
    }
}

impl
    TryFrom<
        ResponseRouterData<
            E24InitResponse,
            RouterDataV2<InitPayment, PaymentFlowData, PaymentInitData, PaymentDetails>,
        >,
    > for RouterDataV2<InitPayment, PaymentFlowData, PaymentInitData, PaymentDetails>
{
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(
        item: ResponseRouterData<
            E24InitResponse,
            RouterDataV2<InitPayment, PaymentFlowData, PaymentInitData, PaymentDetails>,
        >,
    ) -> Result<Self, Self::Error> {
        let E24InitResponse {
            payment_id,
            payment_page,
        } = item.response;

        Ok(Self {
            response: Ok(PaymentDetails {
                payment_page: format!("{payment_page}?{PAYMENT_ID_QUERY_PARAM}={payment_id}"),
                payment_id,
            }),
            ..item.router_data
        })
    }
}

impl
    TryFrom<
        ResponseRouterData<
            TransactionDetails,
            RouterDataV2<Transaction, PaymentFlowData, PaymentTransactionData, TransactionDetails>,
        >,
    > for RouterDataV2<Transaction, PaymentFlowData, PaymentTransactionData, TransactionDetails>
{
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(
        item: ResponseRouterData<
            TransactionDetails,
            RouterDataV2<Transaction, PaymentFlowData, PaymentTransactionData, TransactionDetails>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            response: Ok(item.response),
            ..item.router_data
        })
    }
}

// =============================================================================
// Notifications
// =============================================================================

type NotificationField = fn(&mut NotificationMessage, String);

/// Recognized notification keys. Matching is exact: `Error` and `ErrorText` are
/// capitalized on the wire while every other key is lowercase.
pub const NOTIFICATION_FIELDS: [(&str, NotificationField); 18] = [
    ("paymentid", |message, value| message.payment_id = Some(value)),
    ("tranid", |message, value| message.tran_id = Some(value)),
    ("result", |message, value| {
        message.result = Outcome::from(E24ResultCode(&value))
    }),
    ("auth", |message, value| message.auth = Some(value)),
    ("postdate", |message, value| message.post_date = Some(value)),
    ("trackid", |message, value| message.track_id = Some(value)),
    ("ref", |message, value| message.reference = Some(value)),
    ("udf1", |message, value| message.udf1 = Some(value)),
    ("udf2", |message, value| message.udf2 = Some(value)),
    ("udf3", |message, value| message.udf3 = Some(value)),
    ("udf4", |message, value| message.udf4 = Some(value)),
    ("udf5", |message, value| message.udf5 = Some(value)),
    ("responsecode", |message, value| {
        message.response_code = Some(value)
    }),
    ("cardtype", |message, value| {
        message.card_type = lookup(&CARD_BRANDS, &value).or(message.card_type)
    }),
    ("payinst", |message, value| {
        message.payment_instrument =
            lookup(&PAYMENT_INSTRUMENTS, &value).or(message.payment_instrument)
    }),
    ("liability", |message, value| {
        message.liability_shift = lookup(&LIABILITY_SHIFTS, &value).or(message.liability_shift)
    }),
    ("Error", |message, value| message.error = Some(value)),
    ("ErrorText", |message, value| message.error_text = Some(value)),
];

/// Decodes an `&`-joined `key=value` callback body.
///
/// Segments that do not split into exactly one key and one value are skipped, as
/// are keys outside [`NOTIFICATION_FIELDS`].
pub fn parse_notification_body(body: &str) -> CustomResult<NotificationMessage, ParsingError> {
    body.split(NOTIFICATION_PAIR_SEPARATOR).try_fold(
        NotificationMessage::default(),
        |mut message, segment| {
            let pair: Vec<&str> = segment.split(NOTIFICATION_KEY_VALUE_SEPARATOR).collect();
            let [key, value] = pair.as_slice() else {
                return Ok(message);
            };

            if let Some((_, assign)) = NOTIFICATION_FIELDS.iter().find(|(name, _)| name == key) {
                let value = value
                    .unescape_data_string()
                    .attach_printable_lazy(|| format!("Invalid escape in value of `{key}`"))?;
                assign(&mut message, value);
            }

            Ok(message)
        },
    )
}
