/// The canonical classification of a transaction's result.
///
/// Every result token the gateway emits maps onto exactly one variant. Tokens the
/// gateway may introduce later degrade to [`Outcome::Unknown`], they are never an error.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    /// The transaction was approved
    Approved,
    /// The transaction was not approved
    NotApproved,
    /// The transaction was captured
    Captured,
    /// The transaction was not captured
    NotCaptured,
    /// The transaction was voided
    Voided,
    /// The transaction has been reversed
    Reversed,
    /// Risk management denied the transaction
    DeniedByRisk,
    /// The authorization system did not respond within its timeout limit
    HostTimeout,
    #[default]
    Unknown,
}

/// Card scheme reported in a notification.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CardBrand {
    Visa,
    Mastercard,
    AmericanExpress,
    DinersClub,
    Jcb,
}

/// How the card holder paid.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentInstrument {
    /// Card authenticated through 3-D Secure
    ThreeDsAuthenticated,
    /// Plain credit card, no cardholder authentication
    CreditCard,
}

/// Whether chargeback liability moved away from the merchant.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LiabilityShift {
    /// Merchant is protected against chargebacks
    Shifted,
    /// Merchant carries the chargeback risk
    NotShifted,
}
