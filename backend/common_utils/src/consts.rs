//! Consolidated constants for the payment pipe

// =============================================================================
// Gateway Protocol
// =============================================================================

/// Path segment every gateway servlet lives under
pub const SERVLET_PATH: &str = "servlet/";
/// Servlet that opens a payment session
pub const PAYMENT_INIT_SERVLET: &str = "PaymentInitHTTPServlet";
/// Servlet that executes a transaction against an existing payment
pub const PAYMENT_TRAN_SERVLET: &str = "PaymentTranHTTPServlet";
/// Marker the gateway prefixes to failed responses
pub const GATEWAY_ERROR_MARKER: &str = "!ERROR!";
/// Separator between positional fields of a synchronous response
pub const RESPONSE_FIELD_SEPARATOR: char = ':';
/// Separator between pairs of a notification body
pub const NOTIFICATION_PAIR_SEPARATOR: char = '&';
/// Separator between key and value inside a notification pair
pub const NOTIFICATION_KEY_VALUE_SEPARATOR: char = '=';
/// Query parameter carrying the payment identifier on the payment page
pub const PAYMENT_ID_QUERY_PARAM: &str = "PaymentID";
/// Time the gateway gets to answer before the call is abandoned
pub const DEFAULT_GATEWAY_TIMEOUT_MS: u64 = 5000;

// =============================================================================
// HTTP Headers
// =============================================================================

/// Header key for request ID
pub const X_REQUEST_ID: &str = "x-request-id";
/// Content type of every outbound gateway request and inbound notification
pub const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";

// =============================================================================
// Error Messages and Codes
// =============================================================================

/// No error message string const
pub const NO_ERROR_MESSAGE: &str = "No error message";
/// No error code string const
pub const NO_ERROR_CODE: &str = "No error code";

/// Prefix of environment variables overriding configuration
pub const NAME: &str = "E24";
/// Connector name used in logs and metrics
pub const CONNECTOR_NAME: &str = "e24pipe";

// =============================================================================
// Environment and Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Development,
    Release,
}

impl Env {
    pub const fn current_env() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Release
        }
    }

    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Release => "production.toml",
        }
    }
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Release => write!(f, "release"),
        }
    }
}
