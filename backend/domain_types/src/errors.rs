use hyperswitch_masking::Secret;

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ApiClientError {
    #[error("Header map construction failed")]
    HeaderMapConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("Client construction failed")]
    ClientConstructionFailed,
    #[error("URL encoding of request payload failed")]
    UrlEncodingFailed,
    #[error("Failed to send request to connector {0}")]
    RequestNotSent(String),
    #[error("Failed to decode response")]
    ResponseDecodingFailed,
    #[error("Server responded with Request Timeout")]
    RequestTimeoutReceived,
    #[error("Server responded with unexpected response")]
    UnexpectedServerResponse,
}

#[derive(Debug, thiserror::Error, Clone)]
pub enum ConnectorError {
    #[error("Failed to obtain integration url")]
    FailedToObtainIntegrationUrl,
    #[error("Bad response from gateway at {attempted_url}: {response:?}")]
    BadResponseFromGateway {
        response: String,
        attempted_url: String,
        attempted_params: Secret<String>,
    },
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Gateway did not respond within {timeout_ms} ms")]
    RequestTimeout { timeout_ms: u64 },
    #[error("Failed to execute a processing step: {0:?}")]
    ProcessingStepFailed(Option<String>),
    #[error("Failed to decode notification: {0}")]
    NotificationDecodingFailed(String),
}

/// Errors surfaced to callers of the payment pipe.
#[derive(Debug, thiserror::Error, Clone)]
pub enum PaymentPipeError {
    /// Missing or unusable gateway base address, raised at construction
    #[error("Invalid gateway configuration: {0}")]
    ConfigurationError(String),
    /// Empty, error-marked or unparseable gateway response
    #[error("Bad response from gateway at {attempted_url}: {response:?}")]
    GatewayProtocolError {
        response: String,
        attempted_url: String,
        attempted_params: Secret<String>,
    },
    #[error("Gateway did not respond within {timeout_ms} ms")]
    GatewayTimeoutError { timeout_ms: u64 },
    #[error("Failed to send request to gateway: {0}")]
    RequestNotSent(String),
    /// Malformed inbound notification, the callback is still acknowledged
    #[error("Failed to decode notification: {0}")]
    NotificationDecodeError(String),
}

impl From<&ConnectorError> for PaymentPipeError {
    fn from(error: &ConnectorError) -> Self {
        match error {
            ConnectorError::BadResponseFromGateway {
                response,
                attempted_url,
                attempted_params,
            } => Self::GatewayProtocolError {
                response: response.clone(),
                attempted_url: attempted_url.clone(),
                attempted_params: attempted_params.clone(),
            },
            ConnectorError::ResponseDeserializationFailed => Self::GatewayProtocolError {
                response: String::new(),
                attempted_url: String::new(),
                attempted_params: Secret::new(String::new()),
            },
            ConnectorError::RequestTimeout { timeout_ms } => Self::GatewayTimeoutError {
                timeout_ms: *timeout_ms,
            },
            ConnectorError::FailedToObtainIntegrationUrl => {
                Self::ConfigurationError(error.to_string())
            }
            ConnectorError::ProcessingStepFailed(_) => {
                Self::RequestNotSent(error.to_string())
            }
            ConnectorError::NotificationDecodingFailed(reason) => {
                Self::NotificationDecodeError(reason.clone())
            }
        }
    }
}
