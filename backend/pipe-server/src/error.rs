#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid host for socket: {0}")]
    AddressError(#[from] std::net::AddrParseError),
    #[error("Invalid payment pipe configuration: {0}")]
    PaymentPipeError(String),
    #[error("Failed to set up the logging subsystem: {0}")]
    LoggerError(#[from] tracing_subscriber::util::TryInitError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
