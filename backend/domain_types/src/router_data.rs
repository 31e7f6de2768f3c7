use common_utils::consts::{NO_ERROR_CODE, NO_ERROR_MESSAGE};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub reason: Option<String>,
    pub status_code: u16,
    pub raw_connector_response: Option<String>,
}

impl Default for ErrorResponse {
    fn default() -> Self {
        Self {
            code: NO_ERROR_CODE.to_string(),
            message: NO_ERROR_MESSAGE.to_string(),
            reason: None,
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            raw_connector_response: None,
        }
    }
}
