use common_utils::CustomResult;
use domain_types::{
    errors::ConnectorError, router_data::ErrorResponse, router_response_types::Response,
    types::Connectors,
};

pub trait ConnectorCommon {
    /// Name of the connector (in lowercase).
    fn id(&self) -> &'static str;

    /// HTTP `Content-Type` to be used for POST requests.
    /// Defaults to `application/json`.
    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    /// The base URL for interacting with the connector's API.
    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str;

    /// common error response for a connector if it is same in all case
    fn build_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        Ok(ErrorResponse {
            status_code: res.status_code,
            raw_connector_response: Some(String::from_utf8_lossy(&res.response).into_owned()),
            ..Default::default()
        })
    }
}
