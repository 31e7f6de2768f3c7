use std::{
    collections::HashMap,
    str::FromStr,
    sync::Mutex,
    time::Duration,
};

use common_utils::{
    request::{Headers, Method, Request, RequestContent},
    CustomResult,
};
use domain_types::{
    errors::{ApiClientError, ConnectorError},
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Proxy,
};
use error_stack::{report, ResultExt};
use hyperswitch_masking::{ExposeInterface, Maskable};
use interfaces::connector_integration_v2::BoxedConnectorIntegrationV2;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{field::Empty, Instrument};

use crate::metrics;

/// Sends the request a connector builds for `router_data` and lets the connector
/// turn the gateway's answer back into router data.
///
/// 4xx and 5xx answers are not errors at this level: the connector's error
/// response lands in `router_data.response` and the caller decides what to make
/// of it. Transport failures, timeouts included, come back as `Err`.
pub async fn execute_connector_processing_step<F, ResourceCommonData, Req, Resp>(
    proxy: &Proxy,
    connector: BoxedConnectorIntegrationV2<'_, F, ResourceCommonData, Req, Resp>,
    router_data: RouterDataV2<F, ResourceCommonData, Req, Resp>,
) -> CustomResult<RouterDataV2<F, ResourceCommonData, Req, Resp>, ConnectorError>
where
    F: Clone + 'static,
    Req: Clone + 'static + std::fmt::Debug,
    Resp: Clone + 'static + std::fmt::Debug,
    ResourceCommonData: Clone + 'static,
{
    let span = tracing::info_span!(
        "outgoing_gateway_call",
        connector = connector.id(),
        request_headers = Empty,
        request_body = Empty,
        status_code = Empty,
        latency = Empty,
        method = Empty,
        url = Empty,
    );
    let start = tokio::time::Instant::now();
    let connector_request = connector.build_request_v2(&router_data)?;

    let Some(request) = connector_request else {
        return Ok(router_data);
    };

    let masked_headers = request
        .headers
        .iter()
        .fold(serde_json::Map::new(), |mut acc, (k, v)| {
            let value = match v {
                Maskable::Masked(_) => Value::String("*** alloc::string::String ***".to_string()),
                Maskable::Normal(iv) => Value::String(iv.to_owned()),
            };
            acc.insert(k.clone(), value);
            acc
        });
    if let Some(RequestContent::FormUrlEncoded(body)) = request.body.as_ref() {
        span.record("request_body", tracing::field::debug(body));
    }
    span.record(
        "request_headers",
        tracing::field::display(Value::Object(masked_headers)),
    );

    let url = request.url.clone();
    let endpoint = url.rsplit('/').next().unwrap_or_default().to_string();
    let timeout = request.timeout;
    span.record("url", tracing::field::display(&url));
    span.record("method", tracing::field::display(request.method));

    metrics::GATEWAY_TOTAL_API_CALLS
        .with_label_values(&[endpoint.as_str(), connector.id()])
        .inc();

    let response = call_connector_api(proxy, request)
        .instrument(span.clone())
        .await;
    let elapsed = start.elapsed();
    metrics::GATEWAY_API_CALLS_LATENCY
        .with_label_values(&[endpoint.as_str(), connector.id()])
        .observe(elapsed.as_secs_f64());
    span.record("latency", duration_millis(elapsed));

    let result = match response {
        Ok(Ok(body)) => {
            span.record("status_code", body.status_code);
            span.in_scope(|| connector.handle_response_v2(&router_data, body))
        }
        Ok(Err(body)) => {
            span.record("status_code", body.status_code);
            let error = match body.status_code {
                500..=599 => connector.get_5xx_error_response(body)?,
                _ => connector.get_error_response_v2(body)?,
            };
            let mut router_data = router_data;
            router_data.response = Err(error);
            Ok(router_data)
        }
        Err(err) => {
            let api_error = err.current_context().clone();
            metrics::GATEWAY_API_CALLS_ERRORS
                .with_label_values(&[
                    endpoint.as_str(),
                    connector.id(),
                    api_error.to_string().as_str(),
                ])
                .inc();
            span.in_scope(|| {
                info_log(
                    "NETWORK_ERROR",
                    &json!(format!("Failed getting response from gateway. Error: {err:?}")),
                )
            });
            Err(match (api_error, timeout) {
                (ApiClientError::RequestTimeoutReceived, Some(timeout)) => {
                    err.change_context(ConnectorError::RequestTimeout {
                        timeout_ms: duration_millis(timeout),
                    })
                }
                (api_error, _) => err.change_context(ConnectorError::ProcessingStepFailed(Some(
                    api_error.to_string(),
                ))),
            })
        }
    };

    span.in_scope(|| {
        tracing::info!(tag = ?Tag::OutgoingApi, log_type = "api", "Outgoing Request completed")
    });
    result
}

/// Performs the HTTP exchange for an already built request.
///
/// Returns `Ok(Ok(_))` for 2xx and 302 answers, `Ok(Err(_))` for 4xx and 5xx
/// answers, and `Err` when no usable answer was received.
pub async fn call_connector_api(
    proxy: &Proxy,
    request: Request,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    let should_bypass_proxy = proxy.bypass_proxy_urls.contains(&url.to_string());

    let client = create_client(proxy, should_bypass_proxy)?;

    let headers = request.headers.construct_header_map()?;

    let mut request_builder = match (request.method, request.body) {
        (Method::Post, Some(RequestContent::FormUrlEncoded(payload))) => {
            client.post(url).body(payload.expose())
        }
        (Method::Post, None) => client.post(url),
    }
    .add_headers(headers);

    if let Some(timeout) = request.timeout {
        request_builder = request_builder.timeout(timeout);
    }

    let response = request_builder.send().await.map_err(|error| {
        let api_error = classify_transport_error(&error);
        info_log(
            "REQUEST_FAILURE",
            &json!(format!("Unable to send request to gateway. Error: {error}")),
        );
        report!(api_error)
    });

    handle_response(response).await
}

fn classify_transport_error(error: &reqwest::Error) -> ApiClientError {
    if error.is_timeout() {
        ApiClientError::RequestTimeoutReceived
    } else {
        ApiClientError::RequestNotSent(error.to_string())
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

pub fn create_client(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<Client, ApiClientError> {
    get_base_client(proxy_config, should_bypass_proxy)
}

/// Proxy settings a base client was built with
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ClientKey {
    http_url: Option<String>,
    https_url: Option<String>,
    idle_pool_connection_timeout: Option<u64>,
}

impl ClientKey {
    fn new(proxy_config: &Proxy, should_bypass_proxy: bool) -> Self {
        let (http_url, https_url) = if should_bypass_proxy {
            (None, None)
        } else {
            (proxy_config.http_url.clone(), proxy_config.https_url.clone())
        };

        Self {
            http_url,
            https_url,
            idle_pool_connection_timeout: proxy_config.idle_pool_connection_timeout,
        }
    }
}

/// Base clients shared by every pipe in the process, one per distinct proxy setup.
static BASE_CLIENTS: Lazy<Mutex<HashMap<ClientKey, Client>>> = Lazy::new(Default::default);

fn get_base_client(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<Client, ApiClientError> {
    let key = ClientKey::new(proxy_config, should_bypass_proxy);

    let mut clients = BASE_CLIENTS
        .lock()
        .map_err(|_| report!(ApiClientError::ClientConstructionFailed))
        .attach_printable("Base client cache lock is poisoned")?;

    if let Some(client) = clients.get(&key) {
        return Ok(client.clone());
    }

    let client = get_client_builder(proxy_config, should_bypass_proxy)?
        .build()
        .change_context(ApiClientError::ClientConstructionFailed)
        .inspect_err(|err| {
            error_log(
                "ERROR",
                &json!(format!("Failed to construct base client. Error: {:?}", err)),
            );
        })?;

    clients.insert(key, client.clone());
    Ok(client)
}

fn get_client_builder(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if should_bypass_proxy {
        return Ok(client_builder);
    }

    // Proxy all HTTPS traffic through the configured HTTPS proxy
    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    error_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTPS proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    // Proxy all HTTP traffic through the configured HTTP proxy
    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    error_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTP proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    Ok(client_builder)
}

async fn read_body(resp: reqwest::Response) -> CustomResult<bytes::Bytes, ApiClientError> {
    resp.bytes().await.map_err(|error| {
        let api_error = if error.is_timeout() {
            ApiClientError::RequestTimeoutReceived
        } else {
            ApiClientError::ResponseDecodingFailed
        };
        report!(error).change_context(api_error)
    })
}

async fn handle_response(
    response: CustomResult<reqwest::Response, ApiClientError>,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let resp = response?;
    let status_code = resp.status().as_u16();
    let headers = Some(resp.headers().to_owned());

    match status_code {
        200..=202 | 302 | 204 => {
            let response = read_body(resp).await?;
            debug_log(
                "GATEWAY_RESPONSE",
                &json!({ "status_code": status_code, "length": response.len() }),
            );
            Ok(Ok(Response {
                headers,
                response,
                status_code,
            }))
        }
        400..=599 => {
            let response = read_body(resp).await?;
            warn_log(
                "GATEWAY_ERROR_RESPONSE",
                &json!({ "status_code": status_code }),
            );
            Ok(Err(Response {
                headers,
                response,
                status_code,
            }))
        }
        _ => {
            warn_log(
                "UNEXPECTED_RESPONSE",
                &json!(format!("Unexpected response from server. Status: {status_code}")),
            );
            Err(report!(ApiClientError::UnexpectedServerResponse))
        }
    }
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let header_value = header_value.into_inner();
                let header_value = HeaderValue::from_str(&header_value)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

pub(super) trait RequestBuilderExt {
    fn add_headers(self, headers: reqwest::header::HeaderMap) -> Self;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn add_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self = self.headers(headers);
        self
    }
}

#[derive(Debug, serde::Deserialize, Clone, strum::EnumString)]
pub enum Tag {
    /// Notification posted by the gateway
    IncomingNotification,
    /// Api Outgoing Request
    OutgoingApi,
}

#[inline]
pub fn debug_log(action: &str, message: &Value) {
    tracing::debug!(tags = %action, json_value= %message);
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}

#[inline]
pub fn error_log(action: &str, message: &Value) {
    tracing::error!(tags = %action, json_value= %message);
}

#[inline]
pub fn warn_log(action: &str, message: &Value) {
    tracing::warn!(tags = %action, json_value= %message);
}

#[cfg(test)]
mod tests {
    use common_utils::request::RequestBuilder;
    use hyperswitch_masking::Secret;
    use wiremock::{
        matchers::{body_string, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn form_request(url: String, body: &str) -> Request {
        RequestBuilder::new()
            .method(Method::Post)
            .url(&url)
            .header("Content-Type", common_utils::consts::FORM_URL_ENCODED)
            .set_optional_body(Some(RequestContent::FormUrlEncoded(Secret::new(
                body.to_string(),
            ))))
            .timeout(Duration::from_millis(500))
            .build()
    }

    #[tokio::test]
    async fn posts_form_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/servlet/PaymentInitHTTPServlet"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("id=1&amt=5.00"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1:https://pay"))
            .expect(1)
            .mount(&server)
            .await;

        let request = form_request(
            format!("{}/servlet/PaymentInitHTTPServlet", server.uri()),
            "id=1&amt=5.00",
        );
        let response = call_connector_api(&Proxy::default(), request)
            .await
            .expect("gateway should answer")
            .expect("answer should be a success");

        assert_eq!(response.status_code, 200);
        assert_eq!(response.response.to_vec(), b"1:https://pay".to_vec());
    }

    #[tokio::test]
    async fn server_errors_are_returned_as_error_responses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let request = form_request(format!("{}/servlet/x", server.uri()), "a=b");
        let response = call_connector_api(&Proxy::default(), request)
            .await
            .expect("gateway should answer");

        let Err(response) = response else {
            panic!("expected an error response");
        };
        assert_eq!(response.status_code, 503);
        assert_eq!(response.response.to_vec(), b"maintenance".to_vec());
    }

    #[tokio::test]
    async fn slow_gateway_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late:answer")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let request = form_request(format!("{}/servlet/x", server.uri()), "a=b");
        let report = call_connector_api(&Proxy::default(), request)
            .await
            .expect_err("request should time out");

        assert_eq!(
            report.current_context(),
            &ApiClientError::RequestTimeoutReceived
        );
    }

    #[tokio::test]
    async fn unreachable_gateway_is_request_not_sent() {
        let request = form_request("http://127.0.0.1:9/servlet/x".to_string(), "a=b");
        let report = call_connector_api(&Proxy::default(), request)
            .await
            .expect_err("nothing listens on the discard port");

        assert!(matches!(
            report.current_context(),
            ApiClientError::RequestNotSent(_) | ApiClientError::RequestTimeoutReceived
        ));
    }

    fn proxy(http_url: &str) -> Proxy {
        Proxy {
            http_url: Some(http_url.to_string()),
            ..Proxy::default()
        }
    }

    #[test]
    fn base_clients_are_cached_per_proxy_setup() {
        let first = proxy("http://127.0.0.1:3128");
        let second = proxy("http://127.0.0.1:3129");

        get_base_client(&first, false).expect("first proxied client builds");
        get_base_client(&second, false).expect("second proxied client builds");
        get_base_client(&second, true).expect("bypassing client builds");

        let clients = BASE_CLIENTS.lock().expect("cache lock is healthy");
        assert!(clients.contains_key(&ClientKey::new(&first, false)));
        assert!(clients.contains_key(&ClientKey::new(&second, false)));
        assert_ne!(ClientKey::new(&first, false), ClientKey::new(&second, false));
    }

    #[test]
    fn bypassing_the_proxy_shares_the_direct_client() {
        assert_eq!(
            ClientKey::new(&proxy("http://127.0.0.1:3128"), true),
            ClientKey::new(&Proxy::default(), false)
        );
    }

    #[test]
    fn request_builder_defaults_to_post() {
        let request = RequestBuilder::new().url("http://gateway.example.com/").build();

        assert_eq!(request.method, Method::Post);
        assert!(request.body.is_none());
    }

    #[test]
    fn invalid_header_names_are_rejected() {
        let headers: Headers = [(
            "bad header".to_string(),
            Maskable::Normal("value".to_string()),
        )]
        .into_iter()
        .collect();

        assert!(headers.construct_header_map().is_err());
    }
}
