use std::time::Duration;

use hyperswitch_masking::{Maskable, Secret};

pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Post,
}

#[derive(Debug, Clone)]
pub enum RequestContent {
    /// A body the caller already url-encoded, sent verbatim
    FormUrlEncoded(Secret<String>),
}

#[derive(Debug, Clone)]
pub struct Request {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
    pub timeout: Option<Duration>,
}

#[derive(Debug)]
pub struct RequestBuilder {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
    pub timeout: Option<Duration>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Post,
            url: String::with_capacity(1024),
            headers: std::collections::HashSet::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, header: &str, value: &str) -> Self {
        self.headers
            .insert((header.into(), Maskable::Normal(value.to_string())));
        self
    }

    pub fn headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn set_optional_body(mut self, body: Option<RequestContent>) -> Self {
        if let Some(body) = body {
            self.body.replace(body);
        }
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
