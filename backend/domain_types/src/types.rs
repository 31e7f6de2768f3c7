use common_utils::{errors::ValidationError, fp_utils::when, CustomResult};
use error_stack::{report, ResultExt};

#[derive(Clone, serde::Deserialize, Debug, Default)]
#[serde(default)]
pub struct Connectors {
    pub e24pipe: ConnectorParams,
}

#[derive(Clone, serde::Deserialize, Debug, Default, PartialEq, Eq)]
pub struct ConnectorParams {
    /// base url
    pub base_url: String,
}

impl ConnectorParams {
    /// Checks the base url and returns a copy that always ends with `/`, so
    /// servlet paths are appended as child segments of the configured context.
    pub fn validate(&self, connector: &'static str) -> CustomResult<Self, ValidationError> {
        let base_url = self.base_url.trim();

        when(base_url.is_empty(), || {
            Err(report!(ValidationError::MissingRequiredField {
                field_name: format!("connectors.{connector}.base_url"),
            }))
        })?;

        let mut url = url::Url::parse(base_url)
            .change_context(ValidationError::IncorrectValueProvided {
                field_name: "base_url",
            })
            .attach_printable_lazy(|| format!("Unable to parse {base_url} as an absolute url"))?;

        when(url.cannot_be_a_base(), || {
            Err(report!(ValidationError::InvalidValue {
                message: format!("{base_url} cannot be used as a base url"),
            }))
        })?;

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            base_url: url.to_string(),
        })
    }
}

#[derive(Debug, serde::Deserialize, Clone, Default)]
#[serde(default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    pub bypass_proxy_urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::ConnectorParams;

    fn params(base_url: &str) -> ConnectorParams {
        ConnectorParams {
            base_url: base_url.to_string(),
        }
    }

    #[test]
    fn empty_base_url_is_rejected() {
        assert!(params("").validate("e24pipe").is_err());
        assert!(params("   ").validate("e24pipe").is_err());
    }

    #[test]
    fn relative_base_url_is_rejected() {
        assert!(params("bankserver/context").validate("e24pipe").is_err());
        assert!(params("mailto:ops@example.com").validate("e24pipe").is_err());
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let validated = params("https://bankserver.example.com/context")
            .validate("e24pipe")
            .map(|params| params.base_url);
        assert_eq!(
            validated.ok().as_deref(),
            Some("https://bankserver.example.com/context/")
        );
    }

    #[test]
    fn host_only_base_url_keeps_root_path() {
        let validated = params("http://bankserver.example.com:8080")
            .validate("e24pipe")
            .map(|params| params.base_url);
        assert_eq!(
            validated.ok().as_deref(),
            Some("http://bankserver.example.com:8080/")
        );
    }
}
