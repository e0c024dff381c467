//! reqwest-backed FHIR client
//!
//! `FhirClient` is the production [`FhirTransport`]. It holds one connection
//! pool for the lifetime of a command, resolves request paths against the
//! configured base URL and attaches the configured credentials to every
//! request.

use super::transport::{FhirResponse, FhirTransport, HttpMethod};
use crate::config::{AuthType, ServerConfig};
use crate::domain::{FerryError, FhirError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde_json::Value;
use url::Url;

/// Media type for FHIR JSON request and response bodies
pub const FHIR_JSON: &str = "application/fhir+json";

/// FHIR REST client
///
/// # Example
///
/// ```no_run
/// use ferry::adapters::fhir::{FhirClient, FhirTransport};
/// use ferry::config::ServerConfig;
///
/// # async fn example() -> ferry::domain::Result<()> {
/// let client = FhirClient::new(&ServerConfig::default())?;
/// let page = client.search_page("Patient?_count=10").await?;
/// println!("{}", page.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FhirClient {
    /// Base URL, always ending in `/` so relative joins append
    base: Url,

    client: Client,

    /// Pre-rendered `Authorization` header, if any
    auth_header: Option<String>,
}

impl FhirClient {
    /// Build a client from server configuration
    ///
    /// # Errors
    ///
    /// Returns [`FerryError::Configuration`] if the base URL does not parse or
    /// the HTTP client cannot be built.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let base = normalize_base_url(&config.base_url)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static(FHIR_JSON));

        let mut client_builder = ClientBuilder::new().default_headers(default_headers);
        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| FerryError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base,
            client,
            auth_header: auth_header_value(config),
        })
    }

    /// Resolve a request path or absolute URL against the base URL
    pub fn resolve(&self, path: &str) -> std::result::Result<Url, FhirError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| FhirError::NetworkFailure {
                method: "-".to_string(),
                url: format!("{}{}", self.base, path),
                cause: format!("invalid request URL: {e}"),
            })
    }
}

#[async_trait]
impl FhirTransport for FhirClient {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> std::result::Result<FhirResponse, FhirError> {
        let url = self.resolve(path)?;
        let url_text = url.to_string();

        tracing::debug!(method = %method, url = %url_text, "Sending FHIR request");

        let mut request = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        if let Some(auth) = &self.auth_header {
            request = request.header(AUTHORIZATION, auth);
        }

        if let Some(body) = body {
            let payload = serde_json::to_vec(body)
                .map_err(|e| FhirError::malformed_json("request body", e))?;
            request = request.header(CONTENT_TYPE, FHIR_JSON).body(payload);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url_text, error = %e, "FHIR request failed");
            FhirError::NetworkFailure {
                method: method.to_string(),
                url: url_text.clone(),
                cause: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| FhirError::NetworkFailure {
            method: method.to_string(),
            url: url_text.clone(),
            cause: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            tracing::warn!(
                method = %method,
                url = %url_text,
                status = status.as_u16(),
                "FHIR server returned an error status"
            );
            return Err(FhirError::HttpStatusFailure {
                method: method.to_string(),
                url: url_text,
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::info!(method = %method, url = %url_text, status = status.as_u16(), "FHIR request completed");

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(&text)
                    .map_err(|e| FhirError::malformed_json(&url_text, e))?,
            )
        };

        Ok(FhirResponse {
            status: status.as_u16(),
            url: url_text,
            body,
        })
    }

    fn base_url(&self) -> &str {
        self.base.as_str()
    }
}

/// Parse the base URL and make sure it ends with `/`
fn normalize_base_url(base_url: &str) -> Result<Url> {
    let mut text = base_url.trim().to_string();
    if !text.ends_with('/') {
        text.push('/');
    }

    let url = Url::parse(&text)
        .map_err(|e| FerryError::Configuration(format!("Invalid base_url '{base_url}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FerryError::Configuration(format!(
            "Unsupported base_url scheme '{other}', expected http or https"
        ))),
    }
}

/// Build the `Authorization` header value for the configured scheme
fn auth_header_value(config: &ServerConfig) -> Option<String> {
    match config.auth_type {
        AuthType::None => None,
        AuthType::Basic => {
            let username = config.username.as_deref()?;
            let password = config
                .password
                .as_ref()
                .map(|p| p.expose_secret().as_ref().to_string())
                .unwrap_or_default();
            let credentials = format!("{username}:{password}");
            let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
            Some(format!("Basic {encoded}"))
        }
        AuthType::Bearer => config
            .token
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret().as_ref())),
    }
}
