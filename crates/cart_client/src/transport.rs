use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{cookie::Jar, Client};
use shared::{
    domain::EndpointUrl,
    error::{ApiError, ErrorCode},
    protocol::{CartMutationRequest, CartMutationResponse},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    csrf::{JarTokenSource, CSRF_HEADER},
    error::TransportError,
};

/// Sends one cart mutation and reads back the updated cart size.
#[async_trait]
pub trait CartTransport: Send + Sync {
    async fn post_mutation(
        &self,
        endpoint: &EndpointUrl,
        request: &CartMutationRequest,
        csrf_token: &str,
    ) -> Result<CartMutationResponse, TransportError>;
}

/// `reqwest` transport sharing a cookie jar with [`JarTokenSource`].
///
/// Row endpoints are usually site-relative (`/cart/add/`); they are resolved
/// against `base_url` the way a browser resolves them against the page.
#[derive(Debug, Clone)]
pub struct HttpCartTransport {
    http: Client,
    jar: Arc<Jar>,
    base_url: Option<Url>,
}

impl HttpCartTransport {
    pub fn new(base_url: Option<Url>) -> Result<Self, TransportError> {
        let jar = Arc::new(Jar::default());
        let http = Client::builder().cookie_provider(Arc::clone(&jar)).build()?;
        Ok(Self {
            http,
            jar,
            base_url,
        })
    }

    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    /// Seeds the jar from a `name=value; name=value` cookie string.
    pub fn add_cookies(&self, cookies: &str, url: &Url) {
        for cookie in cookies.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            self.jar.add_cookie_str(cookie, url);
        }
    }

    /// Token source reading the jar's cookies for `url`.
    pub fn token_source(&self, url: Url) -> JarTokenSource {
        JarTokenSource::new(self.jar(), url)
    }

    /// Loads a page so the server can set its `csrftoken` cookie.
    pub async fn prime_session(&self, url: &Url) -> Result<(), TransportError> {
        self.http
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        debug!(url = %url, "cart: session cookies primed");
        Ok(())
    }

    pub fn resolve_endpoint(&self, endpoint: &EndpointUrl) -> Result<Url, TransportError> {
        resolve_endpoint(self.base_url.as_ref(), endpoint)
    }
}

pub fn resolve_endpoint(
    base_url: Option<&Url>,
    endpoint: &EndpointUrl,
) -> Result<Url, TransportError> {
    let invalid = |reason: String| TransportError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };
    match Url::parse(endpoint.as_str()) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base =
                base_url.ok_or_else(|| invalid("relative endpoint without base url".into()))?;
            base.join(endpoint.as_str()).map_err(|e| invalid(e.to_string()))
        }
        Err(e) => Err(invalid(e.to_string())),
    }
}

#[async_trait]
impl CartTransport for HttpCartTransport {
    async fn post_mutation(
        &self,
        endpoint: &EndpointUrl,
        request: &CartMutationRequest,
        csrf_token: &str,
    ) -> Result<CartMutationResponse, TransportError> {
        let url = self.resolve_endpoint(endpoint)?;
        let response = self
            .http
            .post(url.clone())
            .header(CSRF_HEADER, csrf_token)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        match serde_json::from_str::<CartMutationResponse>(&body) {
            Ok(parsed) => {
                info!(
                    url = %url,
                    status,
                    cart_length = parsed.cart_length,
                    "cart: mutation accepted"
                );
                Ok(parsed)
            }
            Err(source) => {
                let api_error = ApiError::from_body(&body);
                if let Some(api_error) = &api_error {
                    warn!(
                        url = %url,
                        status,
                        code = ?ErrorCode::from_http_status(status),
                        message = %api_error.message,
                        "cart: server rejected mutation"
                    );
                }
                Err(TransportError::Decode {
                    status,
                    api_error,
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
