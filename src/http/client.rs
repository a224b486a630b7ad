//! HTTP client bound to a single base URL.

use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use std::time::Duration;

use crate::retry::TransportError;

/// Thin wrapper around a reqwest Client that knows the API base URL.
///
/// Each method performs exactly one request and hands back the response
/// whatever its status. Only failing to obtain a response is an error. Network
/// failures are marked as a [`TransportError`]; a request that cannot be built
/// (malformed URL) comes back as the plain reqwest error.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds a reqwest Client with the userapi user agent and a request timeout.
    pub fn build(base_url: &str, timeout: Duration) -> Result<Self> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!("Invalid base URL '{}': expected http:// or https://", base_url);
        }
        Url::parse(base_url).with_context(|| format!("Invalid base URL '{}'", base_url))?;

        let client = Client::builder()
            .user_agent(concat!("userapi/", env!("USERAPI_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(client, base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins the base URL and a resource path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Response> {
        let request = self.request(Method::GET, path).query(query);
        self.send(Method::GET, path, request).await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let request = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, request).await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let request = self.request(Method::PUT, path).json(body);
        self.send(Method::PUT, path, request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let request = self.request(Method::DELETE, path);
        self.send(Method::DELETE, path, request).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> Result<Response> {
        let url = self.url(path);
        debug!("{} {}...", method, url);

        let response = request.send().await.map_err(|e| {
            let context = format!("Failed to send {} request to {}", method, url);
            // A request that could not be built never reached the network.
            if e.is_builder() {
                anyhow::Error::from(e).context(context)
            } else {
                anyhow::Error::from(TransportError::new(e.to_string())).context(context)
            }
        })?;

        debug!("{} {} -> {}", method, url, response.status());
        Ok(response)
    }
}
