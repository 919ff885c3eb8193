//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, redirect, Client};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::errors::NavError;

/// Maximum number of same-origin redirects followed for one request
const MAX_REDIRECTS: usize = 10;

/// HTTP client options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Admin base URL, e.g. `https://example.com/blog/ghost`
    pub base_url: String,

    /// Session cookie attached to every request
    pub session_cookie: Option<SecretString>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:2368/blog/ghost".to_string(),
            session_cookie: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the admin backend.
///
/// Requests are credentialed with the session cookie, never send a referrer,
/// bypass caches and only follow redirects that stay on the admin origin.
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(options: &ClientOptions) -> Result<Self, NavError> {
        let base_url = Url::parse(&options.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(NavError::ConfigError(format!(
                "Admin URL cannot be used as a base: {}",
                options.base_url
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("no-cache"),
        );
        if let Some(cookie) = &options.session_cookie {
            let mut value = header::HeaderValue::from_str(cookie.expose_secret())
                .map_err(|e| NavError::ConfigError(format!("Invalid session cookie: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::COOKIE, value);
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .default_headers(headers)
            .referer(false)
            .redirect(same_origin_redirects())
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Resolve path segments against the base URL.
    ///
    /// Each segment is percent-encoded on its own, an empty trailing segment
    /// produces a trailing slash.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, NavError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| NavError::ConfigError(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, NavError> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        Self::read_json("GET", response).await
    }

    /// Make a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, NavError> {
        debug!("POST {}", url);

        let body = serde_json::to_vec(body)?;
        let response = self.client.post(url).body(body).send().await?;
        Self::read_json("POST", response).await
    }

    async fn read_json<T: DeserializeOwned>(
        method: &str,
        response: reqwest::Response,
    ) -> Result<T, NavError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} failed: {} - {}", method, status, body);
            return Err(NavError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;
        Ok(body)
    }
}

fn same_origin_redirects() -> redirect::Policy {
    redirect::Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        let same_origin = attempt
            .previous()
            .first()
            .map(|first| first.origin() == attempt.url().origin())
            .unwrap_or(false);
        if same_origin {
            attempt.follow()
        } else {
            attempt.stop()
        }
    })
}
