use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use url::Url;

use crate::error::{HttpError, TransportError};

use super::classify::RelayMode;

const JSON_CONTENT_TYPE: &str = "application/json";

/// A fully prepared relay call. Every dispatched request is a clone of one
/// of these, so headers and body are validated once up front.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    url: Url,
    headers: HeaderMap,
    body: Bytes,
    timeout: Duration,
    mode: RelayMode,
}

impl RelayRequest {
    /// Builds the request sent for every execution.
    ///
    /// A non-empty secret is sent verbatim as the `Authorization` header.
    /// Extra headers are applied last and replace same-named defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the secret or an extra header cannot be encoded
    /// as an HTTP header.
    pub fn new(
        url: Url,
        secret: Option<&str>,
        extra_headers: &[(String, String)],
        body: Bytes,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        if let Some(secret) = secret.filter(|value| !value.is_empty()) {
            let mut auth =
                HeaderValue::from_str(secret).map_err(|err| HttpError::InvalidHeaderValue {
                    header: AUTHORIZATION.as_str().to_owned(),
                    source: err,
                })?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        for (key, value) in extra_headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
                HttpError::InvalidHeaderName {
                    header: key.clone(),
                    source: err,
                }
            })?;
            let val = HeaderValue::from_str(value).map_err(|err| HttpError::InvalidHeaderValue {
                header: key.clone(),
                source: err,
            })?;
            headers.insert(name, val);
        }

        let mode = RelayMode::detect(&body);
        Ok(Self {
            url,
            headers,
            body,
            timeout,
            mode,
        })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn mode(&self) -> RelayMode {
        self.mode
    }

    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Raw HTTP answer; classification happens later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

/// The seam between dispatch and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one POST and returns the status and full body.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be completed or the body
    /// cannot be read before the request timeout.
    async fn send(&self, request: &RelayRequest) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport sharing one connection pool across workers.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be initialized.
    pub fn new(user_agent: &str) -> Result<Self, HttpError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|err| HttpError::BuildClientFailed { source: err })?;
        Ok(Self { client })
    }

    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RelayRequest) -> Result<TransportResponse, TransportError> {
        let timeout_ms = request.timeout_ms();
        let response = self
            .client
            .post(request.url().clone())
            .headers(request.headers().clone())
            .body(request.body().clone())
            .timeout(request.timeout())
            .send()
            .await
            .map_err(|err| TransportError::from_reqwest(&err, timeout_ms))?;

        let status = response.status().as_u16();
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| TransportError::from_reqwest(&err, timeout_ms))?;
            body.extend_from_slice(&chunk);
        }

        Ok(TransportResponse {
            status,
            body: Bytes::from(body),
        })
    }
}
