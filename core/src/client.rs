//! The API-client seam and its reqwest implementation.
//!
//! # Design
//! `ResourceConsumer` never talks to the network itself. It builds options and
//! calls one verb on an `ApiClient`, which owns the transport: base URL
//! resolution, credentials, request/response logging and cancellation.
//! Non-success statuses come back as `RawResponse` data; only failures that
//! prevent a response from arriving are `TransportError`s.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{ClientConfig, ConfigError};
use crate::error::TransportError;
use crate::http::{HttpMethod, RawResponse, RequestOptions, UploadOptions};

/// Verb operations a consumer needs from an HTTP client.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn get(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError>;

    async fn post(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError>;

    async fn put(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError>;

    async fn delete(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError>;

    async fn upload(&self, options: &UploadOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<C: ApiClient + ?Sized> ApiClient for Arc<C> {
    async fn get(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        (**self).get(options, cancel).await
    }

    async fn post(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        (**self).post(options, cancel).await
    }

    async fn put(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        (**self).put(options, cancel).await
    }

    async fn delete(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        (**self).delete(options, cancel).await
    }

    async fn upload(&self, options: &UploadOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        (**self).upload(options, cancel).await
    }
}

#[async_trait]
impl<C: ApiClient + ?Sized> ApiClient for &C {
    async fn get(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        (**self).get(options, cancel).await
    }

    async fn post(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        (**self).post(options, cancel).await
    }

    async fn put(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        (**self).put(options, cancel).await
    }

    async fn delete(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        (**self).delete(options, cancel).await
    }

    async fn upload(&self, options: &UploadOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        (**self).upload(options, cancel).await
    }
}

/// `ApiClient` over a shared `reqwest::Client`.
///
/// Relative URIs resolve against `base_url`; absolute URIs are used as given.
/// A bearer token, when configured, is attached to every request that does
/// not set `allow_anonymous`.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: Url,
    bearer_token: Option<String>,
    client: Client,
}

impl HttpApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder.build()?;

        let mut base_url = config.base_url;
        // Url::join drops the last segment of a base path without a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            bearer_token: config.bearer_token,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request URI against the base URL.
    ///
    /// Only a URI that parses on its own is absolute; `://` inside a query or
    /// path segment of a relative URI does not make it one.
    pub fn resolve(&self, uri: &str) -> Result<Url, TransportError> {
        match Url::parse(uri) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(self.base_url.join(uri.trim_start_matches('/'))?)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn builder(&self, method: HttpMethod, url: Url, allow_anonymous: bool) -> RequestBuilder {
        let builder = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };
        match (&self.bearer_token, allow_anonymous) {
            (Some(token), false) => builder.bearer_auth(token),
            _ => builder,
        }
    }

    async fn send_json(
        &self,
        method: HttpMethod,
        options: &RequestOptions,
        cancel: &CancellationToken,
    ) -> Result<RawResponse, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        let url = self.resolve(&options.uri)?;
        if options.log_request {
            tracing::debug!(
                method = method.as_str(),
                url = %url,
                body = ?options.body,
                anonymous = options.allow_anonymous,
                "sending request"
            );
        }

        let mut builder = self.builder(method, url, options.allow_anonymous);
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = race(execute(builder), cancel).await?;
        if options.log_response {
            log_response(method, &options.uri, &response);
        }
        Ok(response)
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        self.send_json(HttpMethod::Get, options, cancel).await
    }

    async fn post(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        self.send_json(HttpMethod::Post, options, cancel).await
    }

    async fn put(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        self.send_json(HttpMethod::Put, options, cancel).await
    }

    async fn delete(&self, options: &RequestOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        self.send_json(HttpMethod::Delete, options, cancel).await
    }

    async fn upload(&self, options: &UploadOptions, cancel: &CancellationToken) -> Result<RawResponse, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        let url = self.resolve(&options.uri)?;
        if options.log_request {
            tracing::debug!(
                url = %url,
                file_name = %options.file_name,
                size = options.content.len(),
                anonymous = options.allow_anonymous,
                "uploading file"
            );
        }

        let mime = mime_guess::from_path(&options.file_name).first_or_octet_stream();
        let body = Body::from(options.content.clone());
        let part = Part::stream_with_length(body, options.content.len() as u64)
            .file_name(options.file_name.clone())
            .mime_str(mime.essence_str())
            .map_err(|e| TransportError::Body(e.to_string()))?;
        let form = Form::new().part("file", part);

        let builder = self
            .builder(HttpMethod::Post, url, options.allow_anonymous)
            .multipart(form);
        let response = race(execute(builder), cancel).await?;
        if options.log_response {
            log_response(HttpMethod::Post, &options.uri, &response);
        }
        Ok(response)
    }
}

async fn execute(builder: RequestBuilder) -> Result<RawResponse, TransportError> {
    let response = builder.send().await?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response.bytes().await?;
    Ok(RawResponse { status, headers, body })
}

async fn race<F>(request: F, cancel: &CancellationToken) -> Result<RawResponse, TransportError>
where
    F: std::future::Future<Output = Result<RawResponse, TransportError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TransportError::Cancelled),
        result = request => result,
    }
}

fn log_response(method: HttpMethod, uri: &str, response: &RawResponse) {
    tracing::debug!(
        method = method.as_str(),
        uri,
        status = response.status,
        body = %response.text(),
        "received response"
    );
}
