//! Generic CRUD consumer for a single REST resource collection.
//!
//! # Design
//! `ResourceConsumer` holds only immutable configuration: the injected client,
//! the collection prefix and the two logging toggles. Every operation builds
//! fresh options, makes exactly one client call and converts the response, so
//! any number of calls may run concurrently on a shared consumer.
//!
//! URIs default to `{prefix}` for collection operations and `{prefix}/{id}`
//! for item operations; `CallOptions::override_uri` replaces them verbatim.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::client::ApiClient;
use crate::config::ConsumerConfig;
use crate::convert::{to_with_details, transport_problem};
use crate::error::{ConsumerError, TransportError};
use crate::http::{RawResponse, RequestOptions, UploadOptions};
use crate::response::ApiResponse;

/// Per-call knobs shared by every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Target this URI instead of the one derived from the prefix.
    pub override_uri: Option<String>,
    /// Send the request without credentials.
    pub allow_anonymous: bool,
}

impl CallOptions {
    pub fn anonymous() -> Self {
        Self {
            allow_anonymous: true,
            ..Default::default()
        }
    }

    pub fn override_uri(mut self, uri: impl Into<String>) -> Self {
        self.override_uri = Some(uri.into());
        self
    }

    pub fn allow_anonymous(mut self, allow: bool) -> Self {
        self.allow_anonymous = allow;
        self
    }
}

/// Typed CRUD and upload operations against `{prefix}` on an `ApiClient`.
#[derive(Debug, Clone)]
pub struct ResourceConsumer<C> {
    client: C,
    prefix: String,
    log_request: bool,
    log_response: bool,
}

impl<C: ApiClient> ResourceConsumer<C> {
    pub fn new(client: C, prefix: &str) -> Self {
        Self::with_config(client, ConsumerConfig::new(prefix))
    }

    pub fn with_config(client: C, config: ConsumerConfig) -> Self {
        Self {
            client,
            prefix: config.prefix.trim_end_matches('/').to_string(),
            log_request: config.log_request,
            log_response: config.log_response,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetch one resource from `{prefix}/{id}`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, ConsumerError> {
        let options = self.options(self.item_uri(id, &call), None, &call);
        let sent = self.client.get(&options, cancel).await;
        finish(sent, cancel)
    }

    /// Fetch the whole collection from `{prefix}`.
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        call: CallOptions,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<T>>, ConsumerError> {
        let options = self.options(self.collection_uri(&call), None, &call);
        let sent = self.client.get(&options, cancel).await;
        finish(sent, cancel)
    }

    /// POST `body` to `{prefix}`.
    ///
    /// A body that serializes to JSON `null` (such as `None`) is rejected with
    /// `ConsumerError::MissingRequestBody` before the client is called.
    pub async fn create<T: DeserializeOwned, B: Serialize>(
        &self,
        body: B,
        call: CallOptions,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, ConsumerError> {
        let body = require_body(body)?;
        let options = self.options(self.collection_uri(&call), Some(body), &call);
        let sent = self.client.post(&options, cancel).await;
        finish(sent, cancel)
    }

    /// PUT `body` to `{prefix}/{id}`. Same body requirement as `create`.
    pub async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        id: &str,
        body: B,
        call: CallOptions,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, ConsumerError> {
        let body = require_body(body)?;
        let options = self.options(self.item_uri(id, &call), Some(body), &call);
        let sent = self.client.put(&options, cancel).await;
        finish(sent, cancel)
    }

    /// DELETE `{prefix}/{id}`.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        id: &str,
        call: CallOptions,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, ConsumerError> {
        let options = self.options(self.item_uri(id, &call), None, &call);
        let sent = self.client.delete(&options, cancel).await;
        finish(sent, cancel)
    }

    /// Upload `content` as `file_name` to `{prefix}`.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        content: impl Into<Bytes>,
        file_name: &str,
        call: CallOptions,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, ConsumerError> {
        let options = UploadOptions {
            uri: self.collection_uri(&call),
            content: content.into(),
            file_name: file_name.to_string(),
            allow_anonymous: call.allow_anonymous,
            log_request: self.log_request,
            log_response: self.log_response,
        };
        let sent = self.client.upload(&options, cancel).await;
        finish(sent, cancel)
    }

    fn collection_uri(&self, call: &CallOptions) -> String {
        call.override_uri.clone().unwrap_or_else(|| self.prefix.clone())
    }

    fn item_uri(&self, id: &str, call: &CallOptions) -> String {
        call.override_uri
            .clone()
            .unwrap_or_else(|| format!("{}/{id}", self.prefix))
    }

    fn options(&self, uri: String, body: Option<serde_json::Value>, call: &CallOptions) -> RequestOptions {
        RequestOptions {
            uri,
            body,
            allow_anonymous: call.allow_anonymous,
            log_request: self.log_request,
            log_response: self.log_response,
        }
    }
}

fn require_body<B: Serialize>(body: B) -> Result<serde_json::Value, ConsumerError> {
    match serde_json::to_value(body)? {
        serde_json::Value::Null => Err(ConsumerError::MissingRequestBody),
        value => Ok(value),
    }
}

fn finish<T: DeserializeOwned>(
    sent: Result<RawResponse, TransportError>,
    cancel: &CancellationToken,
) -> Result<ApiResponse<T>, ConsumerError> {
    match sent {
        Ok(response) => to_with_details(response, cancel),
        Err(err) => transport_problem(err),
    }
}
