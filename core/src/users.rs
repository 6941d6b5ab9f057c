//! Typed consumer for the `users` resource.

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::consumer::{CallOptions, ResourceConsumer};
use crate::error::ConsumerError;
use crate::response::ApiResponse;
use crate::types::{CreateUser, UpdateUser, UploadReceipt, User};

pub const USERS_PREFIX: &str = "users";

/// `ResourceConsumer` pinned to `users` and the user DTOs.
#[derive(Debug, Clone)]
pub struct UsersConsumer<C> {
    inner: ResourceConsumer<C>,
}

impl<C: ApiClient> UsersConsumer<C> {
    pub fn new(client: C) -> Self {
        Self {
            inner: ResourceConsumer::new(client, USERS_PREFIX),
        }
    }

    pub fn from_consumer(inner: ResourceConsumer<C>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &ResourceConsumer<C> {
        &self.inner
    }

    pub async fn get(&self, id: Uuid, cancel: &CancellationToken) -> Result<ApiResponse<User>, ConsumerError> {
        self.inner.get(&id.to_string(), CallOptions::default(), cancel).await
    }

    pub async fn list(&self, cancel: &CancellationToken) -> Result<ApiResponse<Vec<User>>, ConsumerError> {
        self.inner.get_all(CallOptions::default(), cancel).await
    }

    pub async fn create(
        &self,
        input: &CreateUser,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<User>, ConsumerError> {
        self.inner.create(input, CallOptions::default(), cancel).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateUser,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<User>, ConsumerError> {
        self.inner
            .update(&id.to_string(), input, CallOptions::default(), cancel)
            .await
    }

    /// The server answers `204 No Content`.
    pub async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> Result<ApiResponse<()>, ConsumerError> {
        self.inner.delete(&id.to_string(), CallOptions::default(), cancel).await
    }

    pub async fn upload_avatar(
        &self,
        content: impl Into<Bytes>,
        file_name: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<UploadReceipt>, ConsumerError> {
        let uri = format!("{}/avatar", self.inner.prefix());
        self.inner
            .upload(content, file_name, CallOptions::default().override_uri(uri), cancel)
            .await
    }
}
