//! Typed async consumer for REST-style CRUD APIs.
//!
//! # Overview
//! `ResourceConsumer` turns a URI prefix and an injected `ApiClient` into
//! typed `get`, `get_all`, `create`, `update`, `delete` and `upload`
//! operations. Each call returns either the deserialized payload or the
//! RFC 7807 problem the server (or the transport) reported.
//!
//! # Design
//! - `ResourceConsumer` is stateless beyond its construction-time config, so
//!   one instance can serve any number of concurrent calls.
//! - The transport sits behind the `ApiClient` trait; `HttpApiClient` is the
//!   reqwest implementation, tests substitute recording clients.
//! - Caller mistakes and cancellation are `ConsumerError`s; remote failures
//!   are data (`ApiResponse::Problem`).
//! - Specific resources compose a `ResourceConsumer` (see `UsersConsumer`)
//!   instead of extending it.

pub mod client;
pub mod config;
pub mod consumer;
pub mod convert;
pub mod error;
pub mod http;
pub mod problem;
pub mod response;
pub mod types;
pub mod users;

pub use client::{ApiClient, HttpApiClient};
pub use config::{ClientConfig, ConfigError, ConsumerConfig};
pub use consumer::{CallOptions, ResourceConsumer};
pub use convert::{to_with_details, transport_problem};
pub use error::{ConsumerError, TransportError};
pub use http::{HttpMethod, RawResponse, RequestOptions, UploadOptions};
pub use problem::{ProblemDetails, APPLICATION_PROBLEM_JSON};
pub use response::ApiResponse;
pub use tokio_util::sync::CancellationToken;
pub use types::{CreateUser, UpdateUser, UploadReceipt, User};
pub use users::UsersConsumer;
