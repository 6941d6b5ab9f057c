use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub active: bool,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub file_name: String,
    pub size: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WhoAmI {
    pub authenticated: bool,
}

/// Error body served as `application/problem+json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Problem {
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            status: status.as_u16(),
            detail: Some(detail.into()),
        }
    }

    fn not_found(id: Uuid) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("user {id} does not exist"))
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::to_string(&self).unwrap_or_default();
        (status, [(header::CONTENT_TYPE, APPLICATION_PROBLEM_JSON)], body).into_response()
    }
}

impl From<JsonRejection> for Problem {
    fn from(rejection: JsonRejection) -> Self {
        Problem::new(rejection.status(), rejection.body_text())
    }
}

pub type Db = Arc<RwLock<HashMap<Uuid, User>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/avatar", post(upload_avatar))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/whoami", get(whoami))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn parse_id(raw: &str) -> Result<Uuid, Problem> {
    Uuid::parse_str(raw).map_err(|e| Problem::new(StatusCode::BAD_REQUEST, format!("invalid user id: {e}")))
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let users = db.read().await;
    Json(users.values().cloned().collect())
}

async fn create_user(
    State(db): State<Db>,
    input: Result<Json<CreateUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), Problem> {
    let Json(input) = input?;
    if input.name.trim().is_empty() {
        return Err(Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "name must not be empty"));
    }
    let user = User {
        id: Uuid::new_v4(),
        name: input.name,
        email: input.email,
        active: true,
    };
    db.write().await.insert(user.id, user.clone());
    tracing::info!(id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<User>, Problem> {
    let id = parse_id(&id)?;
    let users = db.read().await;
    users.get(&id).cloned().map(Json).ok_or(Problem::not_found(id))
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<String>,
    input: Result<Json<UpdateUser>, JsonRejection>,
) -> Result<Json<User>, Problem> {
    let id = parse_id(&id)?;
    let Json(input) = input?;
    let mut users = db.write().await;
    let user = users.get_mut(&id).ok_or(Problem::not_found(id))?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(active) = input.active {
        user.active = active;
    }
    Ok(Json(user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<String>) -> Result<StatusCode, Problem> {
    let id = parse_id(&id)?;
    let mut users = db.write().await;
    users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(Problem::not_found(id))
}

async fn upload_avatar(mut multipart: Multipart) -> Result<Json<UploadReceipt>, Problem> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Problem::new(StatusCode::BAD_REQUEST, e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| Problem::new(StatusCode::BAD_REQUEST, e.body_text()))?;
        tracing::info!(%file_name, size = data.len(), "avatar uploaded");
        return Ok(Json(UploadReceipt {
            file_name,
            size: data.len() as u64,
        }));
    }
    Err(Problem::new(StatusCode::BAD_REQUEST, "missing multipart field `file`"))
}

async fn whoami(headers: HeaderMap) -> Json<WhoAmI> {
    let authenticated = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer ") && v.len() > "Bearer ".len());
    Json(WhoAmI { authenticated })
}
