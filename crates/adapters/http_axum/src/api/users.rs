//! JSON REST handlers for users.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use pethub_app::ports::UnitOfWork;
use pethub_domain::error::PetHubError;
use pethub_domain::id::UserId;
use pethub_domain::user::{User, UserFilter};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or replacing a user's profile.
///
/// There is no pet list here: pets join and leave a user through the pet
/// endpoints.
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl UserRequest {
    fn into_user(self) -> Result<User, PetHubError> {
        let mut builder = User::builder().name(self.name).email(self.email);
        if let Some(phone) = self.phone {
            builder = builder.phone(phone);
        }
        builder.build()
    }
}

/// Query string accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<ListQuery> for UserFilter {
    fn from(query: ListQuery) -> Self {
        Self {
            name: query.name,
            email: query.email,
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<User>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<User>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<User>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /users?name=&email=`
pub async fn list<U>(
    State(state): State<AppState<U>>,
    Query(query): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    let users = state.user_service.list_users(query.into()).await?;
    Ok(ListResponse::Ok(Json(users)))
}

/// `GET /users/:id`
pub async fn get<U>(
    State(state): State<AppState<U>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    let user_id = UserId::parse(&id)?;
    let user = state.user_service.get_user(user_id).await?;
    Ok(GetResponse::Ok(Json(user)))
}

/// `POST /users`
pub async fn create<U>(
    State(state): State<AppState<U>>,
    Json(req): Json<UserRequest>,
) -> Result<CreateResponse, ApiError>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    let user = req.into_user()?;
    let created = state.user_service.create_user(user).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /users/:id`
pub async fn update<U>(
    State(state): State<AppState<U>>,
    Path(id): Path<String>,
    Json(req): Json<UserRequest>,
) -> Result<GetResponse, ApiError>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    let user_id = UserId::parse(&id)?;
    let changes = req.into_user()?;
    let updated = state.user_service.update_user(user_id, changes).await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /users/:id`
///
/// Every pet the user owns is deleted along with it.
pub async fn delete<U>(
    State(state): State<AppState<U>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    let user_id = UserId::parse(&id)?;
    state.user_service.delete_user(user_id).await?;
    Ok(DeleteResponse::NoContent)
}
