//! JSON REST handlers for pets.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use pethub_app::ports::UnitOfWork;
use pethub_domain::error::PetHubError;
use pethub_domain::id::{PetId, UserId};
use pethub_domain::pet::{Pet, PetFilter};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or replacing a pet.
#[derive(Debug, Deserialize)]
pub struct PetRequest {
    pub name: String,
    pub species: Option<String>,
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
}

impl PetRequest {
    fn into_pet(self) -> Result<Pet, PetHubError> {
        let mut builder = Pet::builder().name(self.name);
        if let Some(species) = self.species {
            builder = builder.species(species);
        }
        if let Some(user_id) = self.user_id {
            builder = builder.user_id(UserId::parse(&user_id)?);
        }
        builder.build()
    }
}

/// Query string accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
}

impl TryFrom<ListQuery> for PetFilter {
    type Error = ApiError;

    fn try_from(query: ListQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            name: query.name,
            user_id: query.user_id.as_deref().map(UserId::parse).transpose()?,
        })
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Pet>>),
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
    Ok(Json<Pet>),
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
    Created(Json<Pet>),
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

/// `GET /pets?name=&user_id=`
pub async fn list<U>(
    State(state): State<AppState<U>>,
    Query(query): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    let filter = PetFilter::try_from(query)?;
    let pets = state.pet_service.list_pets(filter).await?;
    Ok(ListResponse::Ok(Json(pets)))
}

/// `GET /pets/:id`
pub async fn get<U>(
    State(state): State<AppState<U>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    let pet_id = PetId::parse(&id)?;
    let pet = state.pet_service.get_pet(pet_id).await?;
    Ok(GetResponse::Ok(Json(pet)))
}

/// `POST /pets`
pub async fn create<U>(
    State(state): State<AppState<U>>,
    Json(req): Json<PetRequest>,
) -> Result<CreateResponse, ApiError>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    tracing::debug!(?req, "create pet request");
    let pet = req.into_pet()?;
    let created = state.pet_service.create_pet(pet).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /pets/:id`
pub async fn update<U>(
    State(state): State<AppState<U>>,
    Path(id): Path<String>,
    Json(req): Json<PetRequest>,
) -> Result<GetResponse, ApiError>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    let pet_id = PetId::parse(&id)?;
    tracing::debug!(%pet_id, ?req, "update pet request");
    let changes = req.into_pet()?;
    let updated = state.pet_service.update_pet(pet_id, changes).await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /pets/:id`
pub async fn delete<U>(
    State(state): State<AppState<U>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    U: UnitOfWork + Send + Sync + 'static,
{
    let pet_id = PetId::parse(&id)?;
    state.pet_service.delete_pet(pet_id).await?;
    Ok(DeleteResponse::NoContent)
}
