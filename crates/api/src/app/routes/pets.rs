use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    routing::get,
};
use tracing::info;

use mascotas_core::PetId;
use mascotas_pets::{Pet, PetInput};

use crate::app::errors::ApiError;
use crate::app::extract::{JsonBody, Pagination, PathId};
use crate::app::routes::{care_events, system};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_pets)
                .post(create_pet)
                .fallback(system::method_not_allowed),
        )
        .route(
            "/:id",
            get(get_pet)
                .put(update_pet)
                .delete(delete_pet)
                .fallback(system::method_not_allowed),
        )
        .route(
            "/:id/cuidados",
            get(care_events::list_for_pet)
                .post(care_events::create_for_pet)
                .fallback(system::method_not_allowed),
        )
}

pub async fn list_pets(
    Extension(services): Extension<Arc<AppServices>>,
    Pagination(page): Pagination,
) -> Result<Json<Vec<Pet>>, ApiError> {
    Ok(Json(services.pets.list(page).await?))
}

pub async fn create_pet(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(input): JsonBody<PetInput>,
) -> Result<(StatusCode, Json<Pet>), ApiError> {
    let draft = input.into_draft()?;
    let pet = services.pets.create(draft).await?;
    info!(pet_id = %pet.id, "pet created");
    Ok((StatusCode::CREATED, Json(pet)))
}

pub async fn get_pet(
    Extension(services): Extension<Arc<AppServices>>,
    PathId(id): PathId<PetId>,
) -> Result<Json<Pet>, ApiError> {
    Ok(Json(services.pets.get(id).await?))
}

pub async fn update_pet(
    Extension(services): Extension<Arc<AppServices>>,
    PathId(id): PathId<PetId>,
    JsonBody(input): JsonBody<PetInput>,
) -> Result<Json<Pet>, ApiError> {
    let draft = input.into_draft()?;
    Ok(Json(services.pets.update(id, draft).await?))
}

pub async fn delete_pet(
    Extension(services): Extension<Arc<AppServices>>,
    PathId(id): PathId<PetId>,
) -> Result<StatusCode, ApiError> {
    services.pets.delete(id).await?;
    info!(pet_id = %id, "pet deleted");
    Ok(StatusCode::NO_CONTENT)
}
