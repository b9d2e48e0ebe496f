use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    routing::get,
};
use tracing::info;

use mascotas_core::{CareEventId, PetId};
use mascotas_pets::{CareEvent, CareEventInput, CareEventUpdateInput};

use crate::app::errors::ApiError;
use crate::app::extract::{JsonBody, PathId};
use crate::app::routes::system;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route(
        "/:id",
        get(get_care_event)
            .put(update_care_event)
            .delete(delete_care_event)
            .fallback(system::method_not_allowed),
    )
}

/// `GET /mascotas/:id/cuidados`, most recent first.
pub async fn list_for_pet(
    Extension(services): Extension<Arc<AppServices>>,
    PathId(pet_id): PathId<PetId>,
) -> Result<Json<Vec<CareEvent>>, ApiError> {
    Ok(Json(services.care_events.list_for_pet(pet_id).await?))
}

/// `POST /mascotas/:id/cuidados`. The owning pet is always the one in the path.
pub async fn create_for_pet(
    Extension(services): Extension<Arc<AppServices>>,
    PathId(pet_id): PathId<PetId>,
    JsonBody(input): JsonBody<CareEventInput>,
) -> Result<(StatusCode, Json<CareEvent>), ApiError> {
    let draft = input.into_draft(pet_id)?;
    let event = services.care_events.create(draft).await?;
    info!(care_event_id = %event.id, pet_id = %pet_id, "care event created");
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_care_event(
    Extension(services): Extension<Arc<AppServices>>,
    PathId(id): PathId<CareEventId>,
) -> Result<Json<CareEvent>, ApiError> {
    Ok(Json(services.care_events.get(id).await?))
}

pub async fn update_care_event(
    Extension(services): Extension<Arc<AppServices>>,
    PathId(id): PathId<CareEventId>,
    JsonBody(input): JsonBody<CareEventUpdateInput>,
) -> Result<Json<CareEvent>, ApiError> {
    let draft = input.into_draft()?;
    Ok(Json(services.care_events.update(id, draft).await?))
}

pub async fn delete_care_event(
    Extension(services): Extension<Arc<AppServices>>,
    PathId(id): PathId<CareEventId>,
) -> Result<StatusCode, ApiError> {
    services.care_events.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
