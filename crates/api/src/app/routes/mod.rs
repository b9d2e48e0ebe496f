use axum::Router;

pub mod care_events;
pub mod pets;
pub mod system;

/// Router for the resource endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/mascotas", pets::router())
        .nest("/cuidados", care_events::router())
}
