use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::server::AppState;

mod auth;
mod event;
mod health;

pub fn router(app_state: AppState) -> Router {
    let uploads = ServeDir::new(&app_state.config.images.dir);

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/check", get(auth::check))
        .route("/auth/update-profile", put(auth::update_profile))
        .route("/auth/delete/{user_id}", delete(auth::delete))
        .route("/event/create-event", post(event::create))
        .route("/event/updateEvent/{event_id}", put(event::update))
        .route("/event/deleteEvent/{event_id}", delete(event::delete))
        .route(
            "/event/addAttendeeToEvent/{event_id}",
            post(event::add_attendee),
        )
        .route("/event/leaveEvent/{event_id}", post(event::leave))
        .route(
            "/event/{event_id}/removeAttendee/{user_id}",
            delete(event::remove_attendee),
        )
        .route("/event/getSingleEvent/{event_id}", get(event::get))
        .route("/events/my-events", get(event::my_events))
        .route("/events/attending-events", get(event::attending_events))
        .nest_service("/uploads", uploads)
        .with_state(app_state)
}
