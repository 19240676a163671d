use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use eventflow_event::{CreateInput, UpdateInput};
use eventflow_shared::Error;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::AuthUser,
    error::{AppError, AppJson},
    server::AppState,
};

/// Clients send the capacity either as a number or as a numeric string.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum MaxAttendees {
    Number(i64),
    Text(String),
}

impl MaxAttendees {
    fn parse(value: Option<Self>) -> Result<Option<i64>, Error> {
        match value {
            None => Ok(None),
            Some(MaxAttendees::Number(n)) => Ok(Some(n)),
            Some(MaxAttendees::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(MaxAttendees::Text(text)) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| Error::Invalid("Max attendees must be a number".to_owned())),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub banner1: String,
    #[serde(default)]
    pub banner2: String,
    pub max_attendees: Option<MaxAttendees>,
}

#[tracing::instrument(skip_all, fields(creator_id = %account.id))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    AppJson(body): AppJson<CreateBody>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_command
        .create(
            &account.id,
            CreateInput {
                title: body.title,
                description: body.description,
                location: body.location,
                date: body.date,
                time: body.time,
                image: body.image,
                banner1: body.banner1,
                banner2: body.banner2,
                max_attendees: MaxAttendees::parse(body.max_attendees)?,
            },
        )
        .await?;

    let event = state.event_query.view(event).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Event created successfully",
            "event": event,
        })),
    ))
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub image: Option<String>,
    pub banner1: Option<String>,
    pub banner2: Option<String>,
    pub max_attendees: Option<MaxAttendees>,
}

#[tracing::instrument(skip_all, fields(event_id = %event_id, requester_id = %account.id))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(event_id): Path<String>,
    AppJson(body): AppJson<UpdateBody>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_command
        .update(
            &event_id,
            &account.id,
            UpdateInput {
                title: body.title,
                description: body.description,
                location: body.location,
                date: body.date,
                time: body.time,
                image: body.image,
                banner1: body.banner1,
                banner2: body.banner2,
                max_attendees: MaxAttendees::parse(body.max_attendees)?,
            },
        )
        .await?;

    let event = state.event_query.view(event).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Event updated successfully",
        "event": event,
    })))
}

#[tracing::instrument(skip_all, fields(event_id = %event_id, requester_id = %account.id))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.event_command.delete(&event_id, &account.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Event deleted successfully",
    })))
}

#[derive(Deserialize, Debug)]
pub struct AddAttendeeBody {
    #[serde(default)]
    pub identifier: String,
}

#[tracing::instrument(skip_all, fields(event_id = %event_id, requester_id = %account.id))]
pub async fn add_attendee(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(event_id): Path<String>,
    AppJson(body): AppJson<AddAttendeeBody>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_command
        .membership
        .add_attendee(&event_id, &account.id, &body.identifier)
        .await?;

    let event = state.event_query.view(event).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Attendee added successfully",
        "event": event,
    })))
}

#[tracing::instrument(skip_all, fields(event_id = %event_id, requester_id = %account.id))]
pub async fn leave(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_command
        .membership
        .leave(&event_id, &account.id)
        .await?;

    let event = state.event_query.view(event).await?;

    Ok(Json(json!({
        "success": true,
        "message": "You have left the event",
        "event": event,
    })))
}

#[tracing::instrument(skip_all, fields(event_id = %event_id, target_id = %target_id, requester_id = %account.id))]
pub async fn remove_attendee(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path((event_id, target_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .event_command
        .membership
        .remove_attendee(&event_id, &account.id, &target_id)
        .await?;

    let event = state.event_query.view(event).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Attendee removed successfully",
        "event": event,
    })))
}

pub async fn my_events(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_query.my_events(&account.id).await?;

    Ok(Json(json!({ "success": true, "events": events })))
}

pub async fn attending_events(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_query.attending_events(&account.id).await?;

    Ok(Json(json!({ "success": true, "events": events })))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(_account): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(event) = state.event_query.find(&event_id).await? else {
        return Err(Error::NotFound("Event".to_owned()).into());
    };

    Ok(Json(json!({ "success": true, "event": event })))
}
