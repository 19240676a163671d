use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use eventflow_account::{AccountView, AuthenticateInput, RegisterInput, UpdateProfileInput};
use eventflow_shared::Error;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::{AuthUser, build_cookie, removal_cookie},
    error::{AppError, AppJson},
    server::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub mobile_number: String,
}

#[tracing::instrument(skip_all, fields(email = %body.email))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(body): AppJson<RegisterBody>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .account_command
        .register(RegisterInput {
            full_name: body.full_name,
            email: body.email,
            password: body.password,
            mobile_number: body.mobile_number,
        })
        .await?;

    let cookie = build_cookie(&state.config.jwt, account.id.to_owned()).map_err(Error::from)?;

    Ok((
        StatusCode::CREATED,
        jar.add(cookie),
        Json(json!({
            "success": true,
            "message": "User created successfully",
            "user": AccountView::from(account),
        })),
    ))
}

#[derive(Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[tracing::instrument(skip_all, fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(body): AppJson<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    let account = match state
        .account_command
        .authenticate(AuthenticateInput {
            email: body.email,
            password: body.password,
        })
        .await
    {
        Ok(account) => account,
        Err(Error::NotFound(_)) => return Err(Error::InvalidCredentials.into()),
        Err(err) => return Err(err.into()),
    };

    let cookie = build_cookie(&state.config.jwt, account.id.to_owned()).map_err(Error::from)?;

    Ok((
        jar.add(cookie),
        Json(json!({
            "success": true,
            "message": "User logged in successfully",
            "user": AccountView::from(account),
        })),
    ))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(removal_cookie()),
        Json(json!({ "success": true, "message": "Logged out successfully" })),
    )
}

pub async fn check(AuthUser(account): AuthUser) -> impl IntoResponse {
    Json(json!({ "success": true, "user": account }))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileBody {
    pub full_name: Option<String>,
    pub profile_pic: Option<String>,
    pub mobile_number: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

#[tracing::instrument(skip_all, fields(account_id = %account.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    AppJson(body): AppJson<UpdateProfileBody>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .account_command
        .update_profile(
            &account.id,
            UpdateProfileInput {
                full_name: body.full_name,
                profile_picture: body.profile_pic,
                mobile_number: body.mobile_number,
                new_password: body.new_password,
                confirm_new_password: body.confirm_new_password,
            },
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": AccountView::from(account),
    })))
}

#[tracing::instrument(skip_all, fields(account_id = %account_id, requester_id = %account.id))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    jar: CookieJar,
    Path(account_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state
        .account_command
        .delete(&account_id, &account.id)
        .await?;

    Ok((
        jar.remove(removal_cookie()),
        Json(json!({
            "success": true,
            "message": "User and all related data deleted successfully",
        })),
    ))
}
