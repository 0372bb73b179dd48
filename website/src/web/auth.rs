use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::JsonRejection},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use clinic::policy::LOGIN_PATH;
use clinic::session::Session;
use clinic::text::capitalize_proper_names;
use dto::auth::{
    ChangeEmailRequest, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
    MessageResponse, RegisterClientRequest, ResetPasswordRequest,
};
use dto::role::Role;

use crate::ctx::Ctx;
use crate::run::AppState;
use crate::services::auth::{
    UniqueField, change_email_unverified, check_exists, forgot_password, login, reset_password,
    verify_email,
};
use crate::services::register::register_client;
use crate::{Error, Result};

use super::{Ack, clear_session, save_session, validated};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnQuery {
    pub return_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub user_id: i64,
    pub role: Option<Role>,

    /// Where the browser goes next
    pub redirect: String,
}

/// Only same-site paths are followed after login.
fn safe_return_url(value: Option<&str>) -> Option<&str> {
    value.filter(|v| v.starts_with('/') && !v.starts_with("//") && !v.starts_with(LOGIN_PATH))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Query(query): Query<ReturnQuery>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginView>)> {
    let data = validated(payload)?;
    let config = state.config.clone();

    let response = login(&config.api_url, &data).await?;
    let session = Session::from_login(&response);

    let home = session.role.map(|r| r.home_path()).unwrap_or(LOGIN_PATH);
    let redirect = match session.role {
        Some(_) => safe_return_url(query.return_url.as_deref()).unwrap_or(home),
        None => home,
    };

    info!("User {} logged in", response.user_id);
    let view = LoginView {
        user_id: response.user_id,
        role: session.role,
        redirect: redirect.to_string(),
    };
    Ok((save_session(jar, &config, &session), Json(view)))
}

pub async fn logout_handler(jar: CookieJar) -> (CookieJar, Json<Ack>) {
    (clear_session(jar), Ack::new("Sesión cerrada"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub authenticated: bool,
    pub username: Option<String>,

    #[serde(flatten)]
    pub session: Session,
}

pub async fn session_handler(Extension(ctx): Extension<Ctx>) -> Json<SessionView> {
    let authenticated = ctx.session.is_authenticated(Utc::now());
    Json(SessionView {
        authenticated,
        username: ctx.session.username(),
        session: ctx.session,
    })
}

pub async fn register_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterClientRequest>, JsonRejection>,
) -> Result<Json<Ack>> {
    let mut data = validated(payload)?;
    let (name, surname) = capitalize_proper_names(&data.user.name, &data.user.surname);
    data.user.name = name;
    data.user.surname = surname;

    register_client(&state.config.api_url, &data).await?;
    Ok(Ack::new(
        "Registro exitoso. Revisá tu email para verificar tu cuenta.",
    ))
}

#[derive(Serialize)]
pub struct ExistsView {
    pub exists: bool,
}

async fn check(state: &AppState, field: UniqueField, params: &HashMap<String, String>) -> Result<Json<ExistsView>> {
    let Some(value) = params.get(field.name()).filter(|v| !v.trim().is_empty()) else {
        return Err(Error::BadRequest {
            msg: format!("Missing {} parameter", field.name()),
        });
    };
    let exists = check_exists(&state.config.api_url, field, value.trim()).await?;
    Ok(Json(ExistsView { exists }))
}

pub async fn check_username_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ExistsView>> {
    check(&state, UniqueField::Username, &params).await
}

pub async fn check_dni_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ExistsView>> {
    check(&state, UniqueField::Dni, &params).await
}

pub async fn check_email_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ExistsView>> {
    check(&state, UniqueField::Email, &params).await
}

pub async fn check_phone_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ExistsView>> {
    check(&state, UniqueField::Phone, &params).await
}

pub async fn forgot_password_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<ForgotPasswordResponse>> {
    let data = validated(payload)?;
    let response = forgot_password(&state.config.api_url, &data).await?;
    Ok(Json(response))
}

pub async fn reset_password_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let data = validated(payload)?;
    let response = reset_password(&state.config.api_url, &data).await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

pub async fn verify_email_handler(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<MessageResponse>> {
    let response = verify_email(&state.config.api_url, &query.token).await?;
    Ok(Json(response))
}

pub async fn change_email_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChangeEmailRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let data = validated(payload)?;
    let response = change_email_unverified(&state.config.api_url, &data).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_url() {
        assert_eq!(safe_return_url(Some("/admin/home")), Some("/admin/home"));
        assert_eq!(safe_return_url(Some("//evil.test")), None);
        assert_eq!(safe_return_url(Some("https://evil.test")), None);
        assert_eq!(safe_return_url(Some("/login?returnUrl=%2F")), None);
        assert_eq!(safe_return_url(None), None);
    }
}
