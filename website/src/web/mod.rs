mod admin;
mod auth;
mod client;
mod doctor;
mod middleware;
mod routes;
mod schedule;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Serialize;
use snafu::ResultExt;
use validator::Validate;

use clinic::messages::INVALID_DATA;
use clinic::session::{Session, TOKEN_KEY, USER_ID_KEY, USER_ROLE_KEY};

use crate::{Error, Result};
use crate::config::Config;
use crate::error::JsonRejectionSnafu;

pub use routes::all_routes;

/// Stores the session the way the browser kept it in local storage.
pub fn save_session(jar: CookieJar, config: &Config, session: &Session) -> CookieJar {
    let max_age = time::Duration::minutes(config.session_max_age_minutes);
    let build = |name: &'static str, value: String| {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .secure(config.ssl)
            .same_site(SameSite::Lax)
            .max_age(max_age)
    };

    let mut jar = jar;
    if let Some(token) = session.token() {
        jar = jar.add(build(TOKEN_KEY, token.to_string()));
    }
    if let Some(role) = session.role {
        jar = jar.add(build(USER_ROLE_KEY, role.to_string()));
    }
    if let Some(user_id) = session.user_id {
        jar = jar.add(build(USER_ID_KEY, user_id.to_string()));
    }
    jar
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    [TOKEN_KEY, USER_ROLE_KEY, USER_ID_KEY]
        .into_iter()
        .fold(jar, |jar, name| jar.remove(Cookie::build(name).path("/")))
}

/// List filter value from a query string. Blank and `ALL` select everything.
pub fn selected(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("ALL"))
}

/// Unwraps a JSON body and runs its validation rules.
pub fn validated<T: Validate>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    let Json(data) = payload.context(JsonRejectionSnafu { msg: INVALID_DATA })?;
    data.validate()?;
    Ok(data)
}

pub fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    let Json(data) = payload.context(JsonRejectionSnafu { msg: INVALID_DATA })?;
    Ok(data)
}

/// Plain acknowledgement of a backend action
#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Json<Ack> {
        Json(Ack {
            message: message.into(),
        })
    }
}

pub async fn not_found_handler() -> Error {
    Error::NotFound {
        msg: clinic::messages::NOT_FOUND.to_string(),
    }
}
