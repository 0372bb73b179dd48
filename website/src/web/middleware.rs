use axum::{
    Extension, Json,
    extract::{OriginalUri, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use tracing::{error, info, warn};

use clinic::policy::{Access, LOGIN_PATH, authorize};
use clinic::session::{Session, TOKEN_KEY, USER_ID_KEY, USER_ROLE_KEY};
use dto::role::Role;

use crate::ctx::Ctx;
use crate::error::{ErrorInfo, ErrorResponse};

use super::clear_session;

/// Builds the request context from the session cookies. Never rejects.
pub async fn ctx_middleware(cookies: CookieJar, mut req: Request, next: Next) -> Response {
    let value = |name: &str| cookies.get(name).map(|c| c.value().to_string());
    let token = value(TOKEN_KEY);
    let role = value(USER_ROLE_KEY);
    let user_id = value(USER_ID_KEY);

    let session = Session::from_stored(token.as_deref(), role.as_deref(), user_id.as_deref());

    req.extensions_mut().insert(Ctx::new(session));
    next.run(req).await
}

async fn guard(ctx: &Ctx, allowed: &[Role], uri: &OriginalUri, req: Request, next: Next) -> Response {
    let path = uri
        .0
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or("/");

    match authorize(&ctx.session, allowed, path, Utc::now()) {
        Access::Granted => next.run(req).await,
        access => {
            let location = access.location().unwrap_or_else(|| LOGIN_PATH.to_string());
            info!("Access to {} denied, redirecting to {}", path, location);
            Redirect::to(&location).into_response()
        }
    }
}

pub async fn require_client_middleware(
    Extension(ctx): Extension<Ctx>,
    uri: OriginalUri,
    req: Request,
    next: Next,
) -> Response {
    guard(&ctx, &[Role::Client], &uri, req, next).await
}

pub async fn require_admin_middleware(
    Extension(ctx): Extension<Ctx>,
    uri: OriginalUri,
    req: Request,
    next: Next,
) -> Response {
    guard(&ctx, &[Role::Admin], &uri, req, next).await
}

pub async fn require_doctor_middleware(
    Extension(ctx): Extension<Ctx>,
    uri: OriginalUri,
    req: Request,
    next: Next,
) -> Response {
    guard(&ctx, &[Role::Doctor], &uri, req, next).await
}

/// Renders errors as JSON. A session rejected by the backend clears the
/// stored session and sends the browser to the login page.
pub async fn response_mapper(jar: CookieJar, res: Response) -> Response {
    let Some(e) = res.extensions().get::<ErrorInfo>() else {
        return res;
    };

    if e.login_required {
        warn!("Session rejected, logging out");
        return (clear_session(jar), Redirect::to(LOGIN_PATH)).into_response();
    }

    if e.status_code.is_server_error() {
        error!("{}", e.detail);
        if let Some(bt) = &e.backtrace {
            error!("{}", bt);
        }
    }

    (e.status_code, Json(ErrorResponse::from(e))).into_response()
}
