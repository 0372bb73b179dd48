pub mod admins;
pub mod appointments;
pub mod auth;
pub mod availability;
pub mod clients;
pub mod diagnoses;
pub mod doctors;
pub mod pets;
pub mod register;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use tracing::warn;

use clinic::messages::{
    ApiFailure, BAD_CREDENTIALS, friendly_message, is_email_not_verified,
};

use crate::error::{HttpClientSnafu, HttpResponseParseSnafu};
use crate::{Error, Result};

async fn read_failure(response: Response) -> ApiFailure {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiFailure::from_response(status, &body)
}

/// Maps a failed authenticated call. A 401 means the session is no longer
/// accepted by the backend.
pub async fn handle_response_error(response: Response) -> Error {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        warn!("Backend rejected the session token: {}", response.url());
        return Error::LoginRequired;
    }
    if status.is_server_error() {
        warn!("Backend error {} on {}", status, response.url());
    }

    let failure = read_failure(response).await;
    api_error(&failure)
}

/// Maps a failed call that carries no token, where 401 means bad credentials.
pub async fn handle_public_response_error(response: Response) -> Error {
    let status = response.status();
    let failure = read_failure(response).await;
    if status == StatusCode::UNAUTHORIZED {
        return Error::Api {
            status: status.as_u16(),
            message: BAD_CREDENTIALS.to_string(),
        };
    }
    api_error(&failure)
}

fn api_error(failure: &ApiFailure) -> Error {
    let message = friendly_message(failure);
    if is_email_not_verified(failure) {
        return Error::EmailNotVerified { message };
    }
    Error::Api {
        status: failure.status.unwrap_or(500),
        message,
    }
}

/// Sends an authenticated request, mapping non-success statuses.
pub async fn send(request: RequestBuilder, msg: &str) -> Result<Response> {
    let response = request.send().await.context(HttpClientSnafu { msg })?;

    if !response.status().is_success() {
        return Err(handle_response_error(response).await);
    }
    Ok(response)
}

pub async fn read_json<T: DeserializeOwned>(response: Response, msg: &str) -> Result<T> {
    response
        .json::<T>()
        .await
        .context(HttpResponseParseSnafu { msg })
}

/// Plain text bodies returned by some backend actions
pub async fn read_text(response: Response, msg: &str) -> Result<String> {
    response.text().await.context(HttpResponseParseSnafu { msg })
}

#[cfg(test)]
pub(crate) mod testing {
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serves a fake backend on an ephemeral port, returns its base url.
    pub async fn spawn_backend(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
