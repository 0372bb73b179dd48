use reqwest::Client;
use snafu::ResultExt;

use dto::auth::{
    ChangeEmailRequest, ExistsResponse, ForgotPasswordRequest, ForgotPasswordResponse,
    LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest,
};

use crate::Result;
use crate::error::HttpClientSnafu;

use super::{handle_public_response_error, read_json};

pub async fn login(api_url: &str, data: &LoginRequest) -> Result<LoginResponse> {
    let url = format!("{}/auth/login", api_url);

    let response = Client::new()
        .post(url)
        .json(data)
        .send()
        .await
        .context(HttpClientSnafu {
            msg: "Unable to login. Try again later.",
        })?;

    if !response.status().is_success() {
        return Err(handle_public_response_error(response).await);
    }

    read_json(response, "Unable to parse login response.").await
}

/// Field that can be checked for uniqueness before registering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Dni,
    Email,
    Phone,
}

impl UniqueField {
    pub fn from_path(value: &str) -> Option<Self> {
        match value {
            "username" => Some(UniqueField::Username),
            "dni" => Some(UniqueField::Dni),
            "email" => Some(UniqueField::Email),
            "phone" => Some(UniqueField::Phone),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Dni => "dni",
            UniqueField::Email => "email",
            UniqueField::Phone => "phone",
        }
    }
}

pub async fn check_exists(api_url: &str, field: UniqueField, value: &str) -> Result<bool> {
    let url = format!("{}/auth/check-{}", api_url, field.name());

    let response = Client::new()
        .get(url)
        .query(&[(field.name(), value)])
        .send()
        .await
        .context(HttpClientSnafu {
            msg: "Unable to check availability. Try again later.",
        })?;

    if !response.status().is_success() {
        return Err(handle_public_response_error(response).await);
    }

    let result: ExistsResponse = read_json(response, "Unable to parse check response.").await?;
    Ok(result.exists)
}

pub async fn forgot_password(
    api_url: &str,
    data: &ForgotPasswordRequest,
) -> Result<ForgotPasswordResponse> {
    let url = format!("{}/auth/forgot-password", api_url);

    let response = Client::new()
        .post(url)
        .json(data)
        .send()
        .await
        .context(HttpClientSnafu {
            msg: "Unable to request password reset. Try again later.",
        })?;

    if !response.status().is_success() {
        return Err(handle_public_response_error(response).await);
    }

    read_json(response, "Unable to parse password reset response.").await
}

pub async fn reset_password(api_url: &str, data: &ResetPasswordRequest) -> Result<MessageResponse> {
    let url = format!("{}/auth/reset-password", api_url);

    let response = Client::new()
        .post(url)
        .json(data)
        .send()
        .await
        .context(HttpClientSnafu {
            msg: "Unable to reset password. Try again later.",
        })?;

    if !response.status().is_success() {
        return Err(handle_public_response_error(response).await);
    }

    read_json(response, "Unable to parse password reset response.").await
}

pub async fn verify_email(api_url: &str, token: &str) -> Result<MessageResponse> {
    let url = format!("{}/auth/verify-email", api_url);

    let response = Client::new()
        .get(url)
        .query(&[("token", token)])
        .send()
        .await
        .context(HttpClientSnafu {
            msg: "Unable to verify email. Try again later.",
        })?;

    if !response.status().is_success() {
        return Err(handle_public_response_error(response).await);
    }

    read_json(response, "Unable to parse email verification response.").await
}

pub async fn change_email_unverified(
    api_url: &str,
    data: &ChangeEmailRequest,
) -> Result<MessageResponse> {
    let url = format!("{}/auth/change-email-unverified", api_url);

    let response = Client::new()
        .post(url)
        .json(data)
        .send()
        .await
        .context(HttpClientSnafu {
            msg: "Unable to change email. Try again later.",
        })?;

    if !response.status().is_success() {
        return Err(handle_public_response_error(response).await);
    }

    read_json(response, "Unable to parse change email response.").await
}
