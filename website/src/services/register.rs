use reqwest::Client;
use serde::Serialize;
use snafu::ResultExt;

use dto::auth::{RegisterClientRequest, RegisterRequest};
use dto::doctor::RegisterDoctorDto;

use crate::Result;
use crate::error::HttpClientSnafu;

use super::{handle_public_response_error, read_text};

async fn register<T: Serialize>(api_url: &str, kind: &str, data: &T) -> Result<String> {
    let url = format!("{}/register/new/{}", api_url, kind);

    let response = Client::new()
        .post(url)
        .json(data)
        .send()
        .await
        .context(HttpClientSnafu {
            msg: format!("Unable to register {}. Try again later.", kind),
        })?;

    if !response.status().is_success() {
        return Err(handle_public_response_error(response).await);
    }

    read_text(response, "Unable to read registration response.").await
}

pub async fn register_client(api_url: &str, data: &RegisterClientRequest) -> Result<String> {
    register(api_url, "client", data).await
}

pub async fn register_doctor(api_url: &str, data: &RegisterDoctorDto) -> Result<String> {
    register(api_url, "doctor", data).await
}

pub async fn register_admin(api_url: &str, data: &RegisterRequest) -> Result<String> {
    register(api_url, "admin", data).await
}
