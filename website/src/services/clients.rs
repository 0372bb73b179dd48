use reqwest::Client;

use dto::client::ClientDto;

use crate::Result;

use super::{read_json, read_text, send};

pub async fn get_client(api_url: &str, token: &str, client_id: i64) -> Result<ClientDto> {
    let url = format!("{}/client/findById/{}", api_url, client_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to get client. Try again later.").await?;

    read_json(response, "Unable to parse client.").await
}

pub async fn update_client(
    api_url: &str,
    token: &str,
    client_id: i64,
    data: &ClientDto,
) -> Result<ClientDto> {
    let url = format!("{}/client/update/{}", api_url, client_id);
    let request = Client::new().patch(url).bearer_auth(token).json(data);
    let response = send(request, "Unable to update client. Try again later.").await?;

    read_json(response, "Unable to parse client.").await
}

pub async fn unsubscribe_client(api_url: &str, token: &str, client_id: i64) -> Result<String> {
    let url = format!("{}/client/unsubscribe/{}", api_url, client_id);
    let request = Client::new().delete(url).bearer_auth(token);
    let response = send(request, "Unable to unsubscribe client. Try again later.").await?;

    read_text(response, "Unable to read unsubscribe response.").await
}
