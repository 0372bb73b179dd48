use reqwest::Client;

use dto::pet::PetDto;

use crate::Result;

use super::{read_json, read_text, send};

pub async fn create_pet(api_url: &str, token: &str, data: &PetDto) -> Result<PetDto> {
    let url = format!("{}/pet/create", api_url);
    let request = Client::new().post(url).bearer_auth(token).json(data);
    let response = send(request, "Unable to create pet. Try again later.").await?;

    read_json(response, "Unable to parse pet.").await
}

pub async fn list_pets(api_url: &str, token: &str, client_id: i64) -> Result<Vec<PetDto>> {
    let url = format!("{}/pet/findAllByClientId/{}", api_url, client_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list pets. Try again later.").await?;

    read_json(response, "Unable to parse pets.").await
}

pub async fn delete_pet(api_url: &str, token: &str, pet_id: i64) -> Result<String> {
    let url = format!("{}/pet/deleteActive/{}", api_url, pet_id);
    let request = Client::new().delete(url).bearer_auth(token);
    let response = send(request, "Unable to delete pet. Try again later.").await?;

    read_text(response, "Unable to read delete response.").await
}

pub async fn update_pet(api_url: &str, token: &str, pet_id: i64, data: &PetDto) -> Result<PetDto> {
    let url = format!("{}/pet/update/{}", api_url, pet_id);
    let request = Client::new().patch(url).bearer_auth(token).json(data);
    let response = send(request, "Unable to update pet. Try again later.").await?;

    read_json(response, "Unable to parse pet.").await
}
