use reqwest::Client;
use serde::Deserialize;

use dto::doctor::DoctorDto;
use dto::pagination::{Page, PageParams};

use crate::Result;

use super::{read_json, read_text, send};

/// The doctor list comes back either bare or wrapped in a page.
#[derive(Deserialize)]
#[serde(untagged)]
enum DoctorList {
    Paged(Page<DoctorDto>),
    Plain(Vec<DoctorDto>),
}

impl DoctorList {
    fn into_vec(self) -> Vec<DoctorDto> {
        match self {
            DoctorList::Paged(page) => page.content,
            DoctorList::Plain(list) => list,
        }
    }
}

pub async fn get_doctor(api_url: &str, token: &str, doctor_id: i64) -> Result<DoctorDto> {
    let url = format!("{}/doctor/find/{}", api_url, doctor_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to get doctor. Try again later.").await?;

    read_json(response, "Unable to parse doctor.").await
}

pub async fn list_doctors(
    api_url: &str,
    token: &str,
    params: Option<&PageParams>,
) -> Result<Vec<DoctorDto>> {
    let url = format!("{}/doctor/list", api_url);
    let mut request = Client::new().get(url).bearer_auth(token);
    if let Some(params) = params {
        request = request.query(&[("page", params.page), ("size", params.size)]);
    }
    let response = send(request, "Unable to list doctors. Try again later.").await?;

    let list: DoctorList = read_json(response, "Unable to parse doctors.").await?;
    Ok(list.into_vec())
}

/// Active doctors including their ids
pub async fn list_active_doctors(api_url: &str, token: &str) -> Result<Vec<DoctorDto>> {
    let url = format!("{}/doctor/list-id", api_url);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list doctors. Try again later.").await?;

    read_json(response, "Unable to parse doctors.").await
}

pub async fn list_inactive_doctors(api_url: &str, token: &str) -> Result<Vec<DoctorDto>> {
    let url = format!("{}/doctor/list-id/inactive", api_url);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list inactive doctors. Try again later.").await?;

    read_json(response, "Unable to parse doctors.").await
}

pub async fn update_doctor(
    api_url: &str,
    token: &str,
    doctor_id: i64,
    data: &DoctorDto,
) -> Result<DoctorDto> {
    let url = format!("{}/doctor/update/{}", api_url, doctor_id);
    let request = Client::new().patch(url).bearer_auth(token).json(data);
    let response = send(request, "Unable to update doctor. Try again later.").await?;

    read_json(response, "Unable to parse doctor.").await
}

pub async fn unsubscribe_doctor(api_url: &str, token: &str, doctor_id: i64) -> Result<String> {
    let url = format!("{}/doctor/unsubscribe/{}", api_url, doctor_id);
    let request = Client::new()
        .patch(url)
        .bearer_auth(token)
        .json(&serde_json::json!({}));
    let response = send(request, "Unable to deactivate doctor. Try again later.").await?;

    read_text(response, "Unable to read doctor response.").await
}

pub async fn reactivate_doctor(api_url: &str, token: &str, doctor_id: i64) -> Result<String> {
    let url = format!("{}/doctor/reactivate/{}", api_url, doctor_id);
    let request = Client::new()
        .patch(url)
        .bearer_auth(token)
        .json(&serde_json::json!({}));
    let response = send(request, "Unable to reactivate doctor. Try again later.").await?;

    read_text(response, "Unable to read doctor response.").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::spawn_backend;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn doctor_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Ana",
            "surname": "Gómez",
            "dni": "30111222",
            "phone": "1155554444",
            "email": "ana@petsociety.test",
            "speciality": "NUTRITION"
        })
    }

    #[tokio::test]
    async fn test_list_accepts_page_or_array() {
        let router = Router::new().route(
            "/doctor/list",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                if q.contains_key("page") {
                    Json(json!({ "content": [doctor_json(1), doctor_json(2)], "totalElements": 2 }))
                } else {
                    Json(json!([doctor_json(1)]))
                }
            }),
        );
        let api_url = spawn_backend(router).await;

        let plain = list_doctors(&api_url, "tok", None).await.unwrap();
        assert_eq!(plain.len(), 1);

        let params = PageParams::default();
        let paged = list_doctors(&api_url, "tok", Some(&params)).await.unwrap();
        assert_eq!(paged.len(), 2);
        assert_eq!(paged[1].id, Some(2));
    }
}
