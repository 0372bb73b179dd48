use reqwest::Client;

use dto::diagnose::{DatedDiagnose, DiagnoseDto, DiagnoseRequest, DiagnoseResponseDto};
use dto::pagination::{Page, PageParams};

use crate::Result;

use super::{read_json, send};

fn to_dated(page: Page<DiagnoseResponseDto>) -> Page<DatedDiagnose> {
    page.map(|dto| DiagnoseDto::from(dto).dated())
}

pub async fn list_by_doctor(
    api_url: &str,
    token: &str,
    doctor_id: i64,
    params: &PageParams,
) -> Result<Page<DatedDiagnose>> {
    let url = format!("{}/diagnoses/getByDoctorId/{}", api_url, doctor_id);
    let request = Client::new().get(url).bearer_auth(token).query(params);
    let response = send(request, "Unable to list diagnoses. Try again later.").await?;

    let page: Page<DiagnoseResponseDto> = read_json(response, "Unable to parse diagnoses.").await?;
    Ok(to_dated(page))
}

pub async fn get_diagnose(api_url: &str, token: &str, diagnose_id: i64) -> Result<DatedDiagnose> {
    let url = format!("{}/diagnoses/findById/{}", api_url, diagnose_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to get diagnosis. Try again later.").await?;

    let dto: DiagnoseResponseDto = read_json(response, "Unable to parse diagnosis.").await?;
    Ok(DiagnoseDto::from(dto).dated())
}

pub async fn list_by_pet(
    api_url: &str,
    token: &str,
    pet_id: i64,
    params: &PageParams,
) -> Result<Page<DatedDiagnose>> {
    let url = format!("{}/diagnoses/getByPetId/{}", api_url, pet_id);
    let request = Client::new().get(url).bearer_auth(token).query(params);
    let response = send(request, "Unable to list diagnoses. Try again later.").await?;

    let page: Page<DiagnoseResponseDto> = read_json(response, "Unable to parse diagnoses.").await?;
    Ok(to_dated(page))
}

pub async fn create_diagnose(
    api_url: &str,
    token: &str,
    data: &DiagnoseRequest,
) -> Result<DiagnoseRequest> {
    let url = format!("{}/diagnoses/create", api_url);
    let request = Client::new().post(url).bearer_auth(token).json(data);
    let response = send(request, "Unable to create diagnosis. Try again later.").await?;

    read_json(response, "Unable to parse diagnosis.").await
}

/// Latest diagnoses across all pets of the client
pub async fn latest_by_client(
    api_url: &str,
    token: &str,
    client_id: i64,
    params: &PageParams,
) -> Result<Page<DatedDiagnose>> {
    let url = format!("{}/diagnoses/lastDiagnoses/{}", api_url, client_id);
    let request = Client::new()
        .get(url)
        .bearer_auth(token)
        .query(&[("page", params.page), ("size", params.size)]);
    let response = send(request, "Unable to list diagnoses. Try again later.").await?;

    let page: Page<DiagnoseResponseDto> = read_json(response, "Unable to parse diagnoses.").await?;
    Ok(to_dated(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::spawn_backend;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    fn backend() -> Router {
        Router::new()
            .route(
                "/diagnoses/getByPetId/{id}",
                get(|| async {
                    Json(json!({
                        "content": [{
                            "id": 1,
                            "diagnose": "Otitis",
                            "treatment": "Gotas",
                            "doctorName": "Ana Gómez",
                            "petName": "Firulais",
                            "appointmentReason": "CONTROL",
                            "appointmentStartTime": "2025-03-01T10:00:00",
                            "appointmentEndTime": "bad",
                            "date": "2025-03-01T10:20:00"
                        }],
                        "totalElements": 1,
                        "totalPages": 1,
                        "number": 0,
                        "size": 5
                    }))
                }),
            )
            .route(
                "/diagnoses/create",
                post(|| async {
                    (
                        StatusCode::CONFLICT,
                        "No se puede crear un diagnóstico antes de que comience la cita",
                    )
                }),
            )
    }

    #[tokio::test]
    async fn test_pet_diagnoses_are_dated() {
        let api_url = spawn_backend(backend()).await;
        let page = list_by_pet(&api_url, "tok", 11, &PageParams::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);

        let first = &page.content[0];
        assert_eq!(first.dto.reason, "CONTROL");
        assert!(first.diagnosis_date.is_some());
        assert!(first.appointment_start_date.is_some());
        assert!(first.appointment_end_date.is_none());
    }

    #[tokio::test]
    async fn test_create_too_early() {
        let api_url = spawn_backend(backend()).await;
        let data = DiagnoseRequest {
            appointment_id: 1,
            diagnose: "Otitis".to_string(),
            treatment: "Gotas".to_string(),
        };
        let err = create_diagnose(&api_url, "tok", &data).await.err().unwrap();
        assert_eq!(
            err.to_string(),
            "No se puede crear un diagnóstico antes de que comience la cita."
        );
    }
}
