use chrono::NaiveDate;
use reqwest::Client;

use dto::appointment::{
    AppointmentDto, AppointmentHistoryDto, AppointmentRequest, AppointmentResponseDto,
    AssignPetRequest, AvailableAppointmentDto, DoctorAvailabilityDto, Reason,
};
use dto::dates::parse_date;
use dto::pagination::{Page, PageParams};

use crate::Result;

use super::{read_json, read_text, send};

pub async fn create_appointment(
    api_url: &str,
    token: &str,
    data: &AppointmentRequest,
) -> Result<AppointmentResponseDto> {
    let url = format!("{}/appointment/create", api_url);
    let request = Client::new().post(url).bearer_auth(token).json(data);
    let response = send(request, "Unable to create appointment. Try again later.").await?;

    read_json(response, "Unable to parse appointment.").await
}

pub async fn update_appointment(
    api_url: &str,
    token: &str,
    appointment_id: i64,
    data: &AppointmentRequest,
) -> Result<AppointmentResponseDto> {
    let url = format!("{}/appointment/update/{}", api_url, appointment_id);
    let request = Client::new().put(url).bearer_auth(token).json(data);
    let response = send(request, "Unable to update appointment. Try again later.").await?;

    read_json(response, "Unable to parse appointment.").await
}

pub async fn cancel_appointment(api_url: &str, token: &str, appointment_id: i64) -> Result<String> {
    let url = format!("{}/appointment/cancel/{}", api_url, appointment_id);
    let request = Client::new().delete(url).bearer_auth(token);
    let response = send(request, "Unable to cancel appointment. Try again later.").await?;

    read_text(response, "Unable to read cancel response.").await
}

pub async fn get_appointment(
    api_url: &str,
    token: &str,
    appointment_id: i64,
) -> Result<AppointmentResponseDto> {
    let url = format!("{}/appointment/findAppointment/{}", api_url, appointment_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to get appointment. Try again later.").await?;

    read_json(response, "Unable to parse appointment.").await
}

pub async fn list_by_client(
    api_url: &str,
    token: &str,
    client_id: i64,
) -> Result<Vec<AppointmentResponseDto>> {
    let url = format!("{}/appointment/client/{}", api_url, client_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list appointments. Try again later.").await?;

    read_json(response, "Unable to parse appointments.").await
}

pub async fn history_by_client(
    api_url: &str,
    token: &str,
    client_id: i64,
) -> Result<Vec<AppointmentHistoryDto>> {
    let url = format!("{}/appointment/client/{}/history", api_url, client_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to get appointment history. Try again later.").await?;

    read_json(response, "Unable to parse appointment history.").await
}

pub async fn scheduled_by_doctor(
    api_url: &str,
    token: &str,
    doctor_id: i64,
    params: &PageParams,
) -> Result<Page<AppointmentDto>> {
    let url = format!("{}/appointment/doctor/{}", api_url, doctor_id);
    let request = Client::new().get(url).bearer_auth(token).query(params);
    let response = send(request, "Unable to list scheduled appointments. Try again later.").await?;

    read_json(response, "Unable to parse scheduled appointments.").await
}

pub async fn past_by_doctor(
    api_url: &str,
    token: &str,
    doctor_id: i64,
) -> Result<Vec<AppointmentHistoryDto>> {
    let url = format!("{}/appointment/pastByDoctor/{}", api_url, doctor_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list past appointments. Try again later.").await?;

    read_json(response, "Unable to parse past appointments.").await
}

pub async fn upload_availability(
    api_url: &str,
    token: &str,
    doctor_id: i64,
    data: &DoctorAvailabilityDto,
) -> Result<String> {
    let url = format!("{}/appointment/uploadAvailability/{}", api_url, doctor_id);
    let request = Client::new().post(url).bearer_auth(token).json(data);
    let response = send(request, "Unable to upload availability. Try again later.").await?;

    read_text(response, "Unable to read availability response.").await
}

pub async fn list_by_pet(
    api_url: &str,
    token: &str,
    pet_id: i64,
) -> Result<Vec<AppointmentResponseDto>> {
    let url = format!("{}/appointment/pet/{}", api_url, pet_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list pet appointments. Try again later.").await?;

    read_json(response, "Unable to parse pet appointments.").await
}

/// Past and scheduled appointments of the pet
pub async fn list_all_by_pet(
    api_url: &str,
    token: &str,
    pet_id: i64,
) -> Result<Vec<AppointmentResponseDto>> {
    let url = format!("{}/appointment/pet/{}/all", api_url, pet_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list pet appointments. Try again later.").await?;

    read_json(response, "Unable to parse pet appointments.").await
}

/// Id of the upcoming appointment of the pet, if any
pub async fn scheduled_id_by_pet(api_url: &str, token: &str, pet_id: i64) -> Result<Option<i64>> {
    let url = format!("{}/appointment/pet/{}/scheduled-id", api_url, pet_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to get scheduled appointment. Try again later.").await?;

    read_json(response, "Unable to parse scheduled appointment.").await
}

pub async fn available_by_doctor(
    api_url: &str,
    token: &str,
    doctor_id: i64,
) -> Result<Vec<AppointmentResponseDto>> {
    let url = format!("{}/appointment/doctor/{}/available", api_url, doctor_id);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list available appointments. Try again later.").await?;

    read_json(response, "Unable to parse available appointments.").await
}

pub async fn list_available(api_url: &str, token: &str) -> Result<Vec<AppointmentResponseDto>> {
    let url = format!("{}/appointment/available", api_url);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list available appointments. Try again later.").await?;

    read_json(response, "Unable to parse available appointments.").await
}

pub async fn available_by_reason(
    api_url: &str,
    token: &str,
    reason: Reason,
) -> Result<Vec<AvailableAppointmentDto>> {
    let url = format!("{}/appointment/available/reason/{}", api_url, reason);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list available appointments. Try again later.").await?;

    read_json(response, "Unable to parse available appointments.").await
}

pub async fn available_by_reason_and_date(
    api_url: &str,
    token: &str,
    reason: Reason,
    date: NaiveDate,
) -> Result<Vec<AvailableAppointmentDto>> {
    let url = format!("{}/appointment/available/reason/{}/date", api_url, reason);
    let date = date.format("%Y-%m-%d").to_string();
    let request = Client::new()
        .get(url)
        .bearer_auth(token)
        .query(&[("date", date)]);
    let response = send(request, "Unable to list available slots. Try again later.").await?;

    read_json(response, "Unable to parse available slots.").await
}

/// Days with free slots. Entries that are not dates are skipped.
pub async fn available_days_by_reason(
    api_url: &str,
    token: &str,
    reason: Reason,
) -> Result<Vec<NaiveDate>> {
    let url = format!("{}/appointment/available/reason/{}/days", api_url, reason);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list available days. Try again later.").await?;

    let days: Vec<String> = read_json(response, "Unable to parse available days.").await?;
    Ok(days.iter().filter_map(|d| parse_date(d)).collect())
}

pub async fn assign_pet(
    api_url: &str,
    token: &str,
    appointment_id: i64,
    pet_id: i64,
) -> Result<AppointmentResponseDto> {
    let url = format!("{}/appointment/assign/{}", api_url, appointment_id);
    let data = AssignPetRequest { pet_id };
    let request = Client::new().patch(url).bearer_auth(token).json(&data);
    let response = send(request, "Unable to book appointment. Try again later.").await?;

    read_json(response, "Unable to parse appointment.").await
}

pub async fn approve(api_url: &str, token: &str, appointment_id: i64) -> Result<AppointmentResponseDto> {
    let url = format!("{}/appointment/approve/{}", api_url, appointment_id);
    let request = Client::new()
        .patch(url)
        .bearer_auth(token)
        .json(&serde_json::json!({}));
    let response = send(request, "Unable to approve appointment. Try again later.").await?;

    read_json(response, "Unable to parse appointment.").await
}

pub async fn disapprove(
    api_url: &str,
    token: &str,
    appointment_id: i64,
) -> Result<AppointmentResponseDto> {
    let url = format!("{}/appointment/disapprove/{}", api_url, appointment_id);
    let request = Client::new()
        .patch(url)
        .bearer_auth(token)
        .json(&serde_json::json!({}));
    let response = send(request, "Unable to disapprove appointment. Try again later.").await?;

    read_json(response, "Unable to parse appointment.").await
}

pub async fn list_all(api_url: &str, token: &str) -> Result<Vec<AppointmentResponseDto>> {
    let url = format!("{}/appointment/getAll", api_url);
    let request = Client::new().get(url).bearer_auth(token);
    let response = send(request, "Unable to list appointments. Try again later.").await?;

    read_json(response, "Unable to parse appointments.").await
}
