use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use clinic::filters::{AppointmentFilter, distinct_doctors, sort_newest_first};
use clinic::pagination::{PageItem, Paginator};
use clinic::text::capitalize_proper_names;
use dto::admin::AdminDto;
use dto::appointment::{AppointmentRequest, AppointmentResponseDto, Reason, Status, TimeSpan};
use dto::auth::RegisterRequest;
use dto::client::ClientDto;
use dto::dates::{Dated, parse_date};
use dto::doctor::{DoctorDto, RegisterDoctorDto};
use dto::pet::PetDto;

use crate::Result;
use crate::ctx::Ctx;
use crate::run::AppState;
use crate::services::{admins, appointments, clients, doctors, pets, register};

use super::{Ack, selected, validated};

const APPOINTMENTS_PER_PAGE: usize = 10;

#[derive(Serialize)]
pub struct AdminHome {
    pub admin: AdminDto,
    pub pending: usize,
}

pub async fn home_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<AdminHome>> {
    let token = ctx.token()?;
    let api_url = &state.config.api_url;

    let admin = admins::get_admin(api_url, token, ctx.user_id()?).await?;
    let pending = appointments::list_all(api_url, token)
        .await?
        .iter()
        .filter(|a| !a.approved && a.status == Status::ToBegin)
        .count();

    Ok(Json(AdminHome { admin, pending }))
}

pub async fn profile_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<AdminDto>> {
    let admin = admins::get_admin(&state.config.api_url, ctx.token()?, ctx.user_id()?).await?;
    Ok(Json(admin))
}

pub async fn update_profile_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<AdminDto>, JsonRejection>,
) -> Result<Json<AdminDto>> {
    update_admin(&state, &ctx, ctx.user_id()?, payload).await
}

/// Appointment list query. Blank values and `ALL` mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentsQuery {
    pub search: Option<String>,
    pub date: Option<String>,
    pub doctor: Option<String>,
    pub status: Option<String>,
    pub reason: Option<String>,
    pub approved: Option<String>,
    pub page: Option<usize>,
    pub size: Option<usize>,
}

impl AppointmentsQuery {
    fn filter(&self) -> AppointmentFilter {
        AppointmentFilter {
            search: selected(self.search.as_deref()).map(str::to_string),
            date: selected(self.date.as_deref()).and_then(parse_date),
            doctor: selected(self.doctor.as_deref()).map(str::to_string),
            status: selected(self.status.as_deref()).and_then(|s| Status::try_from(s).ok()),
            reason: selected(self.reason.as_deref()).and_then(|r| Reason::try_from(r).ok()),
            approved: selected(self.approved.as_deref()).and_then(|a| a.parse().ok()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentsView {
    pub appointments: Vec<Dated<AppointmentResponseDto>>,
    pub pagination: Paginator,
    pub pages: Vec<PageItem>,
    pub doctors: Vec<String>,
    pub filter: AppointmentFilter,
}

fn appointments_view(mut all: Vec<AppointmentResponseDto>, query: &AppointmentsQuery) -> AppointmentsView {
    sort_newest_first(&mut all);
    let filter = query.filter();
    let filtered = filter.apply(&all);

    let mut paginator = Paginator::new(
        filtered.len(),
        query.size.unwrap_or(APPOINTMENTS_PER_PAGE),
    );
    paginator.go_to(query.page.unwrap_or(1));

    AppointmentsView {
        appointments: paginator
            .slice(&filtered)
            .iter()
            .cloned()
            .map(TimeSpan::dated)
            .collect(),
        pages: paginator.display_pages(),
        pagination: paginator,
        doctors: distinct_doctors(&all),
        filter,
    }
}

pub async fn appointments_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<AppointmentsView>> {
    let all = appointments::list_all(&state.config.api_url, ctx.token()?).await?;
    Ok(Json(appointments_view(all, &query)))
}

pub async fn available_appointments_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Dated<AppointmentResponseDto>>>> {
    let list = appointments::list_available(&state.config.api_url, ctx.token()?).await?;
    Ok(Json(list.into_iter().map(TimeSpan::dated).collect()))
}

pub async fn create_appointment_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<AppointmentRequest>, JsonRejection>,
) -> Result<Json<Dated<AppointmentResponseDto>>> {
    let data = validated(payload)?;
    let created = appointments::create_appointment(&state.config.api_url, ctx.token()?, &data).await?;

    info!("Appointment {} created", created.id);
    Ok(Json(created.dated()))
}

pub async fn appointment_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Dated<AppointmentResponseDto>>> {
    let appointment =
        appointments::get_appointment(&state.config.api_url, ctx.token()?, appointment_id).await?;
    Ok(Json(appointment.dated()))
}

pub async fn update_appointment_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
    payload: std::result::Result<Json<AppointmentRequest>, JsonRejection>,
) -> Result<Json<Dated<AppointmentResponseDto>>> {
    let data = validated(payload)?;
    let updated =
        appointments::update_appointment(&state.config.api_url, ctx.token()?, appointment_id, &data)
            .await?;
    Ok(Json(updated.dated()))
}

pub async fn cancel_appointment_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Ack>> {
    let message =
        appointments::cancel_appointment(&state.config.api_url, ctx.token()?, appointment_id)
            .await?;
    Ok(Ack::new(message))
}

pub async fn approve_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Dated<AppointmentResponseDto>>> {
    let appointment =
        appointments::approve(&state.config.api_url, ctx.token()?, appointment_id).await?;
    info!("Appointment {} approved", appointment_id);
    Ok(Json(appointment.dated()))
}

pub async fn disapprove_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Dated<AppointmentResponseDto>>> {
    let appointment =
        appointments::disapprove(&state.config.api_url, ctx.token()?, appointment_id).await?;
    info!("Appointment {} disapproved", appointment_id);
    Ok(Json(appointment.dated()))
}

pub async fn active_doctors_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<Vec<DoctorDto>>> {
    let list = doctors::list_active_doctors(&state.config.api_url, ctx.token()?).await?;
    Ok(Json(list))
}

pub async fn inactive_doctors_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<Vec<DoctorDto>>> {
    let list = doctors::list_inactive_doctors(&state.config.api_url, ctx.token()?).await?;
    Ok(Json(list))
}

pub async fn register_doctor_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterDoctorDto>, JsonRejection>,
) -> Result<Json<Ack>> {
    let mut data = validated(payload)?;
    let (name, surname) = capitalize_proper_names(&data.name, &data.surname);
    data.name = name;
    data.surname = surname;

    register::register_doctor(&state.config.api_url, &data).await?;
    info!("Doctor {} registered", data.username);
    Ok(Ack::new("Veterinario registrado exitosamente"))
}

pub async fn doctor_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<DoctorDto>> {
    let doctor = doctors::get_doctor(&state.config.api_url, ctx.token()?, doctor_id).await?;
    Ok(Json(doctor))
}

pub async fn update_doctor_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
    payload: std::result::Result<Json<DoctorDto>, JsonRejection>,
) -> Result<Json<DoctorDto>> {
    let mut data = validated(payload)?;
    let (name, surname) = capitalize_proper_names(&data.name, &data.surname);
    data.id = Some(doctor_id);
    data.name = name;
    data.surname = surname;

    let doctor = doctors::update_doctor(&state.config.api_url, ctx.token()?, doctor_id, &data).await?;
    Ok(Json(doctor))
}

pub async fn deactivate_doctor_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Ack>> {
    let message = doctors::unsubscribe_doctor(&state.config.api_url, ctx.token()?, doctor_id).await?;
    info!("Doctor {} deactivated", doctor_id);
    Ok(Ack::new(message))
}

pub async fn reactivate_doctor_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Ack>> {
    let message = doctors::reactivate_doctor(&state.config.api_url, ctx.token()?, doctor_id).await?;
    info!("Doctor {} reactivated", doctor_id);
    Ok(Ack::new(message))
}

pub async fn doctor_available_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Vec<Dated<AppointmentResponseDto>>>> {
    let list =
        appointments::available_by_doctor(&state.config.api_url, ctx.token()?, doctor_id).await?;
    Ok(Json(list.into_iter().map(TimeSpan::dated).collect()))
}

pub async fn active_admins_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminDto>>> {
    let list = admins::list_active_admins(&state.config.api_url, ctx.token()?).await?;
    Ok(Json(list))
}

pub async fn inactive_admins_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminDto>>> {
    let list = admins::list_inactive_admins(&state.config.api_url, ctx.token()?).await?;
    Ok(Json(list))
}

pub async fn register_admin_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<Ack>> {
    let mut data = validated(payload)?;
    let (name, surname) = capitalize_proper_names(&data.name, &data.surname);
    data.name = name;
    data.surname = surname;

    register::register_admin(&state.config.api_url, &data).await?;
    info!("Admin {} registered", data.username);
    Ok(Ack::new("Administrador registrado exitosamente"))
}

pub async fn admin_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(admin_id): Path<i64>,
) -> Result<Json<AdminDto>> {
    let admin = admins::get_admin(&state.config.api_url, ctx.token()?, admin_id).await?;
    Ok(Json(admin))
}

async fn update_admin(
    state: &AppState,
    ctx: &Ctx,
    admin_id: i64,
    payload: std::result::Result<Json<AdminDto>, JsonRejection>,
) -> Result<Json<AdminDto>> {
    let mut data = validated(payload)?;
    let (name, surname) = capitalize_proper_names(&data.name, &data.surname);
    data.id = Some(admin_id);
    data.name = name;
    data.surname = surname;

    let admin = admins::update_admin(&state.config.api_url, ctx.token()?, admin_id, &data).await?;
    Ok(Json(admin))
}

pub async fn update_admin_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(admin_id): Path<i64>,
    payload: std::result::Result<Json<AdminDto>, JsonRejection>,
) -> Result<Json<AdminDto>> {
    update_admin(&state, &ctx, admin_id, payload).await
}

pub async fn deactivate_admin_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(admin_id): Path<i64>,
) -> Result<Json<Ack>> {
    let message = admins::unsubscribe_admin(&state.config.api_url, ctx.token()?, admin_id).await?;
    info!("Admin {} deactivated", admin_id);
    Ok(Ack::new(message))
}

pub async fn reactivate_admin_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(admin_id): Path<i64>,
) -> Result<Json<Ack>> {
    let message = admins::reactivate_admin(&state.config.api_url, ctx.token()?, admin_id).await?;
    info!("Admin {} reactivated", admin_id);
    Ok(Ack::new(message))
}

pub async fn client_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> Result<Json<ClientDto>> {
    let client = clients::get_client(&state.config.api_url, ctx.token()?, client_id).await?;
    Ok(Json(client))
}

pub async fn unsubscribe_client_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> Result<Json<Ack>> {
    let message = clients::unsubscribe_client(&state.config.api_url, ctx.token()?, client_id).await?;
    info!("Client {} unsubscribed", client_id);
    Ok(Ack::new(message))
}

pub async fn client_pets_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<PetDto>>> {
    let list = pets::list_pets(&state.config.api_url, ctx.token()?, client_id).await?;
    Ok(Json(list))
}

pub async fn pet_appointments_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<Vec<Dated<AppointmentResponseDto>>>> {
    let list = appointments::list_by_pet(&state.config.api_url, ctx.token()?, pet_id).await?;
    Ok(Json(list.into_iter().map(TimeSpan::dated).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(id: i64, day: u32, doctor: &str, status: Status) -> AppointmentResponseDto {
        AppointmentResponseDto {
            id,
            start_time: format!("2025-03-{:02}T10:00:00", day),
            end_time: format!("2025-03-{:02}T10:15:00", day),
            doctor_name: doctor.to_string(),
            client_name: Some("Juan Pérez".to_string()),
            pet_name: Some("Toby".to_string()),
            reason: Reason::Control,
            approved: false,
            status,
            diagnose: None,
            treatment: None,
        }
    }

    #[test]
    fn test_query_blank_and_all_are_ignored() {
        let query = AppointmentsQuery {
            search: Some("  ".to_string()),
            status: Some("ALL".to_string()),
            reason: Some("EMERGENCY".to_string()),
            date: Some("2025-03-02".to_string()),
            approved: Some("false".to_string()),
            ..Default::default()
        };
        let filter = query.filter();
        assert_eq!(filter.search, None);
        assert_eq!(filter.status, None);
        assert_eq!(filter.reason, Some(Reason::Emergency));
        assert_eq!(filter.date, chrono::NaiveDate::from_ymd_opt(2025, 3, 2));
        assert_eq!(filter.approved, Some(false));
    }

    #[test]
    fn test_appointments_view_pages_newest_first() {
        let all: Vec<AppointmentResponseDto> = (1..=25)
            .map(|day| {
                let doctor = if day % 2 == 0 { "Ana Gómez" } else { "Luis Díaz" };
                appointment(day as i64, day, doctor, Status::ToBegin)
            })
            .collect();

        let view = appointments_view(
            all.clone(),
            &AppointmentsQuery {
                page: Some(3),
                ..Default::default()
            },
        );
        assert_eq!(view.pagination.current_page, 3);
        assert_eq!(view.appointments.len(), 5);
        assert_eq!(view.appointments[0].dto.id, 5);
        assert_eq!(view.doctors.len(), 2);

        let view = appointments_view(
            all,
            &AppointmentsQuery {
                doctor: Some("Ana Gómez".to_string()),
                page: Some(99),
                ..Default::default()
            },
        );
        assert_eq!(view.pagination.total_items, 12);
        assert_eq!(view.pagination.current_page, 2);
        assert!(view.appointments.iter().all(|a| a.dto.doctor_name == "Ana Gómez"));
    }
}
