use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use clinic::diagnosis::can_create_diagnosis_opt;
use clinic::text::capitalize_proper_names;
use dto::appointment::{AppointmentDto, AppointmentHistoryDto, DoctorAvailabilityDto, TimeSpan};
use dto::dates::Dated;
use dto::diagnose::{DatedDiagnose, DiagnoseRequest};
use dto::doctor::DoctorDto;
use dto::pagination::{Page, PageParams};

use crate::Result;
use crate::ctx::Ctx;
use crate::run::AppState;
use crate::services::{appointments, diagnoses, doctors};

use super::{Ack, validated};

#[derive(Serialize)]
pub struct DoctorHome {
    pub doctor: DoctorDto,
    pub scheduled: Page<Dated<AppointmentDto>>,
}

pub async fn home_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<DoctorHome>> {
    let token = ctx.token()?;
    let doctor_id = ctx.user_id()?;
    let api_url = &state.config.api_url;

    let doctor = doctors::get_doctor(api_url, token, doctor_id).await?;
    let scheduled =
        appointments::scheduled_by_doctor(api_url, token, doctor_id, &PageParams::default())
            .await?;

    Ok(Json(DoctorHome {
        doctor,
        scheduled: scheduled.map(TimeSpan::dated),
    }))
}

pub async fn profile_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<DoctorDto>> {
    let doctor = doctors::get_doctor(&state.config.api_url, ctx.token()?, ctx.user_id()?).await?;
    Ok(Json(doctor))
}

pub async fn update_profile_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<DoctorDto>, JsonRejection>,
) -> Result<Json<DoctorDto>> {
    let mut data = validated(payload)?;
    let doctor_id = ctx.user_id()?;
    let (name, surname) = capitalize_proper_names(&data.name, &data.surname);
    data.id = Some(doctor_id);
    data.name = name;
    data.surname = surname;

    let doctor = doctors::update_doctor(&state.config.api_url, ctx.token()?, doctor_id, &data).await?;
    Ok(Json(doctor))
}

pub async fn appointments_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Dated<AppointmentDto>>>> {
    let page =
        appointments::scheduled_by_doctor(&state.config.api_url, ctx.token()?, ctx.user_id()?, &params)
            .await?;
    Ok(Json(page.map(TimeSpan::dated)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PastAppointment {
    #[serde(flatten)]
    pub appointment: Dated<AppointmentHistoryDto>,

    /// Whether the diagnosis form is open right now
    pub can_create_diagnosis: bool,
}

fn past_appointments(list: Vec<AppointmentHistoryDto>, now: NaiveDateTime) -> Vec<PastAppointment> {
    list.into_iter()
        .map(|a| {
            let appointment = a.dated();
            PastAppointment {
                can_create_diagnosis: !appointment.dto.has_diagnosis
                    && can_create_diagnosis_opt(appointment.start_date, appointment.end_date, now),
                appointment,
            }
        })
        .collect()
}

pub async fn past_appointments_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PastAppointment>>> {
    let list =
        appointments::past_by_doctor(&state.config.api_url, ctx.token()?, ctx.user_id()?).await?;
    Ok(Json(past_appointments(list, Local::now().naive_local())))
}

pub async fn diagnoses_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<DatedDiagnose>>> {
    let page =
        diagnoses::list_by_doctor(&state.config.api_url, ctx.token()?, ctx.user_id()?, &params)
            .await?;
    Ok(Json(page))
}

pub async fn diagnose_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(diagnose_id): Path<i64>,
) -> Result<Json<DatedDiagnose>> {
    let diagnose = diagnoses::get_diagnose(&state.config.api_url, ctx.token()?, diagnose_id).await?;
    Ok(Json(diagnose))
}

pub async fn create_diagnose_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<DiagnoseRequest>, JsonRejection>,
) -> Result<Json<DiagnoseRequest>> {
    let data = validated(payload)?;
    let created = diagnoses::create_diagnose(&state.config.api_url, ctx.token()?, &data).await?;

    info!("Diagnosis created for appointment {}", created.appointment_id);
    Ok(Json(created))
}

pub async fn pet_diagnoses_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<DatedDiagnose>>> {
    let page = diagnoses::list_by_pet(&state.config.api_url, ctx.token()?, pet_id, &params).await?;
    Ok(Json(page))
}

pub async fn availability_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<DoctorAvailabilityDto>, JsonRejection>,
) -> Result<Json<Ack>> {
    let data = validated(payload)?;
    let doctor_id = ctx.user_id()?;
    let message =
        appointments::upload_availability(&state.config.api_url, ctx.token()?, doctor_id, &data)
            .await?;

    info!("Availability uploaded for doctor {}", doctor_id);
    Ok(Ack::new(message))
}
