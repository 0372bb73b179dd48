use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use clinic::filters::{HistoryFilter, PetOption, distinct_pets};
use clinic::pagination::LoadMore;
use clinic::text::capitalize_proper_names;
use dto::appointment::{
    AppointmentHistoryDto, AppointmentResponseDto, Reason, Status, TimeSpan,
};
use dto::client::ClientDto;
use dto::dates::Dated;
use dto::diagnose::DatedDiagnose;
use dto::pagination::{Page, PageParams};
use dto::pet::PetDto;

use crate::ctx::Ctx;
use crate::run::AppState;
use crate::services::{appointments, clients, diagnoses, pets};
use crate::{Error, Result};

use super::{Ack, clear_session, selected, validated};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetView {
    #[serde(flatten)]
    pub pet: PetDto,
    pub type_label: String,
    pub emoji: &'static str,
}

impl From<PetDto> for PetView {
    fn from(pet: PetDto) -> Self {
        Self {
            type_label: pet.type_label(),
            emoji: pet.pet_type.emoji(),
            pet,
        }
    }
}

#[derive(Serialize)]
pub struct ClientHome {
    pub client: ClientDto,
    pub pets: Vec<PetView>,
}

pub async fn home_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<ClientHome>> {
    let token = ctx.token()?;
    let client_id = ctx.user_id()?;
    let api_url = &state.config.api_url;

    let client = clients::get_client(api_url, token, client_id).await?;
    let pets = pets::list_pets(api_url, token, client_id).await?;

    Ok(Json(ClientHome {
        client,
        pets: pets.into_iter().map(PetView::from).collect(),
    }))
}

pub async fn profile_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<ClientDto>> {
    let client = clients::get_client(&state.config.api_url, ctx.token()?, ctx.user_id()?).await?;
    Ok(Json(client))
}

pub async fn update_profile_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<ClientDto>, JsonRejection>,
) -> Result<Json<ClientDto>> {
    let mut data = validated(payload)?;
    let (name, surname) = capitalize_proper_names(&data.name, &data.surname);
    data.name = name;
    data.surname = surname;

    let client =
        clients::update_client(&state.config.api_url, ctx.token()?, ctx.user_id()?, &data).await?;
    Ok(Json(client))
}

/// Closes the account and ends the session.
pub async fn unsubscribe_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Ack>)> {
    let message =
        clients::unsubscribe_client(&state.config.api_url, ctx.token()?, ctx.user_id()?).await?;
    Ok((clear_session(jar), Ack::new(message)))
}

pub async fn pets_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PetView>>> {
    let pets = pets::list_pets(&state.config.api_url, ctx.token()?, ctx.user_id()?).await?;
    Ok(Json(pets.into_iter().map(PetView::from).collect()))
}

pub async fn create_pet_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<PetDto>, JsonRejection>,
) -> Result<Json<PetView>> {
    let mut data = validated(payload)?;
    data.id = None;
    data.client_id = ctx.user_id()?;

    let pet = pets::create_pet(&state.config.api_url, ctx.token()?, &data).await?;
    Ok(Json(PetView::from(pet)))
}

pub async fn update_pet_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
    payload: std::result::Result<Json<PetDto>, JsonRejection>,
) -> Result<Json<PetView>> {
    let mut data = validated(payload)?;
    data.id = Some(pet_id);
    data.client_id = ctx.user_id()?;

    let pet = pets::update_pet(&state.config.api_url, ctx.token()?, pet_id, &data).await?;
    Ok(Json(PetView::from(pet)))
}

pub async fn delete_pet_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<Ack>> {
    let message = pets::delete_pet(&state.config.api_url, ctx.token()?, pet_id).await?;
    Ok(Ack::new(message))
}

/// Fails with not found when the pet is not one of the client's.
pub async fn ensure_own_pet(state: &AppState, ctx: &Ctx, pet_id: i64) -> Result<PetDto> {
    let pets = pets::list_pets(&state.config.api_url, ctx.token()?, ctx.user_id()?).await?;
    pets.into_iter()
        .find(|p| p.id == Some(pet_id))
        .ok_or_else(|| Error::NotFound {
            msg: "No se encontró la mascota.".to_string(),
        })
}

pub async fn pet_appointments_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<Vec<Dated<AppointmentResponseDto>>>> {
    let list = appointments::list_all_by_pet(&state.config.api_url, ctx.token()?, pet_id).await?;
    Ok(Json(list.into_iter().map(TimeSpan::dated).collect()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledView {
    pub appointment_id: Option<i64>,
}

pub async fn pet_scheduled_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<ScheduledView>> {
    let appointment_id =
        appointments::scheduled_id_by_pet(&state.config.api_url, ctx.token()?, pet_id).await?;
    Ok(Json(ScheduledView { appointment_id }))
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

pub async fn appointments_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Dated<AppointmentResponseDto>>>> {
    let mut list =
        appointments::list_by_client(&state.config.api_url, ctx.token()?, ctx.user_id()?).await?;
    clinic::filters::sort_newest_first(&mut list);
    Ok(Json(list.into_iter().map(TimeSpan::dated).collect()))
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

/// History filters. Blank values and `ALL` mean "no filter".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub status: Option<String>,
    pub pet_id: Option<String>,
    pub reason: Option<String>,

    /// How many times "load more" was pressed, plus one
    pub rounds: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub appointments: Vec<Dated<AppointmentHistoryDto>>,
    pub total: usize,
    pub has_more: bool,
    pub filter: HistoryFilter,
    pub pets: Vec<PetOption>,
}

fn history_view(history: &[AppointmentHistoryDto], query: HistoryQuery) -> HistoryView {
    let filter = HistoryFilter {
        status: selected(query.status.as_deref()).and_then(|s| Status::try_from(s).ok()),
        pet_id: selected(query.pet_id.as_deref()).and_then(|p| p.parse().ok()),
        reason: selected(query.reason.as_deref()).and_then(|r| Reason::try_from(r).ok()),
    };
    let filtered = filter.apply(history);
    let pager = LoadMore::rounds(LoadMore::HISTORY_STEP, query.rounds.unwrap_or(1));

    HistoryView {
        appointments: pager
            .visible(&filtered)
            .iter()
            .cloned()
            .map(TimeSpan::dated)
            .collect(),
        total: filtered.len(),
        has_more: pager.has_more(filtered.len()),
        filter,
        pets: distinct_pets(history),
    }
}

pub async fn history_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryView>> {
    let history =
        appointments::history_by_client(&state.config.api_url, ctx.token()?, ctx.user_id()?)
            .await?;
    Ok(Json(history_view(&history, query)))
}

pub async fn diagnoses_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<DatedDiagnose>>> {
    let page =
        diagnoses::latest_by_client(&state.config.api_url, ctx.token()?, ctx.user_id()?, &params)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, pet_id: i64, status: Status) -> AppointmentHistoryDto {
        AppointmentHistoryDto {
            appointment_id: id,
            start_time: Some("2025-03-01T10:00:00".to_string()),
            end_time: Some("2025-03-01T10:15:00".to_string()),
            doctor_name: "Ana Gómez".to_string(),
            doctor_id: Some(2),
            doctor_speciality: None,
            client_name: None,
            pet_name: format!("pet-{}", pet_id),
            pet_id,
            pet_type: None,
            other_type: None,
            reason: Reason::Control,
            status,
            has_diagnosis: false,
            diagnosis_id: None,
        }
    }

    #[test]
    fn test_history_view_loads_in_steps() {
        let history: Vec<AppointmentHistoryDto> = (1..=30)
            .map(|id| entry(id, 10 + id % 2, Status::Successfully))
            .collect();

        let view = history_view(&history, HistoryQuery::default());
        assert_eq!(view.appointments.len(), 12);
        assert_eq!(view.total, 30);
        assert!(view.has_more);
        assert_eq!(view.pets.len(), 2);

        let view = history_view(
            &history,
            HistoryQuery {
                rounds: Some(3),
                ..Default::default()
            },
        );
        assert_eq!(view.appointments.len(), 30);
        assert!(!view.has_more);
    }

    #[test]
    fn test_history_view_filters_keep_all_pets() {
        let history = vec![
            entry(1, 10, Status::Successfully),
            entry(2, 11, Status::Canceled),
        ];
        let view = history_view(
            &history,
            HistoryQuery {
                pet_id: Some("11".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(view.total, 1);
        assert_eq!(view.appointments[0].dto.appointment_id, 2);
        assert_eq!(view.pets.len(), 2);
    }

    #[test]
    fn test_history_query_all_means_no_filter() {
        let history = vec![
            entry(1, 10, Status::Successfully),
            entry(2, 11, Status::Canceled),
        ];
        let uri: axum::http::Uri = "/client/history?status=ALL&reason=ALL&petId=ALL"
            .parse()
            .unwrap();
        let Query(query) = Query::<HistoryQuery>::try_from_uri(&uri).unwrap();

        let view = history_view(&history, query);
        assert_eq!(view.total, 2);
        assert!(view.filter.status.is_none());
        assert!(view.filter.reason.is_none());
        assert!(view.filter.pet_id.is_none());

        let uri: axum::http::Uri = "/client/history?status=CANCELED".parse().unwrap();
        let Query(query) = Query::<HistoryQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(history_view(&history, query).total, 1);
    }

    #[test]
    fn test_history_view_huge_rounds_shows_everything() {
        let history = vec![entry(1, 10, Status::Successfully)];
        let view = history_view(
            &history,
            HistoryQuery {
                rounds: Some(usize::MAX),
                ..Default::default()
            },
        );
        assert_eq!(view.appointments.len(), 1);
        assert!(!view.has_more);
    }
}
