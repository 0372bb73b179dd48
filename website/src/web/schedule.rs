use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use clinic::wizard::{ScheduleWizard, WizardError, WizardView};
use dto::appointment::{AppointmentResponseDto, Reason, TimeSpan};
use dto::dates::Dated;

use crate::ctx::Ctx;
use crate::run::AppState;
use crate::services::availability::ApiAvailability;
use crate::{Error, Result};

use super::client::ensure_own_pet;
use super::{Ack, json_body};

#[derive(Debug, Serialize)]
pub struct ScheduleView {
    pub wizard: WizardView,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Dated<AppointmentResponseDto>>,
}

impl ScheduleView {
    fn of(wizard: &ScheduleWizard) -> Json<Self> {
        Json(Self {
            wizard: wizard.view(today()),
            appointment: None,
        })
    }
}

#[derive(Deserialize)]
pub struct ReasonForm {
    pub reason: Reason,
}

#[derive(Deserialize)]
pub struct DayForm {
    pub date: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotForm {
    pub appointment_id: i64,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Turns a wizard failure into a response outcome.
///
/// Backend failures leave the wizard with an error notice and are shown as a
/// regular view, except for a rejected session. Anything else is a request
/// the wizard cannot honor on its current step.
fn settle<T>(result: std::result::Result<T, WizardError<Error>>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(WizardError::Provider {
            source: Error::LoginRequired,
        }) => Err(Error::LoginRequired),
        Err(WizardError::Provider { source: e }) => {
            warn!("Booking backend call failed: {}", e);
            Ok(None)
        }
        Err(e) => Err(Error::BadRequest { msg: e.to_string() }),
    }
}

pub async fn start_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<ScheduleView>> {
    ensure_own_pet(&state, &ctx, pet_id).await?;

    let wizard = ScheduleWizard::new(pet_id, today());
    let view = ScheduleView::of(&wizard);
    state.wizards.start((ctx.user_id()?, pet_id), wizard)?;

    info!(
        "Booking started for pet {}, {} in progress",
        pet_id,
        state.wizards.len()
    );
    Ok(view)
}

pub async fn view_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<ScheduleView>> {
    let wizard = state.wizards.lease((ctx.user_id()?, pet_id))?;
    Ok(ScheduleView::of(&wizard))
}

pub async fn reason_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
    payload: std::result::Result<Json<ReasonForm>, JsonRejection>,
) -> Result<Json<ScheduleView>> {
    let form = json_body(payload)?;
    let provider = ApiAvailability {
        api_url: &state.config.api_url,
        token: ctx.token()?,
    };

    let mut wizard = state.wizards.lease((ctx.user_id()?, pet_id))?;
    settle(wizard.select_reason(&provider, form.reason).await)?;
    Ok(ScheduleView::of(&wizard))
}

pub async fn day_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
    payload: std::result::Result<Json<DayForm>, JsonRejection>,
) -> Result<Json<ScheduleView>> {
    let form = json_body(payload)?;
    let provider = ApiAvailability {
        api_url: &state.config.api_url,
        token: ctx.token()?,
    };

    let mut wizard = state.wizards.lease((ctx.user_id()?, pet_id))?;
    settle(wizard.select_day(&provider, form.date, today()).await)?;
    Ok(ScheduleView::of(&wizard))
}

pub async fn slot_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
    payload: std::result::Result<Json<SlotForm>, JsonRejection>,
) -> Result<Json<ScheduleView>> {
    let form = json_body(payload)?;

    let mut wizard = state.wizards.lease((ctx.user_id()?, pet_id))?;
    settle(wizard.select_slot::<Error>(form.appointment_id))?;
    Ok(ScheduleView::of(&wizard))
}

pub async fn confirm_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<ScheduleView>> {
    let provider = ApiAvailability {
        api_url: &state.config.api_url,
        token: ctx.token()?,
    };

    let mut wizard = state.wizards.lease((ctx.user_id()?, pet_id))?;
    let appointment = settle(wizard.confirm(&provider).await)?;
    if let Some(appointment) = &appointment {
        info!("Appointment {} booked for pet {}", appointment.id, pet_id);
    }

    let view = wizard.view(today());
    if wizard.is_completed() {
        wizard.finish();
    }

    Ok(Json(ScheduleView {
        wizard: view,
        appointment: appointment.map(TimeSpan::dated),
    }))
}

pub async fn back_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<ScheduleView>> {
    let mut wizard = state.wizards.lease((ctx.user_id()?, pet_id))?;
    settle(wizard.back::<Error>())?;
    Ok(ScheduleView::of(&wizard))
}

pub async fn previous_month_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<ScheduleView>> {
    let mut wizard = state.wizards.lease((ctx.user_id()?, pet_id))?;
    wizard.previous_month();
    Ok(ScheduleView::of(&wizard))
}

pub async fn next_month_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<ScheduleView>> {
    let mut wizard = state.wizards.lease((ctx.user_id()?, pet_id))?;
    wizard.next_month();
    Ok(ScheduleView::of(&wizard))
}

pub async fn dismiss_notice_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<ScheduleView>> {
    let mut wizard = state.wizards.lease((ctx.user_id()?, pet_id))?;
    wizard.dismiss_notice();
    Ok(ScheduleView::of(&wizard))
}

pub async fn cancel_handler(
    Extension(ctx): Extension<Ctx>,
    State(state): State<AppState>,
    Path(pet_id): Path<i64>,
) -> Result<Json<Ack>> {
    state.wizards.remove((ctx.user_id()?, pet_id));
    Ok(Ack::new("Reserva cancelada"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic::wizard::WizardStep;

    #[test]
    fn test_settle_keeps_backend_failures_in_view() {
        let result: std::result::Result<(), _> = Err(WizardError::Provider {
            source: Error::Api {
                status: 500,
                message: "boom".to_string(),
            },
        });
        assert!(matches!(settle(result), Ok(None)));
    }

    #[test]
    fn test_settle_propagates_rejected_session() {
        let result: std::result::Result<(), _> = Err(WizardError::Provider {
            source: Error::LoginRequired,
        });
        assert!(matches!(settle(result), Err(Error::LoginRequired)));
    }

    #[test]
    fn test_settle_rejects_wrong_step() {
        let result: std::result::Result<(), WizardError<Error>> = Err(WizardError::StepNotAllowed {
            step: WizardStep::ReasonSelection,
        });
        assert!(matches!(settle(result), Err(Error::BadRequest { .. })));
    }
}
