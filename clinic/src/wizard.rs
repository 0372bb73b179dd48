use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use snafu::{Snafu, ensure};

use dto::appointment::{AppointmentResponseDto, AvailableAppointmentDto, Reason};
use dto::dates::parse_datetime;

use crate::calendar::{CalendarMonth, format_date, format_long_date, format_time};

/// Backend calls the booking wizard depends on.
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    type Error: std::error::Error + Send + 'static;

    /// Days with at least one free slot for the reason
    async fn available_days(&self, reason: Reason) -> Result<Vec<NaiveDate>, Self::Error>;

    async fn available_slots(
        &self,
        reason: Reason,
        date: NaiveDate,
    ) -> Result<Vec<AvailableAppointmentDto>, Self::Error>;

    /// Books the slot for the pet
    async fn assign(
        &self,
        appointment_id: i64,
        pet_id: i64,
    ) -> Result<AppointmentResponseDto, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    ReasonSelection,
    DaySelection,
    SlotSelection,
    Confirmation,
    Completed,
}

impl WizardStep {
    /// 1-based position shown to the user, `None` once done
    pub fn number(&self) -> Option<u8> {
        match self {
            WizardStep::ReasonSelection => Some(1),
            WizardStep::DaySelection => Some(2),
            WizardStep::SlotSelection => Some(3),
            WizardStep::Confirmation => Some(4),
            WizardStep::Completed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Dismissible message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, text: &str) -> Self {
        Self {
            level,
            title: title.to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Snafu)]
pub enum WizardError<E>
where
    E: std::error::Error + 'static,
{
    /// The action is not available on the current step
    #[snafu(display("Action not allowed on step {step:?}"))]
    StepNotAllowed { step: WizardStep },

    #[snafu(display("Day {day} is not available"))]
    DayNotAvailable { day: NaiveDate },

    #[snafu(display("Slot {appointment_id} is not available"))]
    SlotNotAvailable { appointment_id: i64 },

    /// A previous step has not been completed
    #[snafu(display("No {what} selected"))]
    MissingSelection { what: &'static str },

    #[snafu(display("{source}"))]
    Provider { source: E },
}

/// Appointment booking flow for a single pet.
///
/// Every transition borrows the wizard mutably, so at most one backend call
/// is in flight per wizard.
#[derive(Debug, Clone)]
pub struct ScheduleWizard {
    pet_id: i64,
    step: WizardStep,
    reason: Option<Reason>,
    month: CalendarMonth,
    available_days: Vec<NaiveDate>,
    selected_day: Option<NaiveDate>,
    slots: Vec<AvailableAppointmentDto>,
    selected_slot: Option<AvailableAppointmentDto>,
    notice: Option<Notice>,
}

impl ScheduleWizard {
    pub fn new(pet_id: i64, today: NaiveDate) -> Self {
        Self {
            pet_id,
            step: WizardStep::ReasonSelection,
            reason: None,
            month: CalendarMonth::of(today),
            available_days: Vec::new(),
            selected_day: None,
            slots: Vec::new(),
            selected_slot: None,
            notice: None,
        }
    }

    pub fn pet_id(&self) -> i64 {
        self.pet_id
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn reason(&self) -> Option<Reason> {
        self.reason
    }

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.selected_day
    }

    pub fn slots(&self) -> &[AvailableAppointmentDto] {
        &self.slots
    }

    pub fn selected_slot(&self) -> Option<&AvailableAppointmentDto> {
        self.selected_slot.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.step == WizardStep::Completed
    }

    pub fn is_day_available(&self, day: NaiveDate) -> bool {
        self.available_days.contains(&day)
    }

    fn wrong_step<E: std::error::Error + 'static>(&self) -> WizardError<E> {
        WizardError::StepNotAllowed { step: self.step }
    }

    /// Step 1: picks the reason and loads the days with free slots.
    pub async fn select_reason<P: AvailabilityProvider>(
        &mut self,
        provider: &P,
        reason: Reason,
    ) -> Result<(), WizardError<P::Error>> {
        ensure!(
            self.step == WizardStep::ReasonSelection,
            StepNotAllowedSnafu { step: self.step }
        );
        self.notice = None;

        match provider.available_days(reason).await {
            Ok(days) => {
                self.reason = Some(reason);
                self.available_days = days;
                self.step = WizardStep::DaySelection;
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::new(
                    NoticeLevel::Error,
                    "Error",
                    "No se pudieron cargar los días disponibles",
                ));
                Err(WizardError::Provider { source: e })
            }
        }
    }

    /// Step 2: picks a day and loads its slots. An empty day keeps the user
    /// on the calendar with an informational notice.
    pub async fn select_day<P: AvailabilityProvider>(
        &mut self,
        provider: &P,
        day: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), WizardError<P::Error>> {
        if self.step != WizardStep::DaySelection {
            return Err(self.wrong_step());
        }
        let Some(reason) = self.reason else {
            return Err(WizardError::MissingSelection { what: "reason" });
        };
        ensure!(
            day >= today && self.is_day_available(day),
            DayNotAvailableSnafu { day }
        );
        self.notice = None;

        match provider.available_slots(reason, day).await {
            Ok(slots) if slots.is_empty() => {
                self.selected_day = None;
                self.slots.clear();
                self.notice = Some(Notice::new(
                    NoticeLevel::Info,
                    "Sin disponibilidad",
                    "No hay horarios disponibles para este día",
                ));
                Ok(())
            }
            Ok(slots) => {
                self.selected_day = Some(day);
                self.slots = slots;
                self.step = WizardStep::SlotSelection;
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::new(
                    NoticeLevel::Error,
                    "Error",
                    "No se pudieron cargar los horarios disponibles",
                ));
                Err(WizardError::Provider { source: e })
            }
        }
    }

    /// Step 3: picks one of the loaded slots. No backend call.
    pub fn select_slot<E: std::error::Error + 'static>(
        &mut self,
        appointment_id: i64,
    ) -> Result<(), WizardError<E>> {
        if self.reason.is_none() {
            return Err(WizardError::MissingSelection { what: "reason" });
        }
        if self.selected_day.is_none() {
            return Err(WizardError::MissingSelection { what: "day" });
        }
        if self.step != WizardStep::SlotSelection {
            return Err(self.wrong_step());
        }

        let Some(slot) = self
            .slots
            .iter()
            .find(|s| s.appointment_id == appointment_id)
            .cloned()
        else {
            return Err(WizardError::SlotNotAvailable { appointment_id });
        };

        self.notice = None;
        self.selected_slot = Some(slot);
        self.step = WizardStep::Confirmation;
        Ok(())
    }

    /// Step 4: books the selected slot for the pet. A failure keeps the
    /// wizard on confirmation so the user can retry.
    pub async fn confirm<P: AvailabilityProvider>(
        &mut self,
        provider: &P,
    ) -> Result<AppointmentResponseDto, WizardError<P::Error>> {
        if self.step != WizardStep::Confirmation {
            return Err(self.wrong_step());
        }
        let Some(appointment_id) = self.selected_slot.as_ref().map(|s| s.appointment_id) else {
            return Err(WizardError::MissingSelection { what: "slot" });
        };

        match provider.assign(appointment_id, self.pet_id).await {
            Ok(appointment) => {
                self.step = WizardStep::Completed;
                self.notice = Some(Notice::new(
                    NoticeLevel::Success,
                    "¡Cita agendada!",
                    "Tu cita ha sido agendada exitosamente",
                ));
                Ok(appointment)
            }
            Err(e) => {
                self.notice = Some(Notice::new(
                    NoticeLevel::Error,
                    "Error",
                    "No se pudo agendar la cita. Por favor, intenta nuevamente.",
                ));
                Err(WizardError::Provider { source: e })
            }
        }
    }

    /// Goes one step back and clears everything chosen after it.
    pub fn back<E: std::error::Error + 'static>(&mut self) -> Result<(), WizardError<E>> {
        match self.step {
            WizardStep::ReasonSelection | WizardStep::Completed => {
                return Err(self.wrong_step());
            }
            WizardStep::DaySelection => {
                self.step = WizardStep::ReasonSelection;
                self.reason = None;
                self.available_days.clear();
            }
            WizardStep::SlotSelection => {
                self.step = WizardStep::DaySelection;
                self.selected_day = None;
                self.slots.clear();
                self.selected_slot = None;
            }
            WizardStep::Confirmation => {
                self.step = WizardStep::SlotSelection;
                self.selected_slot = None;
            }
        }
        self.notice = None;
        Ok(())
    }

    pub fn previous_month(&mut self) {
        self.month = self.month.previous();
    }

    pub fn next_month(&mut self) {
        self.month = self.month.next();
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Snapshot of the wizard for display
    pub fn view(&self, today: NaiveDate) -> WizardView {
        let days = self
            .month
            .days()
            .map(|date| CalendarDay {
                date: format_date(date),
                day: date.day(),
                available: self.is_day_available(date),
                past: date < today,
                selected: self.selected_day == Some(date),
            })
            .collect();

        let slots = self.slots.iter().map(SlotView::from).collect();

        WizardView {
            pet_id: self.pet_id,
            step: self.step,
            step_number: self.step.number(),
            reason: self.reason,
            reason_label: self.reason.map(|r| r.label()),
            calendar: CalendarView {
                year: self.month.year,
                month: self.month.month,
                month_name: self.month.name(),
                first_weekday: self.month.first_weekday(),
                days,
            },
            selected_day: self.selected_day.map(format_date),
            selected_day_label: self.selected_day.map(format_long_date),
            slots,
            selected_slot: self.selected_slot.as_ref().map(SlotView::from),
            notice: self.notice.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: String,
    pub day: u32,
    pub available: bool,
    pub past: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub first_weekday: u32,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub appointment_id: i64,
    pub start: Option<String>,
    pub end: Option<String>,
    pub doctor_name: String,
    pub speciality: Option<&'static str>,
}

impl From<&AvailableAppointmentDto> for SlotView {
    fn from(slot: &AvailableAppointmentDto) -> Self {
        SlotView {
            appointment_id: slot.appointment_id,
            start: parse_datetime(&slot.start_time).map(format_time),
            end: parse_datetime(&slot.end_time).map(format_time),
            doctor_name: slot.doctor_name.clone(),
            speciality: slot.doctor_speciality.map(|s| s.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub pet_id: i64,
    pub step: WizardStep,
    pub step_number: Option<u8>,
    pub reason: Option<Reason>,
    pub reason_label: Option<&'static str>,
    pub calendar: CalendarView,
    pub selected_day: Option<String>,
    pub selected_day_label: Option<String>,
    pub slots: Vec<SlotView>,
    pub selected_slot: Option<SlotView>,
    pub notice: Option<Notice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dto::appointment::Status;
    use dto::doctor::Speciality;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq, Snafu)]
    enum BackendError {
        #[snafu(display("backend unreachable"))]
        Unreachable,
    }

    #[derive(Default)]
    struct InMemoryAvailability {
        days: Vec<NaiveDate>,
        slots: HashMap<NaiveDate, Vec<AvailableAppointmentDto>>,
        fail: bool,
        assigned: Mutex<Vec<(i64, i64)>>,
    }

    #[async_trait]
    impl AvailabilityProvider for InMemoryAvailability {
        type Error = BackendError;

        async fn available_days(&self, _reason: Reason) -> Result<Vec<NaiveDate>, Self::Error> {
            if self.fail {
                return Err(BackendError::Unreachable);
            }
            Ok(self.days.clone())
        }

        async fn available_slots(
            &self,
            _reason: Reason,
            date: NaiveDate,
        ) -> Result<Vec<AvailableAppointmentDto>, Self::Error> {
            if self.fail {
                return Err(BackendError::Unreachable);
            }
            Ok(self.slots.get(&date).cloned().unwrap_or_default())
        }

        async fn assign(
            &self,
            appointment_id: i64,
            pet_id: i64,
        ) -> Result<AppointmentResponseDto, Self::Error> {
            if self.fail {
                return Err(BackendError::Unreachable);
            }
            self.assigned.lock().unwrap().push((appointment_id, pet_id));
            Ok(AppointmentResponseDto {
                id: appointment_id,
                start_time: "2025-03-05T10:00:00".to_string(),
                end_time: "2025-03-05T10:15:00".to_string(),
                doctor_name: "Ana Gómez".to_string(),
                client_name: None,
                pet_name: Some("Firulais".to_string()),
                reason: Reason::Control,
                approved: false,
                status: Status::ToBegin,
                diagnose: None,
                treatment: None,
            })
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(3)
    }

    fn slot(id: i64, day: u32) -> AvailableAppointmentDto {
        AvailableAppointmentDto {
            appointment_id: id,
            start_time: format!("2025-03-{:02}T10:00:00", day),
            end_time: format!("2025-03-{:02}T10:15:00", day),
            doctor_name: "Ana Gómez".to_string(),
            doctor_id: Some(2),
            doctor_speciality: Some(Speciality::GeneralMedicine),
            reason: Reason::Control,
        }
    }

    fn provider() -> InMemoryAvailability {
        let mut slots = HashMap::new();
        slots.insert(date(5), vec![slot(100, 5), slot(101, 5)]);
        slots.insert(date(6), vec![]);
        InMemoryAvailability {
            days: vec![date(1), date(5), date(6)],
            slots,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_happy_path() {
        let provider = provider();
        let mut wizard = ScheduleWizard::new(10, today());

        wizard.select_reason(&provider, Reason::Control).await.unwrap();
        assert_eq!(wizard.step(), WizardStep::DaySelection);

        wizard.select_day(&provider, date(5), today()).await.unwrap();
        assert_eq!(wizard.step(), WizardStep::SlotSelection);
        assert_eq!(wizard.slots().len(), 2);

        wizard.select_slot::<BackendError>(101).unwrap();
        assert_eq!(wizard.step(), WizardStep::Confirmation);

        let booked = wizard.confirm(&provider).await.unwrap();
        assert_eq!(booked.id, 101);
        assert!(wizard.is_completed());
        assert_eq!(*provider.assigned.lock().unwrap(), vec![(101, 10)]);
        assert_eq!(wizard.notice().unwrap().level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn test_slot_requires_reason_and_day() {
        let provider = provider();
        let mut wizard = ScheduleWizard::new(10, today());

        assert_eq!(
            wizard.select_slot::<BackendError>(100),
            Err(WizardError::MissingSelection { what: "reason" })
        );

        wizard.select_reason(&provider, Reason::Control).await.unwrap();
        assert_eq!(
            wizard.select_slot::<BackendError>(100),
            Err(WizardError::MissingSelection { what: "day" })
        );
        assert_eq!(wizard.step(), WizardStep::DaySelection);
        assert!(wizard.selected_slot().is_none());
    }

    #[tokio::test]
    async fn test_day_guards() {
        let provider = provider();
        let mut wizard = ScheduleWizard::new(10, today());
        wizard.select_reason(&provider, Reason::Control).await.unwrap();

        // Past, even if listed
        assert_eq!(
            wizard.select_day(&provider, date(1), today()).await,
            Err(WizardError::DayNotAvailable { day: date(1) })
        );
        // Not listed
        assert_eq!(
            wizard.select_day(&provider, date(4), today()).await,
            Err(WizardError::DayNotAvailable { day: date(4) })
        );
        assert_eq!(wizard.step(), WizardStep::DaySelection);
    }

    #[tokio::test]
    async fn test_empty_day_stays_on_calendar() {
        let provider = provider();
        let mut wizard = ScheduleWizard::new(10, today());
        wizard.select_reason(&provider, Reason::Control).await.unwrap();

        wizard.select_day(&provider, date(6), today()).await.unwrap();
        assert_eq!(wizard.step(), WizardStep::DaySelection);
        assert!(wizard.selected_day().is_none());
        let notice = wizard.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.title, "Sin disponibilidad");

        wizard.dismiss_notice();
        assert!(wizard.notice().is_none());
    }

    #[tokio::test]
    async fn test_transport_error_keeps_step() {
        let provider = InMemoryAvailability {
            fail: true,
            ..provider()
        };
        let mut wizard = ScheduleWizard::new(10, today());

        let result = wizard.select_reason(&provider, Reason::Emergency).await;
        assert_eq!(
            result,
            Err(WizardError::Provider {
                source: BackendError::Unreachable
            })
        );
        assert_eq!(wizard.step(), WizardStep::ReasonSelection);
        assert!(wizard.reason().is_none());
        assert_eq!(wizard.notice().unwrap().level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_confirm_failure_can_retry() {
        let good = provider();
        let mut wizard = ScheduleWizard::new(10, today());
        wizard.select_reason(&good, Reason::Control).await.unwrap();
        wizard.select_day(&good, date(5), today()).await.unwrap();
        wizard.select_slot::<BackendError>(100).unwrap();

        let bad = InMemoryAvailability {
            fail: true,
            ..provider()
        };
        assert!(wizard.confirm(&bad).await.is_err());
        assert_eq!(wizard.step(), WizardStep::Confirmation);

        wizard.confirm(&good).await.unwrap();
        assert!(wizard.is_completed());
    }

    #[tokio::test]
    async fn test_back_resets_downstream() {
        let provider = provider();
        let mut wizard = ScheduleWizard::new(10, today());
        wizard.select_reason(&provider, Reason::Control).await.unwrap();
        wizard.select_day(&provider, date(5), today()).await.unwrap();
        wizard.select_slot::<BackendError>(100).unwrap();

        wizard.back::<BackendError>().unwrap();
        assert_eq!(wizard.step(), WizardStep::SlotSelection);
        assert!(wizard.selected_slot().is_none());
        assert_eq!(wizard.selected_day(), Some(date(5)));

        wizard.back::<BackendError>().unwrap();
        assert_eq!(wizard.step(), WizardStep::DaySelection);
        assert!(wizard.selected_day().is_none());
        assert!(wizard.slots().is_empty());

        wizard.back::<BackendError>().unwrap();
        assert_eq!(wizard.step(), WizardStep::ReasonSelection);
        assert!(wizard.reason().is_none());

        assert!(wizard.back::<BackendError>().is_err());
    }

    #[tokio::test]
    async fn test_steps_are_sequential() {
        let provider = provider();
        let mut wizard = ScheduleWizard::new(10, today());
        assert!(matches!(
            wizard.confirm(&provider).await,
            Err(WizardError::StepNotAllowed { .. })
        ));
        assert!(matches!(
            wizard.select_day(&provider, date(5), today()).await,
            Err(WizardError::MissingSelection { .. }) | Err(WizardError::StepNotAllowed { .. })
        ));

        wizard.select_reason(&provider, Reason::Control).await.unwrap();
        assert!(matches!(
            wizard.select_reason(&provider, Reason::Nutrition).await,
            Err(WizardError::StepNotAllowed { .. })
        ));
    }

    #[tokio::test]
    async fn test_view() {
        let provider = provider();
        let mut wizard = ScheduleWizard::new(10, today());
        wizard.select_reason(&provider, Reason::Vaccination).await.unwrap();
        wizard.select_day(&provider, date(5), today()).await.unwrap();

        let view = wizard.view(today());
        assert_eq!(view.step_number, Some(3));
        assert_eq!(view.reason_label, Some("Vacunación"));
        assert_eq!(view.calendar.month_name, "Marzo");
        assert_eq!(view.calendar.first_weekday, 6);
        assert_eq!(view.calendar.days.len(), 31);
        assert!(view.calendar.days[0].past);
        assert!(view.calendar.days[4].available && view.calendar.days[4].selected);
        assert_eq!(view.selected_day_label.as_deref(), Some("Miércoles, 5 de Marzo de 2025"));
        assert_eq!(view.slots[0].start.as_deref(), Some("10:00"));
        assert_eq!(view.slots[0].speciality, Some("Medicina General"));

        wizard.next_month();
        assert_eq!(wizard.view(today()).calendar.month_name, "Abril");
    }
}
