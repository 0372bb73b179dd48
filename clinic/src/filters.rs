use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dto::appointment::{AppointmentHistoryDto, AppointmentResponseDto, Reason, Status};
use dto::dates::parse_datetime;

/// Admin appointment list filter. Every criterion is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentFilter {
    pub search: Option<String>,
    pub date: Option<NaiveDate>,
    pub doctor: Option<String>,
    pub status: Option<Status>,
    pub reason: Option<Reason>,
    pub approved: Option<bool>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &AppointmentResponseDto) -> bool {
        self.matches_search(appointment)
            && self.matches_date(appointment)
            && self
                .doctor
                .as_ref()
                .is_none_or(|d| d.is_empty() || &appointment.doctor_name == d)
            && self.status.is_none_or(|s| appointment.status == s)
            && self.reason.is_none_or(|r| appointment.reason == r)
            && self.approved.is_none_or(|a| appointment.approved == a)
    }

    fn matches_search(&self, appointment: &AppointmentResponseDto) -> bool {
        let Some(term) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        else {
            return true;
        };
        let term = term.to_lowercase();
        let pet_name = appointment.pet_name.as_deref().unwrap_or("");
        let reason = appointment.reason.to_string();
        let status = appointment.status.to_string();

        [
            appointment.doctor_name.as_str(),
            pet_name,
            appointment.reason.label(),
            appointment.status.label(),
            reason.as_str(),
            status.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_date(&self, appointment: &AppointmentResponseDto) -> bool {
        match self.date {
            None => true,
            Some(date) => parse_datetime(&appointment.start_time).is_some_and(|dt| dt.date() == date),
        }
    }

    /// Matching appointments, newest first
    pub fn apply(&self, appointments: &[AppointmentResponseDto]) -> Vec<AppointmentResponseDto> {
        let mut filtered: Vec<AppointmentResponseDto> = appointments
            .iter()
            .filter(|a| self.matches(a))
            .cloned()
            .collect();
        sort_newest_first(&mut filtered);
        filtered
    }
}

/// Sorts by start time descending. Unparseable dates go last.
pub fn sort_newest_first(appointments: &mut [AppointmentResponseDto]) {
    appointments.sort_by(|a, b| {
        let a = parse_datetime(&a.start_time);
        let b = parse_datetime(&b.start_time);
        match (a, b) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Doctor names in first-seen order
pub fn distinct_doctors(appointments: &[AppointmentResponseDto]) -> Vec<String> {
    let mut seen = HashSet::new();
    appointments
        .iter()
        .filter(|a| seen.insert(a.doctor_name.as_str()))
        .map(|a| a.doctor_name.clone())
        .collect()
}

/// Client history filter. `None` stands for "ALL".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilter {
    pub status: Option<Status>,
    pub pet_id: Option<i64>,
    pub reason: Option<Reason>,
}

impl HistoryFilter {
    pub fn matches(&self, appointment: &AppointmentHistoryDto) -> bool {
        self.status.is_none_or(|s| appointment.status == s)
            && self.pet_id.is_none_or(|id| appointment.pet_id == id)
            && self.reason.is_none_or(|r| appointment.reason == r)
    }

    pub fn apply(&self, appointments: &[AppointmentHistoryDto]) -> Vec<AppointmentHistoryDto> {
        appointments
            .iter()
            .filter(|a| self.matches(a))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PetOption {
    pub id: i64,
    pub name: String,
}

/// Pets found in the history, first-seen order
pub fn distinct_pets(appointments: &[AppointmentHistoryDto]) -> Vec<PetOption> {
    let mut seen = HashSet::new();
    appointments
        .iter()
        .filter(|a| seen.insert(a.pet_id))
        .map(|a| PetOption {
            id: a.pet_id,
            name: a.pet_name.clone(),
        })
        .collect()
}
