use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dates::{Dated, parse_optional};
use crate::doctor::Speciality;
use crate::pet::PetType;

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    Control,
    Emergency,
    Vaccination,
    Nutrition,
}

impl Reason {
    pub const ALL: [Reason; 4] = [
        Reason::Control,
        Reason::Emergency,
        Reason::Vaccination,
        Reason::Nutrition,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Reason::Control => "Control",
            Reason::Emergency => "Emergencia",
            Reason::Vaccination => "Vacunación",
            Reason::Nutrition => "Nutrición",
        }
    }

    /// Slot length the backend allocates for this reason
    pub fn duration_minutes(&self) -> u32 {
        15
    }
}

impl TryFrom<&str> for Reason {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "CONTROL" => Ok(Reason::Control),
            "EMERGENCY" => Ok(Reason::Emergency),
            "VACCINATION" => Ok(Reason::Vaccination),
            "NUTRITION" => Ok(Reason::Nutrition),
            _ => Err(format!("Invalid reason: {value}")),
        }
    }
}

impl core::fmt::Display for Reason {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Reason::Control => write!(f, "CONTROL"),
            Reason::Emergency => write!(f, "EMERGENCY"),
            Reason::Vaccination => write!(f, "VACCINATION"),
            Reason::Nutrition => write!(f, "NUTRITION"),
        }
    }
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Canceled,
    Rescheduled,
    Successfully,
    ToBegin,
    Available,
}

impl Status {
    /// Statuses offered as filter options. Rescheduled is legacy and only displayed.
    pub const FILTERABLE: [Status; 4] = [
        Status::Canceled,
        Status::Successfully,
        Status::ToBegin,
        Status::Available,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Canceled => "Cancelada",
            Status::Rescheduled => "Reprogramada",
            Status::Successfully => "Completada",
            Status::ToBegin => "Por comenzar",
            Status::Available => "Disponible",
        }
    }
}

impl TryFrom<&str> for Status {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "CANCELED" => Ok(Status::Canceled),
            "RESCHEDULED" => Ok(Status::Rescheduled),
            "SUCCESSFULLY" => Ok(Status::Successfully),
            "TO_BEGIN" => Ok(Status::ToBegin),
            "AVAILABLE" => Ok(Status::Available),
            _ => Err(format!("Invalid status: {value}")),
        }
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Status::Canceled => write!(f, "CANCELED"),
            Status::Rescheduled => write!(f, "RESCHEDULED"),
            Status::Successfully => write!(f, "SUCCESSFULLY"),
            Status::ToBegin => write!(f, "TO_BEGIN"),
            Status::Available => write!(f, "AVAILABLE"),
        }
    }
}

/// Anything with backend start/end strings that can be mapped for display.
pub trait TimeSpan: Sized {
    fn start_time(&self) -> Option<&str>;
    fn end_time(&self) -> Option<&str>;

    fn dated(self) -> Dated<Self> {
        let start_date = parse_optional(self.start_time());
        let end_date = parse_optional(self.end_time());
        Dated {
            dto: self,
            start_date,
            end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[validate(length(min = 1))]
    pub start_time: String,

    #[validate(length(min = 1))]
    pub end_time: String,

    pub doctor: i64,
    pub reason: Reason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponseDto {
    pub id: i64,
    pub start_time: String,
    pub end_time: String,

    #[serde(default)]
    pub doctor_name: String,

    pub client_name: Option<String>,
    pub pet_name: Option<String>,
    pub reason: Reason,

    // The backend spells it this way
    #[serde(rename = "aproved", default)]
    pub approved: bool,

    pub status: Status,
    pub diagnose: Option<String>,
    pub treatment: Option<String>,
}

/// Row of a doctor's schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    pub id: i64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub diagnose: Option<String>,
    pub treatment: Option<String>,

    #[serde(default)]
    pub doctor_name: String,

    pub client_name: Option<String>,
    pub pet_id: Option<i64>,
    pub pet_name: Option<String>,
    pub pet_type: Option<PetType>,
    pub other_type: Option<String>,

    #[serde(default)]
    pub reason: String,

    pub has_diagnose: Option<bool>,
    pub diagnosis_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentHistoryDto {
    pub appointment_id: i64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,

    #[serde(default)]
    pub doctor_name: String,

    pub doctor_id: Option<i64>,
    pub doctor_speciality: Option<Speciality>,
    pub client_name: Option<String>,

    #[serde(default)]
    pub pet_name: String,

    pub pet_id: i64,
    pub pet_type: Option<PetType>,
    pub other_type: Option<String>,
    pub reason: Reason,
    pub status: Status,

    #[serde(default)]
    pub has_diagnosis: bool,

    pub diagnosis_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableAppointmentDto {
    pub appointment_id: i64,
    pub start_time: String,
    pub end_time: String,

    #[serde(default)]
    pub doctor_name: String,

    pub doctor_id: Option<i64>,
    pub doctor_speciality: Option<Speciality>,
    pub reason: Reason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DoctorAvailabilityDto {
    #[validate(length(min = 1))]
    pub start: String,

    #[validate(length(min = 1))]
    pub end: String,

    pub reason: Reason,

    #[validate(custom(function = "crate::validators::hour_minute"))]
    pub min_hour: Option<String>,

    #[validate(custom(function = "crate::validators::hour_minute"))]
    pub max_hour: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPetRequest {
    pub pet_id: i64,
}

impl TimeSpan for AppointmentResponseDto {
    fn start_time(&self) -> Option<&str> {
        Some(self.start_time.as_str())
    }

    fn end_time(&self) -> Option<&str> {
        Some(self.end_time.as_str())
    }
}

impl TimeSpan for AppointmentDto {
    fn start_time(&self) -> Option<&str> {
        self.start_time.as_deref()
    }

    fn end_time(&self) -> Option<&str> {
        self.end_time.as_deref()
    }
}

impl TimeSpan for AppointmentHistoryDto {
    fn start_time(&self) -> Option<&str> {
        self.start_time.as_deref()
    }

    fn end_time(&self) -> Option<&str> {
        self.end_time.as_deref()
    }
}

impl TimeSpan for AvailableAppointmentDto {
    fn start_time(&self) -> Option<&str> {
        Some(self.start_time.as_str())
    }

    fn end_time(&self) -> Option<&str> {
        Some(self.end_time.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn history_json() -> serde_json::Value {
        json!({
            "appointmentId": 7,
            "startTime": "2025-03-01T10:00:00",
            "endTime": "2025-03-01T10:15:00",
            "doctorName": "Ana Gómez",
            "doctorId": 2,
            "doctorSpeciality": "GENERAL_MEDICINE",
            "clientName": "Juan Pérez",
            "petName": "Firulais",
            "petId": 11,
            "petType": "DOG",
            "reason": "VACCINATION",
            "status": "TO_BEGIN",
            "hasDiagnosis": false,
            "diagnosisId": null
        })
    }

    #[test]
    fn test_reason_wire_values() {
        for reason in Reason::ALL {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason));
            assert_eq!(Reason::try_from(reason.to_string().as_str()), Ok(reason));
        }
        assert_eq!(Reason::Vaccination.label(), "Vacunación");
        assert!(Reason::try_from("SURGERY").is_err());
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&Status::ToBegin).unwrap(),
            "\"TO_BEGIN\""
        );
        assert!(!Status::FILTERABLE.contains(&Status::Rescheduled));
        assert_eq!(Status::Rescheduled.label(), "Reprogramada");
    }

    #[test]
    fn test_response_reads_aproved_spelling() {
        let dto: AppointmentResponseDto = serde_json::from_value(json!({
            "id": 1,
            "startTime": "2025-03-01T10:00:00",
            "endTime": "2025-03-01T10:15:00",
            "doctorName": "Ana Gómez",
            "petName": null,
            "reason": "CONTROL",
            "aproved": true,
            "status": "AVAILABLE"
        }))
        .unwrap();
        assert!(dto.approved);
        assert!(dto.pet_name.is_none());

        let back = serde_json::to_value(&dto).unwrap();
        assert_eq!(back["aproved"], json!(true));
    }

    #[test]
    fn test_history_dated() {
        let dto: AppointmentHistoryDto = serde_json::from_value(history_json()).unwrap();
        let dated = dto.dated();
        let start = dated.start_date.unwrap();
        assert_eq!(start.format("%H:%M").to_string(), "10:00");
        assert!(dated.end_date.is_some());
    }

    #[test]
    fn test_dated_is_idempotent() {
        let dto: AppointmentHistoryDto = serde_json::from_value(history_json()).unwrap();
        let once = dto.clone().dated();
        let twice = once.dto.clone().dated();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dated_invalid_dates_are_none() {
        let mut value = history_json();
        value["startTime"] = json!("garbage");
        value["endTime"] = json!(null);
        let dto: AppointmentHistoryDto = serde_json::from_value(value).unwrap();
        let dated = dto.dated();
        assert!(dated.start_date.is_none());
        assert!(dated.end_date.is_none());
    }

    #[test]
    fn test_dated_serializes_flat() {
        let dto: AppointmentHistoryDto = serde_json::from_value(history_json()).unwrap();
        let value = serde_json::to_value(dto.dated()).unwrap();
        assert_eq!(value["appointmentId"], json!(7));
        assert_eq!(value["startDate"], json!("2025-03-01T10:00:00"));
    }
}
