use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::appointment::Reason;
use crate::dates::{parse_datetime, parse_optional};
use crate::pet::PetType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnoseResponseDto {
    pub id: Option<i64>,
    pub diagnose: String,
    pub treatment: String,

    #[serde(default)]
    pub doctor_name: String,

    #[serde(default)]
    pub pet_name: String,

    pub pet_type: Option<PetType>,
    pub other_type: Option<String>,
    pub appointment_reason: Option<Reason>,
    pub client_name: Option<String>,
    pub appointment_start_time: Option<String>,
    pub appointment_end_time: Option<String>,

    /// When the diagnosis was written
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DiagnoseRequest {
    pub appointment_id: i64,

    #[validate(length(min = 1, max = 1000))]
    pub diagnose: String,

    #[validate(length(min = 1, max = 1000))]
    pub treatment: String,
}

/// Display view of a diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnoseDto {
    pub id: Option<i64>,
    pub diagnose: String,
    pub treatment: String,
    pub doctor_name: String,
    pub pet_name: String,
    pub pet_type: Option<PetType>,
    pub other_type: Option<String>,

    /// Wire value of the appointment reason, empty when unknown
    pub reason: String,

    pub appointment_reason: Option<Reason>,
    pub date: String,
    pub client_name: Option<String>,
    pub appointment_start_time: Option<String>,
    pub appointment_end_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedDiagnose {
    #[serde(flatten)]
    pub dto: DiagnoseDto,
    pub diagnosis_date: Option<NaiveDateTime>,
    pub appointment_start_date: Option<NaiveDateTime>,
    pub appointment_end_date: Option<NaiveDateTime>,
}

impl From<DiagnoseResponseDto> for DiagnoseDto {
    fn from(value: DiagnoseResponseDto) -> Self {
        let reason = value
            .appointment_reason
            .map(|r| r.to_string())
            .unwrap_or_default();

        DiagnoseDto {
            id: value.id,
            diagnose: value.diagnose,
            treatment: value.treatment,
            doctor_name: value.doctor_name,
            pet_name: value.pet_name,
            pet_type: value.pet_type,
            other_type: value.other_type,
            reason,
            appointment_reason: value.appointment_reason,
            date: value.date,
            client_name: value.client_name,
            appointment_start_time: value.appointment_start_time,
            appointment_end_time: value.appointment_end_time,
        }
    }
}

impl DiagnoseDto {
    pub fn dated(self) -> DatedDiagnose {
        let diagnosis_date = parse_datetime(&self.date);
        let appointment_start_date = parse_optional(self.appointment_start_time.as_deref());
        let appointment_end_date = parse_optional(self.appointment_end_time.as_deref());
        DatedDiagnose {
            dto: self,
            diagnosis_date,
            appointment_start_date,
            appointment_end_date,
        }
    }
}
