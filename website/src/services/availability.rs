use async_trait::async_trait;
use chrono::NaiveDate;

use clinic::wizard::AvailabilityProvider;
use dto::appointment::{AppointmentResponseDto, AvailableAppointmentDto, Reason};

use crate::Error;

use super::appointments::{assign_pet, available_by_reason_and_date, available_days_by_reason};

/// Booking wizard backend, acting on behalf of the logged in client.
pub struct ApiAvailability<'a> {
    pub api_url: &'a str,
    pub token: &'a str,
}

#[async_trait]
impl<'a> AvailabilityProvider for ApiAvailability<'a> {
    type Error = Error;

    async fn available_days(&self, reason: Reason) -> Result<Vec<NaiveDate>, Error> {
        available_days_by_reason(self.api_url, self.token, reason).await
    }

    async fn available_slots(
        &self,
        reason: Reason,
        date: NaiveDate,
    ) -> Result<Vec<AvailableAppointmentDto>, Error> {
        available_by_reason_and_date(self.api_url, self.token, reason, date).await
    }

    async fn assign(
        &self,
        appointment_id: i64,
        pet_id: i64,
    ) -> Result<AppointmentResponseDto, Error> {
        assign_pet(self.api_url, self.token, appointment_id, pet_id).await
    }
}
