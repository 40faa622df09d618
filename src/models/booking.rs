use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rocket::FromFormField;
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle states of a booking.
///
/// `pending -> paid -> accepted -> completed`, with a `rejected` branch out
/// of `paid`. `completed` and `rejected` are terminal; the only mutation
/// allowed on a terminal state is attaching a rating to `completed`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, FromFormField, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[field(value = "pending")]
    Pending,
    #[field(value = "paid")]
    Paid,
    #[field(value = "accepted")]
    Accepted,
    #[field(value = "completed")]
    Completed,
    #[field(value = "rejected")]
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Paid => "paid",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Completed => "completed",
            BookingStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration: f64,
    pub price: f64,
    pub notes: String,
    pub status: BookingStatus,
    pub reject_reason: Option<String>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A fully derived booking ready for insertion: price and duration are
/// already computed and will be frozen by the store.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration: f64,
    pub price: f64,
    pub notes: String,
}

/// Optional list filters, applied store-side.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingFilter {
    pub customer_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
}

/// What the store has to do for a PATCH, expressed as a conditional write:
/// apply the change only while the booking is still in the expected state.
/// Zero rows updated means someone else moved the booking first.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionPlan {
    Status {
        expected: BookingStatus,
        next: BookingStatus,
        reject_reason: Option<String>,
    },
    Rating {
        rating: i32,
        comment: Option<String>,
    },
}

/// Booking creation payload. Times come in as "HH:MM" strings from the
/// booking form; parsing and the duration/price derivation live in the
/// pricing service.
#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct BookingRequest {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    #[validate(length(min = 1))]
    pub start_time: String,
    #[validate(length(min = 1))]
    pub end_time: String,
    #[serde(default)]
    pub notes: String,
}

/// Partial update body for `PATCH /bookings/{id}`.
///
/// Carries either a status transition (optionally with a rejection reason)
/// or a rating submission, never both at once from the real clients.
#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct BookingPatchRequest {
    pub status: Option<BookingStatus>,
    pub reject_reason: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct BookingResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration: f64,
    pub price: f64,
    pub notes: String,
    pub status: BookingStatus,
    pub reject_reason: Option<String>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            customer_id: booking.customer_id,
            provider_id: booking.provider_id,
            date: booking.date,
            start_time: booking.start_time.format("%H:%M").to_string(),
            end_time: booking.end_time.format("%H:%M").to_string(),
            duration: booking.duration,
            price: booking.price,
            notes: booking.notes.clone(),
            status: booking.status,
            reject_reason: booking.reject_reason.clone(),
            rating: booking.rating,
            comment: booking.comment.clone(),
            created_at: booking.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_booking;

    #[test]
    fn response_formats_times_without_seconds() {
        let booking = sample_booking();
        let response = BookingResponse::from(&booking);
        assert_eq!(response.start_time, "09:00");
        assert_eq!(response.end_time, "11:00");
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&BookingStatus::Paid).unwrap(), "\"paid\"");
        assert_eq!(serde_json::to_string(&BookingStatus::Rejected).unwrap(), "\"rejected\"");
    }
}
