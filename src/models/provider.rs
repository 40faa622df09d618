use chrono::NaiveDate;
use rocket::FromFormField;
use rocket::serde::Serialize;
use schemars::JsonSchema;
use uuid::Uuid;

/// Time window selector for provider income queries.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, FromFormField, JsonSchema)]
pub enum IncomeWindow {
    #[field(value = "today")]
    #[serde(rename = "today")]
    Today,
    #[field(value = "last-30-days")]
    #[serde(rename = "last-30-days")]
    Last30Days,
    #[field(value = "all-time")]
    #[serde(rename = "all-time")]
    AllTime,
}

/// Mean rating over a provider's rated bookings, one decimal place.
/// `average` is `null` while the provider has no ratings yet.
#[derive(Serialize, Debug, JsonSchema)]
pub struct RatingSummaryResponse {
    pub average: Option<f64>,
    pub count: usize,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct ReviewResponse {
    pub booking_id: Uuid,
    pub rating: Option<i32>,
    pub comment: String,
    pub date: NaiveDate,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct IncomeResponse {
    pub window: IncomeWindow,
    pub total: f64,
}
