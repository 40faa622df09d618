use crate::models::booking::Booking;
use crate::models::provider::{RatingSummaryResponse, ReviewResponse};
use crate::service::round_to;
use uuid::Uuid;

/// Mean rating over a provider's rated bookings, one decimal place.
/// `None` while the provider has no ratings yet.
pub fn rating_summary_from_data(provider_id: &Uuid, bookings: &[Booking]) -> RatingSummaryResponse {
    let ratings: Vec<i32> = bookings
        .iter()
        .filter(|b| b.provider_id == *provider_id)
        .filter_map(|b| b.rating)
        .collect();

    let average = if ratings.is_empty() {
        None
    } else {
        Some(round_to(ratings.iter().sum::<i32>() as f64 / ratings.len() as f64, 1))
    };

    RatingSummaryResponse {
        average,
        count: ratings.len(),
    }
}

/// Review list for a provider: every booking of theirs carrying a non-empty
/// comment, in the order of the underlying collection. No re-sorting by
/// date or rating.
pub fn reviews_from_data(provider_id: &Uuid, bookings: &[Booking]) -> Vec<ReviewResponse> {
    bookings
        .iter()
        .filter(|b| b.provider_id == *provider_id)
        .filter_map(|b| {
            let comment = b.comment.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
            Some(ReviewResponse {
                booking_id: b.id,
                rating: b.rating,
                comment: comment.to_string(),
                date: b.date,
            })
        })
        .collect()
}
