use crate::models::booking::{Booking, BookingStatus};
use crate::models::provider::{IncomeResponse, IncomeWindow};
use crate::service::round_to;
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

/// Sum of frozen booking prices for a provider's completed bookings inside
/// the window, rounded to two decimals for display.
///
/// `today` is plain calendar-date equality, deliberately not timezone
/// aware. Recomputed from the booking set on every call; nothing is cached.
pub fn income_from_data(provider_id: &Uuid, window: IncomeWindow, today: NaiveDate, bookings: &[Booking]) -> IncomeResponse {
    let total: f64 = bookings
        .iter()
        .filter(|b| b.provider_id == *provider_id && b.status == BookingStatus::Completed)
        .filter(|b| match window {
            IncomeWindow::Today => b.date == today,
            IncomeWindow::Last30Days => b.date >= today - Duration::days(30),
            IncomeWindow::AllTime => true,
        })
        .map(|b| b.price)
        .sum();

    IncomeResponse {
        window,
        total: round_to(total, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_booking;

    fn completed(provider_id: Uuid, date: NaiveDate, price: f64) -> Booking {
        let mut booking = sample_booking();
        booking.provider_id = provider_id;
        booking.status = BookingStatus::Completed;
        booking.date = date;
        booking.price = price;
        booking
    }

    fn fixture(provider_id: Uuid, today: NaiveDate) -> Vec<Booking> {
        vec![
            completed(provider_id, today, 50.0),
            completed(provider_id, today - Duration::days(1), 120.0),
            completed(provider_id, today - Duration::days(40), 30.0),
        ]
    }

    #[test]
    fn today_window() {
        let provider_id = Uuid::new_v4();
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let income = income_from_data(&provider_id, IncomeWindow::Today, today, &fixture(provider_id, today));
        assert_eq!(income.total, 50.0);
    }

    #[test]
    fn last_30_days_window() {
        let provider_id = Uuid::new_v4();
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let income = income_from_data(&provider_id, IncomeWindow::Last30Days, today, &fixture(provider_id, today));
        assert_eq!(income.total, 170.0);
    }

    #[test]
    fn all_time_window() {
        let provider_id = Uuid::new_v4();
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let income = income_from_data(&provider_id, IncomeWindow::AllTime, today, &fixture(provider_id, today));
        assert_eq!(income.total, 200.0);
    }

    #[test]
    fn only_completed_bookings_count() {
        let provider_id = Uuid::new_v4();
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let mut bookings = fixture(provider_id, today);
        let mut paid = sample_booking();
        paid.provider_id = provider_id;
        paid.status = BookingStatus::Paid;
        paid.date = today;
        paid.price = 999.0;
        bookings.push(paid);

        let income = income_from_data(&provider_id, IncomeWindow::Today, today, &bookings);
        assert_eq!(income.total, 50.0);
    }

    #[test]
    fn other_providers_income_is_excluded() {
        let provider_id = Uuid::new_v4();
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let mut bookings = fixture(provider_id, today);
        bookings.push(completed(Uuid::new_v4(), today, 500.0));

        let income = income_from_data(&provider_id, IncomeWindow::AllTime, today, &bookings);
        assert_eq!(income.total, 200.0);
    }

    #[test]
    fn total_is_rounded_to_two_decimals() {
        let provider_id = Uuid::new_v4();
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let bookings = vec![
            completed(provider_id, today, 33.335),
            completed(provider_id, today, 33.335),
        ];
        let income = income_from_data(&provider_id, IncomeWindow::Today, today, &bookings);
        assert_eq!(income.total, 66.67);
    }
}
