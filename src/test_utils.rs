use crate::models::booking::{Booking, BookingStatus};
use crate::models::user::{ProviderInfo, Role, User};
use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

pub fn sample_customer() -> User {
    User {
        id: Uuid::new_v4(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password_hash: String::new(),
        role: Role::Customer,
        location: "12 Main St".to_string(),
        provider_info: None,
        created_at: Utc::now(),
    }
}

pub fn sample_provider() -> User {
    User {
        id: Uuid::new_v4(),
        username: "cleaner-joe".to_string(),
        email: "joe@example.com".to_string(),
        password_hash: String::new(),
        role: Role::Provider,
        location: "Riverside".to_string(),
        provider_info: Some(ProviderInfo {
            service_types: vec!["laundry".to_string(), "window".to_string()],
            location: "Riverside".to_string(),
            hourly_rate: 25.0,
            description: "Fast and thorough".to_string(),
            available: true,
        }),
        created_at: Utc::now(),
    }
}

/// A fresh pending booking: 09:00-11:00 at 25.0/hr.
pub fn sample_booking() -> Booking {
    Booking {
        id: Uuid::new_v4(),
        customer_id: Uuid::new_v4(),
        provider_id: Uuid::new_v4(),
        date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        duration: 2.0,
        price: 50.0,
        notes: String::new(),
        status: BookingStatus::Pending,
        reject_reason: None,
        rating: None,
        comment: None,
        created_at: Utc::now(),
    }
}
