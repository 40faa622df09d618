use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::booking::{Booking, BookingFilter, BookingStatus, NewBooking, TransitionPlan};
use crate::models::user::{Actor, Role};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    customer_id: Uuid,
    provider_id: Uuid,
    service_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration: f64,
    price: f64,
    notes: String,
    status: String,
    reject_reason: Option<String>,
    rating: Option<i32>,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            customer_id: row.customer_id,
            provider_id: row.provider_id,
            date: row.service_date,
            start_time: row.start_time,
            end_time: row.end_time,
            duration: row.duration,
            price: row.price,
            notes: row.notes,
            status: booking_status_from_db(&row.status),
            reject_reason: row.reject_reason,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

pub fn booking_status_from_db<T: AsRef<str>>(value: T) -> BookingStatus {
    match value.as_ref() {
        "pending" => BookingStatus::Pending,
        "paid" => BookingStatus::Paid,
        "accepted" => BookingStatus::Accepted,
        "completed" => BookingStatus::Completed,
        "rejected" => BookingStatus::Rejected,
        other => panic!("Unknown booking status: {}", other),
    }
}

const BOOKING_SELECT_FIELDS: &str = r#"
    id,
    customer_id,
    provider_id,
    service_date,
    start_time,
    end_time,
    duration,
    price,
    notes,
    status,
    reject_reason,
    rating,
    comment,
    created_at
"#;

#[async_trait::async_trait]
pub trait BookingRepository {
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, AppError>;

    async fn get_booking_by_id(&self, id: &Uuid) -> Result<Option<Booking>, AppError>;

    /// List bookings in insertion order, optionally narrowed store-side.
    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError>;

    /// Apply a planned transition as a single conditional write. Returns
    /// `Conflict` when the booking exists but is no longer in the expected
    /// state (or was rated concurrently), `NotFound` when it never existed.
    async fn apply_transition(&self, id: &Uuid, actor: &Actor, plan: &TransitionPlan) -> Result<Booking, AppError>;
}

impl PostgresRepository {
    /// Classify a conditional update that touched zero rows: the booking is
    /// either gone (404) or was moved by a concurrent request (409).
    async fn stale_write_error(&self, id: &Uuid) -> AppError {
        match self.get_booking_by_id(id).await {
            Ok(Some(_)) => AppError::Conflict("Booking state changed, re-fetch and retry".to_string()),
            Ok(None) => AppError::NotFound("Booking not found".to_string()),
            Err(e) => e,
        }
    }
}

#[async_trait::async_trait]
impl BookingRepository for PostgresRepository {
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, AppError> {
        let query = format!(
            r#"
            INSERT INTO booking (customer_id, provider_id, service_date, start_time, end_time, duration, price, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            BOOKING_SELECT_FIELDS
        );

        let row = sqlx::query_as::<_, BookingRow>(&query)
            .bind(booking.customer_id)
            .bind(booking.provider_id)
            .bind(booking.date)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(booking.duration)
            .bind(booking.price)
            .bind(&booking.notes)
            .fetch_one(&self.pool)
            .await?;

        Ok(Booking::from(row))
    }

    async fn get_booking_by_id(&self, id: &Uuid) -> Result<Option<Booking>, AppError> {
        let query = format!("SELECT {} FROM booking WHERE id = $1", BOOKING_SELECT_FIELDS);
        let row = sqlx::query_as::<_, BookingRow>(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.map(Booking::from))
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        let query = format!(
            r#"
            SELECT {}
            FROM booking
            WHERE customer_id = COALESCE($1, customer_id)
              AND provider_id = COALESCE($2, provider_id)
              AND status = COALESCE($3, status)
            ORDER BY created_at
            "#,
            BOOKING_SELECT_FIELDS
        );

        let rows = sqlx::query_as::<_, BookingRow>(&query)
            .bind(filter.customer_id)
            .bind(filter.provider_id)
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn apply_transition(&self, id: &Uuid, actor: &Actor, plan: &TransitionPlan) -> Result<Booking, AppError> {
        // Ownership is re-checked in the WHERE clause so the write stays
        // correct even if the row changed hands between read and write.
        let (customer_guard, provider_guard) = match actor.role {
            Role::Customer => (Some(actor.id), None),
            Role::Provider => (None, Some(actor.id)),
        };

        let row = match plan {
            TransitionPlan::Status {
                expected,
                next,
                reject_reason,
            } => {
                let query = format!(
                    r#"
                    UPDATE booking
                    SET status = $1, reject_reason = COALESCE($2, reject_reason)
                    WHERE id = $3
                      AND status = $4
                      AND customer_id = COALESCE($5, customer_id)
                      AND provider_id = COALESCE($6, provider_id)
                    RETURNING {}
                    "#,
                    BOOKING_SELECT_FIELDS
                );

                sqlx::query_as::<_, BookingRow>(&query)
                    .bind(next.as_str())
                    .bind(reject_reason.as_deref())
                    .bind(id)
                    .bind(expected.as_str())
                    .bind(customer_guard)
                    .bind(provider_guard)
                    .fetch_optional(&self.pool)
                    .await?
            }
            TransitionPlan::Rating { rating, comment } => {
                // `rating IS NULL` serializes concurrent submissions: the
                // second writer matches zero rows and surfaces a conflict.
                let query = format!(
                    r#"
                    UPDATE booking
                    SET rating = $1, comment = $2
                    WHERE id = $3
                      AND customer_id = $4
                      AND status = 'completed'
                      AND rating IS NULL
                    RETURNING {}
                    "#,
                    BOOKING_SELECT_FIELDS
                );

                sqlx::query_as::<_, BookingRow>(&query)
                    .bind(rating)
                    .bind(comment.as_deref())
                    .bind(id)
                    .bind(actor.id)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        match row {
            Some(row) => Ok(Booking::from(row)),
            None => Err(self.stale_write_error(id).await),
        }
    }
}
