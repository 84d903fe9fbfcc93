//! Repository for the `bookings` table.

use sqlx::PgPool;
use lodge_core::types::DbId;

use crate::models::booking::{Booking, CreateBooking, BOOKING_STATUS_ACTIVE};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, guest_name, room_number, check_in_date, check_out_date, \
                        status, created_at, updated_at";

pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new booking in `active` status.
    pub async fn create(pool: &PgPool, input: &CreateBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (code, guest_name, room_number, check_in_date, check_out_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(&input.code)
            .bind(&input.guest_name)
            .bind(&input.room_number)
            .bind(input.check_in_date)
            .bind(input.check_out_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Bookings still open for registration, earliest check-in first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE status = $1
             ORDER BY check_in_date ASC, id ASC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(BOOKING_STATUS_ACTIVE)
            .fetch_all(pool)
            .await
    }
}
