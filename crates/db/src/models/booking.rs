//! Booking entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use lodge_core::types::{DbId, Timestamp};

pub const BOOKING_STATUS_ACTIVE: &str = "active";
pub const BOOKING_STATUS_REGISTERED: &str = "registered";
pub const BOOKING_STATUS_CANCELLED: &str = "cancelled";

/// A row from the `bookings` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub code: String,
    pub guest_name: String,
    pub room_number: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status == BOOKING_STATUS_ACTIVE
    }
}

/// DTO for inserting a booking. Bookings normally arrive from the
/// reservation system; this is used by seeding and tests.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub code: String,
    pub guest_name: String,
    pub room_number: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}
