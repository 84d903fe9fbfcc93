//! Guest entity model and DTOs.

use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use lodge_core::guest::{DocumentType, GuestFields, GuestRow, GuestStatus};
use lodge_core::types::{DbId, Timestamp};

use crate::models::booking::Booking;

/// A row from the `guests` table.
///
/// Several columns are camelCase in the schema; both the column mapping and
/// the JSON output keep those names.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Guest {
    pub id: DbId,
    pub booking_id: Option<DbId>,
    pub booking_code: String,
    pub user_id: DbId,
    pub is_main_guest: bool,
    #[sqlx(rename = "firstName")]
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[sqlx(rename = "lastName")]
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub address: String,
    #[sqlx(rename = "documentType", try_from = "String")]
    #[serde(rename = "documentType")]
    pub document_type: DocumentType,
    #[sqlx(rename = "documentNumber")]
    #[serde(rename = "documentNumber")]
    pub document_number: String,
    #[sqlx(rename = "stayDuration")]
    #[serde(rename = "stayDuration")]
    pub stay_duration: i32,
    #[sqlx(try_from = "String")]
    pub status: GuestStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Guest {
    /// The editable portion of this guest.
    pub fn fields(&self) -> GuestFields {
        GuestFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
            document_type: self.document_type,
            document_number: self.document_number.clone(),
            stay_duration: self.stay_duration,
        }
    }
}

impl GuestRow for Guest {
    fn guest_id(&self) -> DbId {
        self.id
    }
    fn booking_id(&self) -> Option<DbId> {
        self.booking_id
    }
    fn booking_code(&self) -> &str {
        &self.booking_code
    }
    fn owner_id(&self) -> DbId {
        self.user_id
    }
    fn is_main_guest(&self) -> bool {
        self.is_main_guest
    }
    fn first_name(&self) -> &str {
        &self.first_name
    }
    fn last_name(&self) -> &str {
        &self.last_name
    }
    fn document_type(&self) -> DocumentType {
        self.document_type
    }
    fn document_number(&self) -> &str {
        &self.document_number
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// A guest left-joined to its booking.
///
/// The booking columns are selected with a `b_` prefix; `booking` is
/// `None` when the guest has no booking or the booking row is gone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestWithBooking {
    #[serde(flatten)]
    pub guest: Guest,
    pub booking: Option<Booking>,
}

impl GuestWithBooking {
    pub fn into_parts(self) -> (Guest, Option<Booking>) {
        (self.guest, self.booking)
    }
}

impl<'r> FromRow<'r, PgRow> for GuestWithBooking {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let guest = Guest::from_row(row)?;
        let booking = match row.try_get::<Option<DbId>, _>("b_id")? {
            Some(id) => Some(Booking {
                id,
                code: row.try_get("b_code")?,
                guest_name: row.try_get("b_guest_name")?,
                room_number: row.try_get("b_room_number")?,
                check_in_date: row.try_get("b_check_in_date")?,
                check_out_date: row.try_get("b_check_out_date")?,
                status: row.try_get("b_status")?,
                created_at: row.try_get("b_created_at")?,
                updated_at: row.try_get("b_updated_at")?,
            }),
            None => None,
        };
        Ok(Self { guest, booking })
    }
}

/// Guests of one registration, ready to insert as drafts.
#[derive(Debug, Clone)]
pub struct CreateDraftGroup {
    pub booking_id: DbId,
    pub booking_code: String,
    pub user_id: DbId,
    pub main_guest: GuestFields,
    pub additional_guests: Vec<GuestFields>,
}
