//! Repository for the `guests` table.
//!
//! Draft mutations are guarded in SQL by owner and status, so a write that
//! races with finalize affects no rows instead of overwriting a submitted
//! guest.

use sqlx::PgPool;
use lodge_core::guest::{GuestFields, GUEST_STATUS_DRAFT, GUEST_STATUS_SUBMITTED};
use lodge_core::types::DbId;

use crate::models::guest::{CreateDraftGroup, Guest, GuestWithBooking};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, booking_id, booking_code, user_id, is_main_guest, \
                        \"firstName\", \"lastName\", address, \"documentType\", \
                        \"documentNumber\", \"stayDuration\", status, created_at, updated_at";

/// Guest columns plus `b_`-prefixed booking columns, for
/// `guests g LEFT JOIN bookings b`.
const JOINED_COLUMNS: &str = "g.id, g.booking_id, g.booking_code, g.user_id, g.is_main_guest, \
                               g.\"firstName\", g.\"lastName\", g.address, g.\"documentType\", \
                               g.\"documentNumber\", g.\"stayDuration\", g.status, \
                               g.created_at, g.updated_at, \
                               b.id AS b_id, b.code AS b_code, b.guest_name AS b_guest_name, \
                               b.room_number AS b_room_number, \
                               b.check_in_date AS b_check_in_date, \
                               b.check_out_date AS b_check_out_date, \
                               b.status AS b_status, b.created_at AS b_created_at, \
                               b.updated_at AS b_updated_at";

const JOIN: &str = "guests g LEFT JOIN bookings b ON b.id = g.booking_id";

pub struct GuestRepo;

impl GuestRepo {
    /* ---------------------------------------------------------------
    Registration
    --------------------------------------------------------------- */

    /// Insert a registration as drafts: the main guest first, then every
    /// additional guest in one batched statement. Both run in a single
    /// transaction, so the group is written whole or not at all.
    ///
    /// Returns the inserted rows, main guest first.
    pub async fn create_draft_group(
        pool: &PgPool,
        input: &CreateDraftGroup,
    ) -> Result<Vec<Guest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let main_query = format!(
            "INSERT INTO guests
                (booking_id, booking_code, user_id, is_main_guest, \"firstName\", \"lastName\",
                 address, \"documentType\", \"documentNumber\", \"stayDuration\", status)
             VALUES ($1, $2, $3, true, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let main = &input.main_guest;
        let main_guest = sqlx::query_as::<_, Guest>(&main_query)
            .bind(input.booking_id)
            .bind(&input.booking_code)
            .bind(input.user_id)
            .bind(&main.first_name)
            .bind(&main.last_name)
            .bind(&main.address)
            .bind(main.document_type.as_str())
            .bind(&main.document_number)
            .bind(main.stay_duration)
            .bind(GUEST_STATUS_DRAFT)
            .fetch_one(&mut *tx)
            .await?;

        let mut guests = vec![main_guest];

        if !input.additional_guests.is_empty() {
            let extra = &input.additional_guests;
            let batch_query = format!(
                "INSERT INTO guests
                    (booking_id, booking_code, user_id, is_main_guest, \"firstName\", \"lastName\",
                     address, \"documentType\", \"documentNumber\", \"stayDuration\", status)
                 SELECT $1, $2, $3, false, t.first_name, t.last_name, t.address,
                        t.document_type, t.document_number, t.stay_duration, $4
                 FROM UNNEST($5::text[], $6::text[], $7::text[], $8::text[], $9::text[], $10::int4[])
                      WITH ORDINALITY
                      AS t(first_name, last_name, address, document_type, document_number,
                           stay_duration, ord)
                 ORDER BY t.ord
                 RETURNING {COLUMNS}"
            );
            let mut additional = sqlx::query_as::<_, Guest>(&batch_query)
                .bind(input.booking_id)
                .bind(&input.booking_code)
                .bind(input.user_id)
                .bind(GUEST_STATUS_DRAFT)
                .bind(column(extra, |g| g.first_name.clone()))
                .bind(column(extra, |g| g.last_name.clone()))
                .bind(column(extra, |g| g.address.clone()))
                .bind(column(extra, |g| g.document_type.as_str().to_string()))
                .bind(column(extra, |g| g.document_number.clone()))
                .bind(extra.iter().map(|g| g.stay_duration).collect::<Vec<i32>>())
                .fetch_all(&mut *tx)
                .await?;
            additional.sort_by_key(|g| g.id);
            guests.extend(additional);
        }

        tx.commit().await?;
        tracing::debug!(
            booking_id = input.booking_id,
            user_id = input.user_id,
            count = guests.len(),
            "Inserted draft group",
        );
        Ok(guests)
    }

    /* ---------------------------------------------------------------
    Lookups
    --------------------------------------------------------------- */

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Guest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guests WHERE id = $1");
        sqlx::query_as::<_, Guest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_with_booking(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GuestWithBooking>, sqlx::Error> {
        let query = format!("SELECT {JOINED_COLUMNS} FROM {JOIN} WHERE g.id = $1");
        sqlx::query_as::<_, GuestWithBooking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The owner's drafts with their bookings: main guests first, then by
    /// booking and creation time.
    pub async fn list_drafts_for_owner(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<GuestWithBooking>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOIN}
             WHERE g.user_id = $1 AND g.status = $2
             ORDER BY g.is_main_guest DESC, g.booking_id ASC NULLS LAST, g.created_at ASC, g.id ASC"
        );
        sqlx::query_as::<_, GuestWithBooking>(&query)
            .bind(user_id)
            .bind(GUEST_STATUS_DRAFT)
            .fetch_all(pool)
            .await
    }

    /// Distinct owners of the drafts under a booking, in id order.
    pub async fn draft_owners_for_booking(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT DISTINCT user_id FROM guests
             WHERE booking_id = $1 AND status = $2
             ORDER BY user_id",
        )
        .bind(booking_id)
        .bind(GUEST_STATUS_DRAFT)
        .fetch_all(pool)
        .await
    }

    /// Whether the booking already has a main guest, draft or submitted.
    pub async fn has_main_guest(pool: &PgPool, booking_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM guests WHERE booking_id = $1 AND is_main_guest)",
        )
        .bind(booking_id)
        .fetch_one(pool)
        .await
    }

    /// Submitted guests with their bookings, main guests first.
    ///
    /// `owner` restricts the result to one user's registrations; `None`
    /// returns every owner's.
    pub async fn list_submitted(
        pool: &PgPool,
        owner: Option<DbId>,
    ) -> Result<Vec<GuestWithBooking>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOIN}
             WHERE g.status = $1 AND ($2::bigint IS NULL OR g.user_id = $2)
             ORDER BY g.is_main_guest DESC, g.created_at ASC, g.id ASC"
        );
        sqlx::query_as::<_, GuestWithBooking>(&query)
            .bind(GUEST_STATUS_SUBMITTED)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Every submitted main guest, newest first.
    pub async fn list_submitted_main_guests(pool: &PgPool) -> Result<Vec<Guest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guests
             WHERE is_main_guest = true AND status = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Guest>(&query)
            .bind(GUEST_STATUS_SUBMITTED)
            .fetch_all(pool)
            .await
    }

    /// Submitted companions for a set of booking codes, in one query.
    pub async fn list_submitted_additional_by_codes(
        pool: &PgPool,
        booking_codes: &[String],
    ) -> Result<Vec<Guest>, sqlx::Error> {
        if booking_codes.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM guests
             WHERE booking_code = ANY($1) AND is_main_guest = false AND status = $2
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Guest>(&query)
            .bind(booking_codes)
            .bind(GUEST_STATUS_SUBMITTED)
            .fetch_all(pool)
            .await
    }

    /* ---------------------------------------------------------------
    Mutations
    --------------------------------------------------------------- */

    /// Overwrite a draft's fields. Returns `None` unless the guest exists,
    /// belongs to `owner_id`, and is still a draft.
    pub async fn update_draft(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        fields: &GuestFields,
    ) -> Result<Option<Guest>, sqlx::Error> {
        let query = format!(
            "UPDATE guests SET
                \"firstName\" = $3,
                \"lastName\" = $4,
                address = $5,
                \"documentType\" = $6,
                \"documentNumber\" = $7,
                \"stayDuration\" = $8
             WHERE id = $1 AND user_id = $2 AND status = $9
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Guest>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(&fields.address)
            .bind(fields.document_type.as_str())
            .bind(&fields.document_number)
            .bind(fields.stay_duration)
            .bind(GUEST_STATUS_DRAFT)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite a submitted guest's fields. Status is left untouched.
    /// Returns `None` unless the guest exists and is submitted.
    pub async fn update_submitted(
        pool: &PgPool,
        id: DbId,
        fields: &GuestFields,
    ) -> Result<Option<Guest>, sqlx::Error> {
        let query = format!(
            "UPDATE guests SET
                \"firstName\" = $2,
                \"lastName\" = $3,
                address = $4,
                \"documentType\" = $5,
                \"documentNumber\" = $6,
                \"stayDuration\" = $7
             WHERE id = $1 AND status = $8
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Guest>(&query)
            .bind(id)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(&fields.address)
            .bind(fields.document_type.as_str())
            .bind(&fields.document_number)
            .bind(fields.stay_duration)
            .bind(GUEST_STATUS_SUBMITTED)
            .fetch_optional(pool)
            .await
    }

    /// Delete a draft owned by `owner_id`. Returns `true` if a row was
    /// removed.
    pub async fn delete_draft(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM guests WHERE id = $1 AND user_id = $2 AND status = $3")
                .bind(id)
                .bind(owner_id)
                .bind(GUEST_STATUS_DRAFT)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Submit every draft under a booking and mark the booking registered,
    /// via the `finalize_guests` procedure.
    ///
    /// Returns the number of guests submitted; 0 when the booking is no
    /// longer active.
    pub async fn finalize_booking(pool: &PgPool, booking_id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT finalize_guests($1)")
            .bind(booking_id)
            .fetch_one(pool)
            .await
    }
}

/// Project one field of every guest into a bindable array.
fn column<F>(guests: &[GuestFields], f: F) -> Vec<String>
where
    F: Fn(&GuestFields) -> String,
{
    guests.iter().map(f).collect()
}
