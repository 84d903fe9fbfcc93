//! Integration tests for the registration workflow at the repository level:
//! draft group insert, guarded draft mutations, finalize, and the
//! submitted-guest queries behind the aggregator and the admin directory.

use chrono::NaiveDate;
use sqlx::PgPool;
use lodge_core::guest::{DocumentType, GuestFields, GuestStatus};
use lodge_core::roles::Role;
use lodge_db::models::booking::{Booking, CreateBooking};
use lodge_db::models::guest::{CreateDraftGroup, Guest};
use lodge_db::models::user::{CreateUser, User};
use lodge_db::repositories::{BookingRepo, GuestRepo, ProfileRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str, name: &str) -> User {
    UserRepo::create_with_profile(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: Role::User,
            full_name: name.to_string(),
        },
    )
    .await
    .unwrap()
}

async fn new_booking(pool: &PgPool, code: &str, day: u32) -> Booking {
    BookingRepo::create(
        pool,
        &CreateBooking {
            code: code.to_string(),
            guest_name: "Mario Rossi".to_string(),
            room_number: "101".to_string(),
            check_in_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2024, 6, day + 3).unwrap(),
        },
    )
    .await
    .unwrap()
}

fn fields(first: &str, last: &str, doc: DocumentType, number: &str) -> GuestFields {
    GuestFields {
        first_name: first.to_string(),
        last_name: last.to_string(),
        address: "Via Roma 1, Milano".to_string(),
        document_type: doc,
        document_number: number.to_string(),
        stay_duration: 3,
    }
}

async fn register_rossi(pool: &PgPool, booking: &Booking, user: &User) -> Vec<Guest> {
    GuestRepo::create_draft_group(
        pool,
        &CreateDraftGroup {
            booking_id: booking.id,
            booking_code: booking.code.clone(),
            user_id: user.id,
            main_guest: fields("Mario", "Rossi", DocumentType::IdCard, "AB123"),
            additional_guests: vec![fields("Luca", "Bianchi", DocumentType::Passport, "XY999")],
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn active_bookings_are_ordered_by_check_in(pool: PgPool) {
    new_booking(&pool, "bk-late", 20).await;
    new_booking(&pool, "bk-1", 1).await;

    let active = BookingRepo::list_active(&pool).await.unwrap();

    let codes: Vec<_> = active.iter().map(|b| b.code.as_str()).collect();
    assert_eq!(codes, ["bk-1", "bk-late"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_booking_code_is_rejected(pool: PgPool) {
    new_booking(&pool, "bk-1", 1).await;
    let err = BookingRepo::create(
        &pool,
        &CreateBooking {
            code: "bk-1".to_string(),
            guest_name: "Other".to_string(),
            room_number: "102".to_string(),
            check_in_date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        },
    )
    .await
    .unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_bookings_code"));
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn draft_group_is_written_main_guest_first(pool: PgPool) {
    let user = new_user(&pool, "desk@example.com", "Desk").await;
    let booking = new_booking(&pool, "bk-1", 1).await;

    let created = register_rossi(&pool, &booking, &user).await;

    assert_eq!(created.len(), 2);
    assert!(created[0].is_main_guest);
    assert!(!created[1].is_main_guest);
    assert!(created.iter().all(|g| g.status == GuestStatus::Draft));
    assert!(created.iter().all(|g| g.booking_code == "bk-1"));

    let drafts = GuestRepo::list_drafts_for_owner(&pool, user.id).await.unwrap();
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].guest.last_name, "Rossi");
    assert_eq!(drafts[1].guest.last_name, "Bianchi");
    assert_eq!(drafts.iter().filter(|d| d.guest.is_main_guest).count(), 1);
    let joined = drafts[0].booking.as_ref().expect("booking joined");
    assert_eq!(joined.room_number, "101");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_batch_rolls_back_main_guest(pool: PgPool) {
    let user = new_user(&pool, "desk@example.com", "Desk").await;
    let booking = new_booking(&pool, "bk-1", 1).await;

    let mut bad = fields("Luca", "Bianchi", DocumentType::Passport, "XY999");
    bad.stay_duration = 0;
    let result = GuestRepo::create_draft_group(
        &pool,
        &CreateDraftGroup {
            booking_id: booking.id,
            booking_code: booking.code.clone(),
            user_id: user.id,
            main_guest: fields("Mario", "Rossi", DocumentType::IdCard, "AB123"),
            additional_guests: vec![bad],
        },
    )
    .await;

    assert!(result.is_err());
    let drafts = GuestRepo::list_drafts_for_owner(&pool, user.id).await.unwrap();
    assert!(drafts.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_draft_is_guarded_by_owner(pool: PgPool) {
    let owner = new_user(&pool, "desk@example.com", "Desk").await;
    let other = new_user(&pool, "other@example.com", "Other").await;
    let booking = new_booking(&pool, "bk-1", 1).await;
    let created = register_rossi(&pool, &booking, &owner).await;

    let mut edited = created[1].fields();
    edited.address = "Corso Italia 5".to_string();

    let denied = GuestRepo::update_draft(&pool, created[1].id, other.id, &edited)
        .await
        .unwrap();
    assert!(denied.is_none());

    let updated = GuestRepo::update_draft(&pool, created[1].id, owner.id, &edited)
        .await
        .unwrap()
        .expect("owner update applies");
    assert_eq!(updated.address, "Corso Italia 5");
    assert!(updated.updated_at >= created[1].updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_draft_removes_only_owned_drafts(pool: PgPool) {
    let owner = new_user(&pool, "desk@example.com", "Desk").await;
    let other = new_user(&pool, "other@example.com", "Other").await;
    let booking = new_booking(&pool, "bk-1", 1).await;
    let created = register_rossi(&pool, &booking, &owner).await;

    assert!(!GuestRepo::delete_draft(&pool, created[1].id, other.id).await.unwrap());
    assert!(GuestRepo::delete_draft(&pool, created[1].id, owner.id).await.unwrap());
    assert!(GuestRepo::find_by_id(&pool, created[1].id).await.unwrap().is_none());
    // Second delete is a no-op.
    assert!(!GuestRepo::delete_draft(&pool, created[1].id, owner.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Finalize
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_submits_drafts_and_registers_booking(pool: PgPool) {
    let user = new_user(&pool, "desk@example.com", "Desk").await;
    let booking = new_booking(&pool, "bk-1", 1).await;
    register_rossi(&pool, &booking, &user).await;

    assert_eq!(
        GuestRepo::draft_owners_for_booking(&pool, booking.id).await.unwrap(),
        vec![user.id]
    );
    let moved = GuestRepo::finalize_booking(&pool, booking.id).await.unwrap();
    assert_eq!(moved, 2);

    assert!(GuestRepo::list_drafts_for_owner(&pool, user.id).await.unwrap().is_empty());
    let submitted = GuestRepo::list_submitted(&pool, Some(user.id)).await.unwrap();
    assert_eq!(submitted.len(), 2);

    let booking = BookingRepo::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    assert_eq!(booking.status, "registered");
    assert!(BookingRepo::list_active(&pool).await.unwrap().is_empty());

    // Nothing left to move.
    let again = GuestRepo::finalize_booking(&pool, booking.id).await.unwrap();
    assert_eq!(again, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_skips_a_booking_that_is_not_active(pool: PgPool) {
    let user = new_user(&pool, "desk@example.com", "Desk").await;
    let booking = new_booking(&pool, "bk-1", 1).await;
    register_rossi(&pool, &booking, &user).await;
    sqlx::query("UPDATE bookings SET status = 'registered' WHERE id = $1")
        .bind(booking.id)
        .execute(&pool)
        .await
        .unwrap();

    let moved = GuestRepo::finalize_booking(&pool, booking.id).await.unwrap();

    assert_eq!(moved, 0);
    assert_eq!(
        GuestRepo::list_drafts_for_owner(&pool, user.id).await.unwrap().len(),
        2
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_holds_a_single_main_guest(pool: PgPool) {
    let first = new_user(&pool, "desk@example.com", "Desk").await;
    let second = new_user(&pool, "night@example.com", "Night").await;
    let booking = new_booking(&pool, "bk-1", 1).await;
    register_rossi(&pool, &booking, &first).await;
    assert!(GuestRepo::has_main_guest(&pool, booking.id).await.unwrap());

    for user in [&first, &second] {
        let err = GuestRepo::create_draft_group(
            &pool,
            &CreateDraftGroup {
                booking_id: booking.id,
                booking_code: booking.code.clone(),
                user_id: user.id,
                main_guest: fields("Anna", "Verdi", DocumentType::Passport, "PP001"),
                additional_guests: vec![],
            },
        )
        .await
        .unwrap_err();

        let db_err = err.as_database_error().expect("database error");
        assert_eq!(db_err.constraint(), Some("uq_guests_booking_main"));
    }

    assert!(GuestRepo::list_drafts_for_owner(&pool, second.id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        GuestRepo::draft_owners_for_booking(&pool, booking.id).await.unwrap(),
        vec![first.id]
    );

    // Still one main guest once submitted.
    GuestRepo::finalize_booking(&pool, booking.id).await.unwrap();
    let submitted = GuestRepo::list_submitted(&pool, None).await.unwrap();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted.iter().filter(|g| g.guest.is_main_guest).count(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_bookings_are_free_to_register(pool: PgPool) {
    let user = new_user(&pool, "desk@example.com", "Desk").await;
    let one = new_booking(&pool, "bk-1", 1).await;
    let two = new_booking(&pool, "bk-2", 2).await;
    register_rossi(&pool, &one, &user).await;

    assert!(!GuestRepo::has_main_guest(&pool, two.id).await.unwrap());
    assert_eq!(register_rossi(&pool, &two, &user).await.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submitted_guest_cannot_be_reverted_or_deleted(pool: PgPool) {
    let user = new_user(&pool, "desk@example.com", "Desk").await;
    let booking = new_booking(&pool, "bk-1", 1).await;
    let created = register_rossi(&pool, &booking, &user).await;
    GuestRepo::finalize_booking(&pool, booking.id).await.unwrap();

    let revert = sqlx::query("UPDATE guests SET status = 'draft' WHERE id = $1")
        .bind(created[0].id)
        .execute(&pool)
        .await;
    assert!(revert.is_err());

    let delete = sqlx::query("DELETE FROM guests WHERE id = $1")
        .bind(created[0].id)
        .execute(&pool)
        .await;
    assert!(delete.is_err());

    // The guarded repository paths simply match nothing.
    assert!(!GuestRepo::delete_draft(&pool, created[0].id, user.id).await.unwrap());
    let edit = GuestRepo::update_draft(&pool, created[0].id, user.id, &created[0].fields())
        .await
        .unwrap();
    assert!(edit.is_none());

    let guest = GuestRepo::find_by_id(&pool, created[0].id).await.unwrap().unwrap();
    assert_eq!(guest.status, GuestStatus::Submitted);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_edit_applies_only_to_submitted_guests(pool: PgPool) {
    let user = new_user(&pool, "desk@example.com", "Desk").await;
    let booking = new_booking(&pool, "bk-1", 1).await;
    let created = register_rossi(&pool, &booking, &user).await;

    let mut edited = created[0].fields();
    edited.document_number = "ZZ000".to_string();

    assert!(GuestRepo::update_submitted(&pool, created[0].id, &edited)
        .await
        .unwrap()
        .is_none());

    GuestRepo::finalize_booking(&pool, booking.id).await.unwrap();

    let updated = GuestRepo::update_submitted(&pool, created[0].id, &edited)
        .await
        .unwrap()
        .expect("submitted guest is editable");
    assert_eq!(updated.document_number, "ZZ000");
    assert_eq!(updated.status, GuestStatus::Submitted);
}

// ---------------------------------------------------------------------------
// Submitted reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn submitted_rows_are_scoped_by_owner(pool: PgPool) {
    let first = new_user(&pool, "desk@example.com", "Desk").await;
    let second = new_user(&pool, "night@example.com", "Night").await;
    let one = new_booking(&pool, "bk-1", 1).await;
    let two = new_booking(&pool, "bk-2", 2).await;
    register_rossi(&pool, &one, &first).await;
    register_rossi(&pool, &two, &second).await;
    GuestRepo::finalize_booking(&pool, one.id).await.unwrap();
    GuestRepo::finalize_booking(&pool, two.id).await.unwrap();

    let mine = GuestRepo::list_submitted(&pool, Some(first.id)).await.unwrap();
    let all = GuestRepo::list_submitted(&pool, None).await.unwrap();

    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|r| r.guest.user_id == first.id));
    assert_eq!(all.len(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_booking_leaves_guest_unresolved(pool: PgPool) {
    let user = new_user(&pool, "desk@example.com", "Desk").await;
    let booking = new_booking(&pool, "bk-1", 1).await;
    register_rossi(&pool, &booking, &user).await;
    GuestRepo::finalize_booking(&pool, booking.id).await.unwrap();

    sqlx::query("DELETE FROM bookings WHERE id = $1")
        .bind(booking.id)
        .execute(&pool)
        .await
        .unwrap();

    let rows = GuestRepo::list_submitted(&pool, None).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.guest.booking_id.is_none() && r.booking.is_none()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn directory_queries_batch_companions_by_code(pool: PgPool) {
    let user = new_user(&pool, "desk@example.com", "Desk").await;
    let one = new_booking(&pool, "bk-1", 1).await;
    let two = new_booking(&pool, "bk-2", 2).await;
    register_rossi(&pool, &one, &user).await;
    register_rossi(&pool, &two, &user).await;
    GuestRepo::finalize_booking(&pool, one.id).await.unwrap();

    let mains = GuestRepo::list_submitted_main_guests(&pool).await.unwrap();
    assert_eq!(mains.len(), 1);
    assert_eq!(mains[0].booking_code, "bk-1");

    let codes: Vec<String> = mains.iter().map(|g| g.booking_code.clone()).collect();
    let companions = GuestRepo::list_submitted_additional_by_codes(&pool, &codes)
        .await
        .unwrap();
    assert_eq!(companions.len(), 1);
    assert_eq!(companions[0].last_name, "Bianchi");

    let none = GuestRepo::list_submitted_additional_by_codes(&pool, &[])
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_directory_maps_ids_to_names(pool: PgPool) {
    let user = new_user(&pool, "desk@example.com", "Giulia Conti").await;

    let directory = ProfileRepo::directory(&pool).await.unwrap();

    assert_eq!(directory.get(&user.id).map(String::as_str), Some("Giulia Conti"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_rolls_back_profile(pool: PgPool) {
    new_user(&pool, "desk@example.com", "Desk").await;
    let err = UserRepo::create_with_profile(
        &pool,
        &CreateUser {
            email: "desk@example.com".to_string(),
            password_hash: "x".to_string(),
            role: Role::Admin,
            full_name: "Impostor".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("uq_users_email")
    );
    assert_eq!(ProfileRepo::list(&pool).await.unwrap().len(), 1);
}
