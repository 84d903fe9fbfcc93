//! Booking-group aggregation for finalized registrations.
//!
//! Guests arrive as flat rows, each left-joined to its booking. They are
//! folded into one [`SubmissionGroup`] per booking id. The result is an
//! ordered map, so the order rows were fetched in does not matter.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::guest::{order_main_first, GuestRow};
use crate::types::DbId;

/// All submitted guests of one booking, plus who registered them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionGroup<B, G> {
    pub booking: B,
    pub guests: Vec<G>,
    /// Display name of the submitting user. Only resolved for administrators.
    pub submitted_by: Option<String>,
}

/// Group submitted guest rows by booking.
///
/// Rows whose booking did not resolve (null reference, deleted or hidden
/// booking) are skipped. When a `directory` (`user id -> full name`) is
/// given, each group is annotated with the name of its first guest's owner.
pub fn group_submissions<B, G>(
    rows: impl IntoIterator<Item = (G, Option<B>)>,
    directory: Option<&HashMap<DbId, String>>,
) -> BTreeMap<DbId, SubmissionGroup<B, G>>
where
    G: GuestRow,
{
    let mut groups: BTreeMap<DbId, SubmissionGroup<B, G>> = BTreeMap::new();

    for (guest, booking) in rows {
        let (Some(booking_id), Some(booking)) = (guest.booking_id(), booking) else {
            continue;
        };
        groups
            .entry(booking_id)
            .or_insert_with(|| SubmissionGroup {
                booking,
                guests: Vec::new(),
                submitted_by: None,
            })
            .guests
            .push(guest);
    }

    for group in groups.values_mut() {
        order_main_first(&mut group.guests);
        if let (Some(directory), Some(first)) = (directory, group.guests.first()) {
            group.submitted_by = directory.get(&first.owner_id()).cloned();
        }
    }

    groups
}
