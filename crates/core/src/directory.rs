//! Admin directory: every finalized main guest with its companions.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::guest::{order_main_first, DocumentType, GuestRow};

/// Filter applied to the directory listing.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFilter {
    /// Case-insensitive substring matched against first name, last name,
    /// document number and booking code.
    pub search: Option<String>,
    pub document_type: Option<DocumentType>,
}

impl DirectoryFilter {
    /// Build a filter from raw query parameters. A blank document type means
    /// "all types"; an unknown one is a validation error.
    pub fn from_params(
        search: Option<String>,
        document_type: Option<&str>,
    ) -> Result<Self, CoreError> {
        let document_type = match document_type.map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse()?),
            _ => None,
        };
        Ok(Self {
            search,
            document_type,
        })
    }

    pub fn matches<G: GuestRow>(&self, guest: &G) -> bool {
        self.matches_document_type(guest) && self.matches_search(guest)
    }

    fn matches_document_type<G: GuestRow>(&self, guest: &G) -> bool {
        self.document_type
            .map_or(true, |wanted| guest.document_type() == wanted)
    }

    fn matches_search<G: GuestRow>(&self, guest: &G) -> bool {
        let needle = match self.search.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => return true,
        };
        [
            guest.first_name(),
            guest.last_name(),
            guest.document_number(),
            guest.booking_code(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Keep only the main guests this filter accepts, preserving order.
    pub fn apply<G: GuestRow>(&self, main_guests: Vec<G>) -> Vec<G> {
        main_guests.into_iter().filter(|g| self.matches(g)).collect()
    }
}

/// One directory line: a main guest and the companions sharing its
/// booking code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryEntry<G> {
    pub main_guest: G,
    pub additional_guests: Vec<G>,
}

/// Attach companions to their main guest by booking code.
///
/// `additional` is the result of a single batched lookup over all the
/// main guests' codes. Main guest order is preserved.
pub fn pair_with_additional<G>(main_guests: Vec<G>, additional: Vec<G>) -> Vec<DirectoryEntry<G>>
where
    G: GuestRow + Clone,
{
    let mut by_code: HashMap<String, Vec<G>> = HashMap::new();
    for guest in additional.into_iter().filter(|g| !g.is_main_guest()) {
        by_code
            .entry(guest.booking_code().to_string())
            .or_default()
            .push(guest);
    }
    for companions in by_code.values_mut() {
        order_main_first(companions);
    }

    main_guests
        .into_iter()
        .map(|main_guest| {
            let additional_guests = by_code
                .get(main_guest.booking_code())
                .cloned()
                .unwrap_or_default();
            DirectoryEntry {
                main_guest,
                additional_guests,
            }
        })
        .collect()
}
