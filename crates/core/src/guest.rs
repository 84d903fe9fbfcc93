//! Guest record vocabulary, input validation, and row-level mutation rules.
//!
//! Wire and column names (`firstName`, `documentType`, ...) are camelCase
//! for compatibility with existing data; the Rust side uses snake_case and
//! maps with `serde(rename)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::session::Session;
use crate::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

pub const DOCUMENT_ID_CARD: &str = "Carta d'identità";
pub const DOCUMENT_PASSPORT: &str = "Passaporto";
pub const DOCUMENT_DRIVING_LICENSE: &str = "Patente";

pub const GUEST_STATUS_DRAFT: &str = "draft";
pub const GUEST_STATUS_SUBMITTED: &str = "submitted";

/* --------------------------------------------------------------------------
Enums
-------------------------------------------------------------------------- */

/// Identity document presented at check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "Carta d'identità")]
    IdCard,
    #[serde(rename = "Passaporto")]
    Passport,
    #[serde(rename = "Patente")]
    DrivingLicense,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::IdCard,
        DocumentType::Passport,
        DocumentType::DrivingLicense,
    ];

    /// The stored `documentType` value.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::IdCard => DOCUMENT_ID_CARD,
            DocumentType::Passport => DOCUMENT_PASSPORT,
            DocumentType::DrivingLicense => DOCUMENT_DRIVING_LICENSE,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid document type '{s}'. Must be one of: {DOCUMENT_ID_CARD}, \
                     {DOCUMENT_PASSPORT}, {DOCUMENT_DRIVING_LICENSE}"
                ))
            })
    }
}

impl TryFrom<String> for DocumentType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Guest lifecycle. The only transition is `Draft -> Submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestStatus {
    Draft,
    Submitted,
}

impl GuestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GuestStatus::Draft => GUEST_STATUS_DRAFT,
            GuestStatus::Submitted => GUEST_STATUS_SUBMITTED,
        }
    }

    pub fn can_transition_to(self, next: GuestStatus) -> bool {
        matches!((self, next), (GuestStatus::Draft, GuestStatus::Submitted))
    }
}

impl FromStr for GuestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            GUEST_STATUS_DRAFT => Ok(GuestStatus::Draft),
            GUEST_STATUS_SUBMITTED => Ok(GuestStatus::Submitted),
            other => Err(CoreError::Validation(format!(
                "Invalid guest status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for GuestStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/* --------------------------------------------------------------------------
Row abstraction
-------------------------------------------------------------------------- */

/// Read access to a stored guest, implemented by the database row type.
///
/// The grouping and directory functions are generic over this trait so they
/// can be exercised without a database.
pub trait GuestRow {
    fn guest_id(&self) -> DbId;
    fn booking_id(&self) -> Option<DbId>;
    fn booking_code(&self) -> &str;
    fn owner_id(&self) -> DbId;
    fn is_main_guest(&self) -> bool;
    fn first_name(&self) -> &str;
    fn last_name(&self) -> &str;
    fn document_type(&self) -> DocumentType;
    fn document_number(&self) -> &str;
    fn created_at(&self) -> Timestamp;
}

/// Sort a booking group so the main guest comes first, then by creation.
pub fn order_main_first<G: GuestRow>(guests: &mut [G]) {
    guests.sort_by_key(|g| (!g.is_main_guest(), g.created_at(), g.guest_id()));
}

/* --------------------------------------------------------------------------
Input types
-------------------------------------------------------------------------- */

/// The editable fields of a guest, as submitted by the registration and
/// edit forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GuestFields {
    #[serde(rename = "firstName")]
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub first_name: String,

    #[serde(rename = "lastName")]
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub last_name: String,

    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub address: String,

    #[serde(rename = "documentType")]
    pub document_type: DocumentType,

    #[serde(rename = "documentNumber")]
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub document_number: String,

    #[serde(rename = "stayDuration")]
    #[validate(range(min = 1))]
    pub stay_duration: i32,
}

impl GuestFields {
    /// Trim surrounding whitespace from every free-text field.
    pub fn normalized(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            address: self.address.trim().to_string(),
            document_type: self.document_type,
            document_number: self.document_number.trim().to_string(),
            stay_duration: self.stay_duration,
        }
    }
}

/// An additional guest on the registration form. The form does not ask for
/// a stay duration per companion, so it falls back to the main guest's.
#[derive(Debug, Clone, Deserialize)]
pub struct AdditionalGuest {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub address: String,
    #[serde(rename = "documentType")]
    pub document_type: DocumentType,
    #[serde(rename = "documentNumber")]
    pub document_number: String,
    #[serde(rename = "stayDuration", default)]
    pub stay_duration: Option<i32>,
}

impl AdditionalGuest {
    pub fn into_fields(self, default_stay: i32) -> GuestFields {
        GuestFields {
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            document_type: self.document_type,
            document_number: self.document_number,
            stay_duration: self.stay_duration.unwrap_or(default_stay),
        }
    }
}

/// Request body for a new registration against a selected booking.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub booking_id: DbId,
    pub main_guest: GuestFields,
    #[serde(default)]
    pub additional_guests: Vec<AdditionalGuest>,
}

/// A registration that passed validation: main guest plus companions, all
/// normalized and ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRegistration {
    pub booking_id: DbId,
    pub main_guest: GuestFields,
    pub additional_guests: Vec<GuestFields>,
}

impl ValidatedRegistration {
    pub fn guest_count(&self) -> usize {
        1 + self.additional_guests.len()
    }
}

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Map Rust field names onto the wire names used in error messages.
fn wire_name(field: &str) -> &str {
    match field {
        "first_name" => "firstName",
        "last_name" => "lastName",
        "document_type" => "documentType",
        "document_number" => "documentNumber",
        "stay_duration" => "stayDuration",
        other => other,
    }
}

/// Render `validator` errors as one deterministic message, prefixed with
/// the guest the errors belong to.
fn describe(prefix: &str, errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let name = wire_name(&field).to_string();
            errs.iter().map(move |e| {
                let reason = match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("failed '{}' check", e.code),
                };
                format!("{prefix}.{name} {reason}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Validate one guest's fields, returning the normalized copy.
pub fn validate_guest_fields(prefix: &str, fields: GuestFields) -> Result<GuestFields, CoreError> {
    let fields = fields.normalized();
    fields
        .validate()
        .map_err(|e| CoreError::Validation(describe(prefix, &e)))?;
    Ok(fields)
}

/// Validate a whole registration before anything is written.
pub fn validate_registration(
    request: RegistrationRequest,
) -> Result<ValidatedRegistration, CoreError> {
    let main_guest = validate_guest_fields("main_guest", request.main_guest)?;
    let default_stay = main_guest.stay_duration;

    let additional_guests = request
        .additional_guests
        .into_iter()
        .enumerate()
        .map(|(i, g)| {
            validate_guest_fields(
                &format!("additional_guests[{i}]"),
                g.into_fields(default_stay),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedRegistration {
        booking_id: request.booking_id,
        main_guest,
        additional_guests,
    })
}

/* --------------------------------------------------------------------------
Mutation rules
-------------------------------------------------------------------------- */

/// A draft may be edited or deleted only by its owner, and only while it is
/// still a draft.
pub fn ensure_draft_mutable(
    session: &Session,
    guest_id: DbId,
    owner_id: DbId,
    status: GuestStatus,
) -> Result<(), CoreError> {
    if owner_id != session.user_id {
        return Err(CoreError::Forbidden(format!(
            "Guest {guest_id} belongs to another user"
        )));
    }
    if status != GuestStatus::Draft {
        return Err(CoreError::Forbidden(format!(
            "Guest {guest_id} has been submitted and can only be modified by an administrator"
        )));
    }
    Ok(())
}

/// Administrators edit guests only after submission; drafts stay with
/// their owner.
pub fn ensure_submitted(guest_id: DbId, status: GuestStatus) -> Result<(), CoreError> {
    if status != GuestStatus::Submitted {
        return Err(CoreError::NotFound {
            entity: "Submitted guest",
            id: guest_id,
        });
    }
    Ok(())
}

/// Finalize submits every draft under the booking, so the caller must hold
/// drafts there and nobody else may.
///
/// `draft_owners` are the distinct owners of the booking's drafts.
pub fn ensure_finalize_owner(
    session: &Session,
    booking_id: DbId,
    draft_owners: &[DbId],
) -> Result<(), CoreError> {
    if !draft_owners.contains(&session.user_id) {
        return Err(CoreError::NotFound {
            entity: "Draft registration for booking",
            id: booking_id,
        });
    }
    if draft_owners.iter().any(|owner| *owner != session.user_id) {
        return Err(CoreError::Forbidden(format!(
            "Booking {booking_id} has drafts registered by another user"
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
