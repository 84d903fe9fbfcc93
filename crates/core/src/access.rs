//! Route-level authorization.
//!
//! [`can_access`] is evaluated by the API extractors before a handler runs.
//! Row-level rules (ownership, draft state) live in [`crate::guest`].

use crate::session::Session;

/// Every protected area of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Booking selection and new guest registration.
    Register,
    /// The caller's own draft list and finalize.
    Review,
    /// Editing or deleting one of the caller's drafts.
    EditDraft,
    /// Finalized registrations (own, or all for administrators).
    Submissions,
    /// Flat listing of every finalized main guest.
    AdminDirectory,
    /// Editing a submitted guest.
    AdminGuestEdit,
    /// Staff account management.
    UserManagement,
}

impl Resource {
    pub fn requires_admin(self) -> bool {
        matches!(
            self,
            Resource::AdminDirectory | Resource::AdminGuestEdit | Resource::UserManagement
        )
    }
}

pub fn can_access(session: &Session, resource: Resource) -> bool {
    !resource.requires_admin() || session.is_admin()
}
