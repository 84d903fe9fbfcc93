//! Area-level access control.
//!
//! Each protected area of the API has a marker type naming its
//! [`Resource`]. Taking `Authorized<Marker>` as a handler argument runs
//! [`can_access`] before the handler body, rejecting with 403.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lodge_core::access::{can_access, Resource};
use lodge_core::error::CoreError;
use lodge_core::session::Session;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Binds a marker type to the [`Resource`] it guards.
pub trait Area {
    const RESOURCE: Resource;
}

macro_rules! areas {
    ($($(#[$doc:meta])* $name:ident => $resource:ident;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl Area for $name {
                const RESOURCE: Resource = Resource::$resource;
            }
        )*
    };
}

areas! {
    /// Booking selection and new registrations.
    RegisterArea => Register;
    /// The caller's drafts and finalize.
    ReviewArea => Review;
    EditDraftArea => EditDraft;
    SubmissionsArea => Submissions;
    /// Admin only.
    AdminDirectoryArea => AdminDirectory;
    /// Admin only.
    AdminGuestEditArea => AdminGuestEdit;
    /// Admin only.
    UserManagementArea => UserManagement;
}

/// A session that is allowed into area `A`.
///
/// ```ignore
/// async fn list(auth: Authorized<ReviewArea>) -> AppResult<Json<()>> {
///     let session = auth.session;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Authorized<A> {
    pub session: Session,
    _area: PhantomData<A>,
}

impl<A: Area> FromRequestParts<AppState> for Authorized<A>
where
    A: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(session) = AuthUser::from_request_parts(parts, state).await?;
        if !can_access(&session, A::RESOURCE) {
            tracing::debug!(
                user_id = session.user_id,
                resource = ?A::RESOURCE,
                "Access denied",
            );
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(Authorized {
            session,
            _area: PhantomData,
        })
    }
}
