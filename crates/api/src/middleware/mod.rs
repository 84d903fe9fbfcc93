//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`]: the caller's [`Session`](lodge_core::session::Session),
//!   rebuilt from a Bearer token.
//! - [`rbac::Authorized`]: an `AuthUser` that passed
//!   [`can_access`](lodge_core::access::can_access) for a given area.

pub mod auth;
pub mod rbac;
