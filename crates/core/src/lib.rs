//! Domain logic for the guest registration service.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` crate
//! implements [`guest::GuestRow`] for its row types so the aggregation and
//! directory functions here can run over fetched rows directly.

pub mod access;
pub mod directory;
pub mod error;
pub mod grouping;
pub mod guest;
pub mod roles;
pub mod session;
pub mod types;
