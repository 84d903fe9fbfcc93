//! Row models and DTOs.
//!
//! Each submodule holds a `FromRow` entity matching its table plus the
//! input structs used for inserts.

pub mod booking;
pub mod guest;
pub mod profile;
pub mod session;
pub mod user;
