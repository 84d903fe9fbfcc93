pub mod admin;
pub mod auth;
pub mod bookings;
pub mod directory;
pub mod drafts;
pub mod registrations;
pub mod submissions;
