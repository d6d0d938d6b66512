//! Identity for the Q&A board: members and the anonymous guest.
//!
//! Pure domain logic (no IO, no sessions, no password hashing).

pub mod user;

pub use user::User;
