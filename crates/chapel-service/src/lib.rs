//! Recurrence engine and event listing for the chapel site.

pub mod clock;
pub mod error;
pub mod events;
pub mod recurrence;
