//! Durable storage for the last design and the reminder list.

pub mod design;
pub mod reminders;
pub mod snapshot;
pub mod store;
