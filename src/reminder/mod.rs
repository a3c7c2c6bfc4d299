//! Recurring reminders: next-occurrence math and the upcoming list.

pub mod schedule;
