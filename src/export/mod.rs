//! Getting a rendered card out: PNG files and share targets.

pub mod file;
pub mod share;
