//! Read-only catalog queries. Nothing in here writes.

pub mod grant;
pub mod profile;
