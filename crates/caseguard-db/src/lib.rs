//! Read-only access to the permission catalog.
//!
//! The catalog tables are provisioned and migrated by external tooling; this
//! crate only declares their shape and queries them.

pub mod db;
pub mod error;
pub mod model;
