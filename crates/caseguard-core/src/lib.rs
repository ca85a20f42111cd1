//! Core types for the caseguard route permission resolver.
//!
//! Everything in this crate is pure and independent of the catalog store:
//! route canonicalization, truthy canonicalization, identity parsing, the
//! action-key table, the bypass registry and the enforcement switch.

pub mod action;
pub mod bypass;
pub mod config;
pub mod constants;
pub mod error;
pub mod identity;
pub mod switch;
pub mod util;
