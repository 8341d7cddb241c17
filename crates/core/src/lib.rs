//! Catalog domain building blocks with no I/O.
//!
//! Shared by the repository layer, the HTTP API and the admin client.

pub mod catalog;
pub mod error;
pub mod listing;
pub mod types;
pub mod validation;
