//! Client side of the catalog admin.
//!
//! Holds everything a table page needs besides rendering: the REST client,
//! the URL-synchronized filter state, the debounced list controller, and the
//! per-resource table and form definitions.

pub mod config;
pub mod error;
pub mod filter;
pub mod forms;
pub mod http;
pub mod models;
pub mod table;
pub mod tables;
