//! URL-synchronized filter state for server-side tables.
//!
//! [`FilterState`] is changed only through [`FilterAction`]s reduced by
//! [`reduce`]. [`FilterSchema`] converts it to and from query strings, and
//! [`FilterManager`] ties state, schema, and [`History`] together.

pub mod action;
pub mod history;
pub mod manager;
pub mod reducer;
pub mod schema;
pub mod state;

pub use action::FilterAction;
pub use history::{History, Location, MemoryHistory};
pub use manager::FilterManager;
pub use reducer::reduce;
pub use schema::{Column, FilterSchema};
pub use state::{ExtraFilter, FilterState, Order, Pagination};
