//! Core types for Roster's incremental list views.
//!
//! A list view accumulates pages from a backend list endpoint into one
//! deduplicated, ordered collection. This crate holds the pieces that do not
//! care about HTTP: item identity, the page contract, filter signatures, the
//! [`ListAggregator`](aggregator::ListAggregator) state machine, and the
//! [`ListSession`](session::ListSession) that drives it against a
//! [`PagedListSource`](source::PagedListSource).

pub mod aggregator;
pub mod error;
pub mod filter;
pub mod page;
pub mod record;
pub mod scroll;
pub mod session;
pub mod source;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
