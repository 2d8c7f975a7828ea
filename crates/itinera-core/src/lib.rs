//! Core types and trait definitions for the Itinera trip store.
//!
//! This crate is deliberately free of HTTP, socket, and database
//! dependencies. The storage backend and both front ends depend on it.

pub mod error;
pub mod itinerary;
pub mod reader;
pub mod store;
pub mod writer;

pub use error::{Error, Result};
pub use reader::ItineraryReader;
pub use writer::ItineraryWriter;

#[cfg(test)]
mod testing;
