//! Domain types and DTOs
//!
//! These types define the data structures for itinero entities: the closed
//! role taxonomy, the itinerary entity, and its PDF version ledger.
//!
//! Some contract surface (the JSON role predicate, ledger constructors) is
//! exercised by external collaborators and tests rather than route code.

#![allow(dead_code)]

pub mod itinerary;
pub mod pdf;
pub mod roles;

// Re-export commonly used types
pub use itinerary::*;
pub use pdf::*;
pub use roles::*;
