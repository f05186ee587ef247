//! Shared API surface helpers: response wrappers and pagination.

pub mod pagination;
pub mod response;
