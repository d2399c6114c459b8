//! Domain logic, one module per concern.

pub mod indexing;
pub mod media;
pub mod search;
pub mod upload;
