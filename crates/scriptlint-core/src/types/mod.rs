//! Shared primitive types.

pub mod collections;
pub mod extent;
