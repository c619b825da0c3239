//! Storage network backends.

pub mod memory;
pub mod walrus;
