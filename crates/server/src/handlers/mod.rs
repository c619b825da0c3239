//! HTTP request handlers.

pub mod blobs;
pub mod cost;
pub mod health;

pub use blobs::*;
pub use cost::*;
pub use health::*;
