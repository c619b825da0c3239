//! Common test utilities and fixtures.

pub mod network;
pub mod server;

#[allow(unused_imports)]
pub use network::*;
#[allow(unused_imports)]
pub use server::*;
