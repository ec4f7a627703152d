//! v1 API Data Transfer Objects.
//!
//! Wire formats for the v1 REST API, kept separate from the internal domain
//! types and converted at the handler boundary.

pub mod chat;
pub mod prescription;
pub mod safety;
pub mod verification;

pub use chat::*;
pub use prescription::*;
pub use safety::*;
pub use verification::*;
