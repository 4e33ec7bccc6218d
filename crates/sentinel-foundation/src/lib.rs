//! Shared data model, error types, and the `Store` contract for Sentinel Hub's
//! code analysis core.
//!
//! Every other `sentinel-*` crate depends on this one for the types that
//! cross component boundaries (§3 of the specification), so that no two
//! crates invent slightly different shapes for the same concept.

pub mod error;
pub mod model;
pub mod store;

pub use error::{ApiError, SentinelError, SentinelResult};
pub use model::*;
pub use store::Store;
