//! SceneBridge Core Library
//!
//! This crate provides the vector math, shared types and error handling
//! used by the scene adapter and the Babylon export pipeline.

pub mod error;
pub mod math;

pub use error::{Error, ErrorKind, Result, ResultExt};
pub use math::*;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result, ResultExt};
    pub use crate::math::*;
}
