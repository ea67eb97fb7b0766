//! Application layer: services and use cases
//!
//! This layer drives the domain on behalf of a caller session and depends on
//! I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
