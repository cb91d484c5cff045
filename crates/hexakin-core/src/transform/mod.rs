//! Transform requests, results and the client seam.
//!
//! # Module Structure
//!
//! - `mode`: the named transform categories (`TransformMode`)
//! - `request`: wire types (`TransformRequest`, `TransformResponse`, `ErrorResponse`)
//! - `failure`: the failure taxonomy (`TransformFailure`, `FailureKind`)
//! - `sanitize`: cleanup of raw model output
//! - `client`: the `TextTransformClient` trait

mod client;
mod failure;
mod mode;
mod request;
mod sanitize;

pub use client::{NO_RESPONSE_PLACEHOLDER, TextTransformClient, TransformResult};
pub use failure::{FailureKind, TransformFailure};
pub use mode::TransformMode;
pub use request::{ErrorResponse, TransformRequest, TransformResponse};
pub use sanitize::sanitize;
