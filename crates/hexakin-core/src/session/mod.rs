//! The editing session and its policy.
//!
//! # Module Structure
//!
//! - `editing_session`: the `EditingSession` state machine
//! - `status`: per-kind `TransformStatus`
//! - `apply`: selection splicing and analysis labels
//! - `policy`: `SessionPolicy` and `SubmitLock`

mod apply;
mod editing_session;
mod policy;
mod status;

pub use apply::{
    CHAT_FAILURE_MESSAGE, Refinement, analysis_label, apply_refinement, format_analysis,
};
pub use editing_session::{EditingSession, SessionSnapshot, SubmitOutcome};
pub use policy::{SessionPolicy, SubmitLock};
pub use status::TransformStatus;
