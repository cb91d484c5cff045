//! Session behaviour switches.

use serde::{Deserialize, Serialize};

/// How a second submit of a kind that is still pending is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitLock {
    /// The session rejects the submit; the in-flight request is untouched.
    #[default]
    Hard,
    /// The front-end is expected to disable the action. Concurrent requests
    /// race and the last one to resolve wins.
    Advisory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPolicy {
    /// Whether `clear()` also empties the version history.
    pub clear_history_on_clear: bool,
    pub submit_lock: SubmitLock,
}
