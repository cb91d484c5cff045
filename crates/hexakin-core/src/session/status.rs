//! Per-kind transform status.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::transform::{TransformFailure, TransformMode};

/// Lifecycle of one transform kind: `Idle → Pending → {Succeeded, Failed}`.
///
/// A new submit moves the kind back through `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransformStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(TransformFailure),
}

impl TransformStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn failure(&self) -> Option<&TransformFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Independent status per transform kind.
#[derive(Debug, Clone, Default)]
pub(crate) struct StatusBoard {
    statuses: HashMap<TransformMode, TransformStatus>,
}

impl StatusBoard {
    pub(crate) fn get(&self, mode: TransformMode) -> TransformStatus {
        self.statuses.get(&mode).cloned().unwrap_or_default()
    }

    pub(crate) fn set(&mut self, mode: TransformMode, status: TransformStatus) {
        self.statuses.insert(mode, status);
    }

    pub(crate) fn reset(&mut self) {
        self.statuses.clear();
    }

    /// Every kind with its status, in declaration order.
    pub(crate) fn all(&self) -> Vec<(TransformMode, TransformStatus)> {
        TransformMode::iter().map(|mode| (mode, self.get(mode))).collect()
    }
}
