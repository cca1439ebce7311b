//! Error taxonomy for break computation

use crate::{ContainerId, ViewId};
use thiserror::Error;

/// Failures that can occur while resolving geometry or keeping views in sync.
///
/// None of these are fatal to the host: the synchronizer logs them and leaves
/// the affected container without markers until the next successful pass.
#[derive(Debug, Error)]
pub enum BreakError {
    /// Page configuration cannot produce a usable page height
    #[error("invalid page configuration: {0}")]
    Configuration(String),

    /// View has no scrollable content region right now
    #[error("view {0:?} has no scrollable content region")]
    MissingTarget(ViewId),

    /// Container is tracked but the host reports no height for it
    #[error("container {0:?} has no measurable height")]
    Unmeasured(ContainerId),

    /// Height observation could not attach to the container
    #[error("cannot observe height of container {container:?}: {reason}")]
    ObservationFailure {
        container: ContainerId,
        reason: String,
    },

    /// Persisted settings could not be read or written
    #[error("settings serialization failed: {0}")]
    Settings(#[from] serde_json::Error),
}

impl BreakError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        BreakError::Configuration(message.into())
    }

    /// Whether this failure only means "nothing to do this cycle"
    pub fn is_benign(&self) -> bool {
        matches!(self, BreakError::MissingTarget(_) | BreakError::Unmeasured(_))
    }
}
