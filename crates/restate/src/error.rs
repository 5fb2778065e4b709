//! Errors surfaced by [`Store::dispatch`](crate::Store::dispatch).

use crate::store::DispatchOutcome;
use crate::subscription::SubscriptionId;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// A caller-supplied callback failed during dispatch.
///
/// The variant names the stage that failed; the caller's own error is kept
/// as the source and can be taken back with [`StoreError::into_inner`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A `before_reduce` hook failed. State was not touched.
    #[error("before_reduce hook of middleware #{index} failed: {source}")]
    BeforeReduce {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    /// The reducer failed. State was not touched.
    #[error("reducer failed: {source}")]
    Reducer {
        #[source]
        source: anyhow::Error,
    },

    /// An `after_reduce` hook failed. The new state is already committed.
    #[error("after_reduce hook of middleware #{index} failed: {source}")]
    AfterReduce {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    /// A subscriber failed. The new state is already committed.
    #[error("subscriber {id} failed: {source}")]
    Subscriber {
        id: SubscriptionId,
        #[source]
        source: anyhow::Error,
    },

    /// The dispatched action went through, but a follow-up queued through a
    /// [`Dispatcher`](crate::Dispatcher) failed afterwards.
    #[error("queued follow-up action failed: {source}")]
    FollowUp {
        /// What happened to the dispatched action itself
        primary: DispatchOutcome,
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Whether the dispatched action had already committed its new state
    ///
    /// For [`StoreError::FollowUp`] this reports the dispatched action, not
    /// the follow-up that failed.
    pub fn is_committed(&self) -> bool {
        match self {
            Self::AfterReduce { .. } | Self::Subscriber { .. } => true,
            Self::FollowUp { primary, .. } => primary.is_committed(),
            Self::BeforeReduce { .. } | Self::Reducer { .. } => false,
        }
    }

    /// Borrow the error returned by the failing callback
    pub fn inner(&self) -> &anyhow::Error {
        match self {
            Self::BeforeReduce { source, .. }
            | Self::Reducer { source }
            | Self::AfterReduce { source, .. }
            | Self::Subscriber { source, .. } => source,
            Self::FollowUp { source, .. } => source.inner(),
        }
    }

    /// Unwrap into the error returned by the failing callback
    pub fn into_inner(self) -> anyhow::Error {
        match self {
            Self::BeforeReduce { source, .. }
            | Self::Reducer { source }
            | Self::AfterReduce { source, .. }
            | Self::Subscriber { source, .. } => source,
            Self::FollowUp { source, .. } => source.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_committed_stages() {
        let err = StoreError::Reducer {
            source: anyhow::anyhow!("boom"),
        };
        assert!(!err.is_committed());

        let err = StoreError::AfterReduce {
            index: 1,
            source: anyhow::anyhow!("boom"),
        };
        assert!(err.is_committed());
    }

    #[test]
    fn test_follow_up_reports_primary_commit() {
        let err = StoreError::FollowUp {
            primary: DispatchOutcome::Committed,
            source: Box::new(StoreError::BeforeReduce {
                index: 0,
                source: anyhow::anyhow!("rejected"),
            }),
        };
        assert!(err.is_committed());
        assert_eq!(err.inner().to_string(), "rejected");

        let err = StoreError::FollowUp {
            primary: DispatchOutcome::Skipped,
            source: Box::new(StoreError::Reducer {
                source: anyhow::anyhow!("listener crashed"),
            }),
        };
        assert!(!err.is_committed());
        assert_eq!(err.into_inner().to_string(), "listener crashed");
    }

    #[test]
    fn test_display_names_stage_and_cause() {
        let err = StoreError::BeforeReduce {
            index: 2,
            source: anyhow::anyhow!("invalid amount"),
        };
        assert_eq!(
            err.to_string(),
            "before_reduce hook of middleware #2 failed: invalid amount"
        );
    }

    #[test]
    fn test_into_inner_keeps_original_error() {
        #[derive(Debug, Error)]
        #[error("custom")]
        struct Custom;

        let err = StoreError::Reducer {
            source: anyhow::Error::new(Custom),
        };
        assert!(err.inner().is::<Custom>());
        assert!(err.into_inner().downcast::<Custom>().is_ok());
    }
}
