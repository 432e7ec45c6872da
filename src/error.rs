//! Domain errors for the search engine.
//!
//! The first three kinds are caller mistakes (bad parameters, wrong lifecycle
//! timing, querying past verified progress) and are always detected before any
//! state is mutated. `Store` wraps failures of the storage collaborator.

/// Errors returned by [`SearchManager`](crate::search_manager::SearchManager) operations.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// Malformed parameters: thread count out of bounds, `min > max`, non-positive bounds.
    #[error("{0}")]
    Validation(String),

    /// Operation invalid for the current lifecycle state.
    #[error("{0}")]
    State(String),

    /// A range query reaches beyond what the search has provably covered.
    #[error("{0}")]
    IncompleteRange(String),

    /// The prime store failed.
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl FinderError {
    /// True for the kinds caused by the caller (mapped to 400 by the HTTP layer).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FinderError::Store(_))
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_kinds_are_client_errors() {
        assert!(FinderError::Validation("x".into()).is_client_error());
        assert!(FinderError::State("x".into()).is_client_error());
        assert!(FinderError::IncompleteRange("x".into()).is_client_error());
    }

    #[test]
    fn store_failure_is_not_a_client_error() {
        let err = FinderError::from(anyhow::anyhow!("connection reset"));
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "store error: connection reset");
    }

    #[test]
    fn message_is_passed_through_verbatim() {
        let err = FinderError::State("Searching is already running!".into());
        assert_eq!(err.to_string(), "Searching is already running!");
    }
}
