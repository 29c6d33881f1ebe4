use thiserror::Error;

use crate::types::ItemId;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("failed to fetch collection: {0}")]
    FetchFailure(String),

    #[error("mutation rejected: {0}")]
    MutationFailure(String),

    #[error("item '{0}' not found")]
    NotFound(ItemId),

    #[error("source did not answer within {0}s")]
    Timeout(u64),

    #[error("page size {0} is not one of the configured choices")]
    InvalidPageSize(usize),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid sort direction '{0}'")]
    InvalidSortDirection(String),

    #[error("invalid mode '{0}'")]
    InvalidMode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// The three failure classes the presentation layer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FetchFailure,
    MutationFailure,
    NotFound,
}

impl FolioError {
    /// Classify an error raised by a fetch.
    ///
    /// Everything a fetch can raise is a fetch failure from the view's point
    /// of view, including timeouts and decode errors.
    pub fn fetch_kind(&self) -> ErrorKind {
        ErrorKind::FetchFailure
    }

    /// Classify an error raised by a create, update or delete.
    pub fn mutation_kind(&self) -> ErrorKind {
        match self {
            FolioError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::MutationFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_its_own_mutation_kind() {
        let err = FolioError::NotFound(ItemId::new(5));
        assert_eq!(err.mutation_kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "item '5' not found");
    }

    #[test]
    fn test_timeout_is_a_mutation_failure() {
        let err = FolioError::Timeout(30);
        assert_eq!(err.mutation_kind(), ErrorKind::MutationFailure);
        assert_eq!(err.fetch_kind(), ErrorKind::FetchFailure);
    }
}
