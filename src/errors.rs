//! Error types for document store operations.

/// Errors that can occur while talking to the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store is unreachable or an operation against it failed.
    Unavailable(String),
    /// No store was ever configured for this process.
    NotConfigured,
    /// A stored document could not be converted to or from its stored form.
    Serialization(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            Self::NotConfigured => write!(f, "Store not configured"),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Serialization(e.to_string())
            }
            _ => StoreError::Unavailable(e.to_string()),
        }
    }
}

impl std::error::Error for StoreError {}
