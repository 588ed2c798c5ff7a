use thiserror::Error;

pub type NotaryResult<T> = Result<T, NotaryError>;

#[derive(Debug, Error)]
pub enum NotaryError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("credential error: {0}")]
    Credentials(String),

    #[error("authentication failure: {0}")]
    Authentication(String),

    #[error("anchor provider error: {0}")]
    Anchor(String),

    #[error("integrity mismatch: {0}")]
    Integrity(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NotaryError {
    /// Configuration-class errors are raised before any anchor call is made.
    pub fn is_configuration(&self) -> bool {
        matches!(self, NotaryError::Config(_) | NotaryError::Credentials(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_configuration_class() {
        assert!(NotaryError::Config("chunk size".into()).is_configuration());
        assert!(NotaryError::Credentials("no wallet".into()).is_configuration());
        assert!(!NotaryError::Anchor("503".into()).is_configuration());
        assert!(!NotaryError::Authentication("tag".into()).is_configuration());
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let err: NotaryError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
