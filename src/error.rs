use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Draft file not found: {0}")]
    DraftNotFound(PathBuf),

    #[error("Failed to parse draft {path}: {source}")]
    DraftParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Please fill in a description and a valid amount (description: '{description}', amount: '{amount}')")]
    InvalidLineItem { description: String, amount: String },

    #[error("Invalid amount '{0}'. Enter a positive number; the value was reset to 0.00")]
    InvalidItemAmount(String),

    #[error("Service '{0}' is not selected; check it before writing details")]
    DetailHidden(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown service '{0}'. Run 'quote services' to list them.")]
    UnknownService(String),

    #[error("Service '{0}' appears more than once in the draft")]
    DuplicateService(String),

    #[error("No line item at position '{0}'. Use 'show' to see the item table.")]
    UnknownRow(String),

    #[error("{0}")]
    InvalidCommand(String),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuoteError {
    /// Errors the user caused by typing bad form input. The session reports
    /// these and keeps going.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            QuoteError::InvalidLineItem { .. }
                | QuoteError::InvalidItemAmount(_)
                | QuoteError::DetailHidden(_)
                | QuoteError::InvalidDate(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_classified() {
        assert!(QuoteError::InvalidItemAmount("-1".into()).is_validation());
        assert!(QuoteError::InvalidDate("05/03/2024".into()).is_validation());
        assert!(!QuoteError::UnknownService("alarme".into()).is_validation());
        assert!(!QuoteError::DraftNotFound(PathBuf::from("/nope")).is_validation());
    }
}
