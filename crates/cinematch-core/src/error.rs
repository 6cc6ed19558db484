use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort catalog loading. No partial catalog is ever returned.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

pub type Result<T> = std::result::Result<T, DataLoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_every_column() {
        let err = DataLoadError::MissingColumns(vec!["Genre".to_string(), "Star4".to_string()]);
        assert_eq!(
            err.to_string(),
            "catalog is missing required columns: Genre, Star4"
        );
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = DataLoadError::Io {
            path: PathBuf::from("/nope/catalog.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/nope/catalog.csv"));
    }
}
