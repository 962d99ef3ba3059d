use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lexicon is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("malformed lexicon markup: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
    #[error("<{element}> in entry {entry} is missing required {attribute}")]
    MissingAttribute {
        element: String,
        attribute: String,
        entry: String,
    },
    #[error("entry {entry} has no forms")]
    MissingForm { entry: String },
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing(element: &str, attribute: &str, entry: &str) -> Self {
        ConvertError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            entry: entry.to_string(),
        }
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
