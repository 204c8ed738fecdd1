use thiserror::Error;

pub type Result<T> = std::result::Result<T, KeyError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Identifier is empty or contains the `#` delimiter
    #[error("Invalid identifier for {field}: {value:?}")]
    InvalidIdentifier { field: &'static str, value: String },

    /// Stored key does not match any known layout
    #[error("Malformed key {key:?}: {reason}")]
    MalformedKey { key: String, reason: String },
}

impl KeyError {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            field,
            value: value.into(),
        }
    }

    pub fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
