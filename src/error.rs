//! Storage and configuration errors.

/// Error returned by [`crate::store::KeyValueStore`] and [`crate::repo::SetRepository`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Storage is disabled, missing, or refused the write (quota exceeded).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The stored text under `key` is not a JSON array of strings.
    #[error("corrupt state under `{key}`: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// The set could not be serialized.
    #[error("failed to encode identifier set: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Error returned by [`crate::config::Config::from_json`] and [`crate::config::Config::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must not be empty")]
    Empty { field: &'static str },
    #[error("groups `{first}` and `{second}` share storage key `{key}`")]
    SharedKey { first: String, second: String, key: String },
}
