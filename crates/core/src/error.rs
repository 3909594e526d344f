use thiserror::Error;

/// Problems in symbol or template configuration. Suggestion generation itself
/// has no failure path.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("symbol table token must not be empty")]
    EmptyToken,

    #[error("empty symbol for `{token}`")]
    EmptySymbol { token: String },

    #[error("invalid pattern for category `{name}`")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("template table `{table}` has no usable candidates")]
    EmptyTemplate { table: String },

    #[error("malformed configuration json")]
    Json(#[from] serde_json::Error),
}
