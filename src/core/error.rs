use thiserror::Error;

/// Construction-time contract violations. Widgets fail fast with one of these
/// instead of misbehaving later.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("render_item is required")]
    MissingRenderItem,
    #[error("either items or a page fetcher is required")]
    MissingSource,
    #[error("items and a page fetcher are mutually exclusive")]
    ConflictingSource,
    #[error("page size must be at least 1, got {0}")]
    InvalidPageSize(usize),
    #[error("threshold must be a finite, non-negative pixel distance, got {0}")]
    InvalidThreshold(f64),
    #[error("container height '{0}' is not a CSS length")]
    InvalidContainerHeight(String),
    #[error("selection mode {0} requires a row key extractor")]
    MissingRowKey(&'static str),
    #[error("duplicate column field '{0}'")]
    DuplicateColumn(String),
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("options parse error: {0}")]
    Parse(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

/// Failure reported by a page fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("fetch failed: {0}")]
    Failed(String),
    #[error("fetch panicked")]
    Panicked,
}

impl FetchError {
    pub fn failed(message: impl Into<String>) -> Self {
        FetchError::Failed(message.into())
    }
}
