use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterseekError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Execution error: {0}")]
    Execution(String),
}

pub type Result<T> = std::result::Result<T, ClusterseekError>;

// Helper conversions
impl From<rusqlite::Error> for ClusterseekError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Catalog(e.to_string())
    }
}

impl From<config::ConfigError> for ClusterseekError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
