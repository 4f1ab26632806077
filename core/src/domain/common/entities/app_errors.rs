use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Empty query or empty image; callers treat it as a silent no-op.
    #[error("Input is empty")]
    EmptyInput,

    #[error("External service error: {0}")]
    Transport(String),

    #[error("Unexpected response format: {0}")]
    ResponseFormat(String),

    #[error("Failed to read local storage: {0}")]
    StorageRead(String),

    #[error("Failed to write local storage: {0}")]
    StorageWrite(String),

    #[error("Favorites are full (limit {limit})")]
    FavoritesFull { limit: usize },

    #[error("Another request is already in flight")]
    Busy,

    #[error("No analysis is currently open")]
    NoActiveAnalysis,

    #[error("No ingredient at index {0}")]
    InvalidIngredientIndex(usize),

    #[error("Not found")]
    NotFound,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    /// Message shown to the user when an analysis-bound action fails.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Transport(_) | CoreError::ResponseFormat(_) => {
                "Failed to analyze. Please try again.".to_string()
            }
            CoreError::FavoritesFull { limit } => {
                format!("You already have {} favorites. Remove one first.", limit)
            }
            CoreError::StorageWrite(_) => "Could not save your changes.".to_string(),
            CoreError::Busy => "Please wait for the current request to finish.".to_string(),
            other => other.to_string(),
        }
    }
}
