use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("not initialized: run 'forge init'")]
    NotInitialized,

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template already exists: {0}")]
    TemplateExists(String),

    #[error("prompt not found: {0}")]
    PromptNotFound(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid input type: {0}")]
    InvalidInputType(String),

    #[error("invalid severity: {0}")]
    InvalidSeverity(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
