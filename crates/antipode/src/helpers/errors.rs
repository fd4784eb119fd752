use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Scene error: {0}")]
    Scene(String),

    #[error("Config load error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Unexpected internal error: {0}")]
    Internal(String),
}

pub trait SceneContext<T> {
    fn scene(self, msg: &str) -> Result<T, VisError>;
}

impl<T, E> SceneContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn scene(self, msg: &str) -> Result<T, VisError> {
        self.map_err(|e| VisError::Scene(format!("{}: {}", msg, e)))
    }
}
