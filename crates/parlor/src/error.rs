use parlor_agent::AgentError;
use parlor_config::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParlorError>;

#[derive(Debug, Error)]
pub enum ParlorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
