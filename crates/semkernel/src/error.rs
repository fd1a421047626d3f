//! Error types for semkernel crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SemkernelAppError {
    #[error("Core error: {0}")]
    Core(#[from] semkernel_core::SemkernelError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    #[error("Build error: {0}")]
    Build(String),
}

pub type Result<T> = std::result::Result<T, SemkernelAppError>;
