//! Error types for semkernel-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SemkernelError {
    /// A function result could not be coerced into the type requested by the caller.
    #[error("Failed to convert result to requested type: {type_name}")]
    ResultConversion {
        type_name: String,
        #[source]
        source: Box<SemkernelError>,
    },

    #[error("Unable to convert {from} to {to}")]
    Conversion { from: String, to: String },

    #[error("Failed to parse {input:?} as {type_name}: {reason}")]
    Parse {
        type_name: String,
        input: String,
        reason: String,
    },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("No converter registered for type {0}")]
    NoConverter(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No chat completion service found: {0}")]
    ServiceNotFound(String),

    #[error("Chat completion error: {0}")]
    ChatCompletion(String),

    #[error("Function {function} failed: {reason}")]
    FunctionInvocation { function: String, reason: String },
}

impl SemkernelError {
    pub fn parse(
        type_name: impl Into<String>,
        input: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        SemkernelError::Parse {
            type_name: type_name.into(),
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    pub fn function(function: impl Into<String>, reason: impl Into<String>) -> Self {
        SemkernelError::FunctionInvocation {
            function: function.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SemkernelError>;
