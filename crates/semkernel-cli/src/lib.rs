//! semkernel CLI library

pub mod commands;
pub mod error;

use std::path::{Path, PathBuf};

use semkernel::SemkernelConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{CliError, Result};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SEMKERNEL_LOG";

/// Result type requested with `--result-type`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResultKind {
    /// Print the function result as returned
    #[default]
    Raw,
    String,
    Int,
    Long,
    Float,
    Double,
    Bool,
    Number,
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResultKind::Raw => "raw",
            ResultKind::String => "string",
            ResultKind::Int => "int",
            ResultKind::Long => "long",
            ResultKind::Float => "float",
            ResultKind::Double => "double",
            ResultKind::Bool => "bool",
            ResultKind::Number => "number",
        };
        write!(f, "{name}")
    }
}

/// `<config dir>/semkernel/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("semkernel").join("config.toml"))
}

/// Load the explicit config file, else the default one when present, else defaults
pub fn load_config(path: Option<&Path>) -> Result<SemkernelConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(SemkernelConfig::default()),
        },
    };
    SemkernelConfig::load_from_file(&path).map_err(|e| CliError::Config(e.to_string()))
}

/// Install the stderr subscriber; `level` wins over `SEMKERNEL_LOG`, then `fallback`
pub fn init_tracing(level: Option<&str>, fallback: &str) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback)),
    };
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_explicit_config_must_exist() {
        let err = load_config(Some(Path::new("/nonexistent/semkernel.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let path = std::env::temp_dir().join(format!("semkernel-cli-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"log_level": "trace"}"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_result_kind_display() {
        assert_eq!(ResultKind::default().to_string(), "raw");
        assert_eq!(ResultKind::Double.to_string(), "double");
    }
}
