//! CLI command handlers

pub mod chat;
pub mod functions;
pub mod invoke;
pub mod types;

pub use chat::run_chat;
pub use functions::run_functions;
pub use invoke::run_invoke;
pub use types::run_types;
