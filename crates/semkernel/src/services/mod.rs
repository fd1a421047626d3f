//! Chat completion services bundled with the app

pub mod echo;

pub use echo::EchoChatCompletion;
