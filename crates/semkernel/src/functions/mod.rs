//! Kernel functions shipped with the app

pub mod chat;
pub mod samples;

pub use chat::ChatFunction;
pub use samples::sample_functions;
