pub mod closed;
pub mod config;
pub mod show;
