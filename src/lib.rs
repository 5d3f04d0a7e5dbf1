// Library exports for the fit-coach CLI
// This allows testing of internal modules

pub mod api;
pub mod commands;
pub mod config;
pub mod models;
pub mod prompt;
pub mod session;
