//! Tutor router daemon library - exposes modules for testing.

pub mod analyzer;
pub mod config;
pub mod executor;
pub mod params;
pub mod routes;
pub mod rules;
pub mod schema;
pub mod selector;
pub mod server;
pub mod service;
pub mod sessions;
pub mod suggestions;
pub mod translator;
