//! Configuration — `config.toml` loading and path resolution defaults.

pub mod settings;

pub use settings::Settings;
