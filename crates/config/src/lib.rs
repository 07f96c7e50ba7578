//! Persistent CLI configuration.

mod settings;

pub use settings::Settings;
