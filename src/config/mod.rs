//! Configuration module for bluesdr
//!
//! Handles loading and managing application settings from TOML files.

mod settings;

pub use settings::{GeneralSettings, LlmSettings, Settings};
