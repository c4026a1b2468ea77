//! This module contains code relevant to the application's runtime, such as
//! signal handlers or [`Config`].

pub mod signals;

pub mod config;
pub use config::{Config, InitializeConfigError};
