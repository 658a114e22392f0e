//! Infrastructure layer.
//!
//! Configuration loading and the composition root that turns a [`Config`]
//! into running components.
//!
//! [`Config`]: config::settings::Config

pub mod bootstrap;
pub mod config;
