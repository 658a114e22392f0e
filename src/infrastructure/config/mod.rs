//! Infrastructure configuration modules.

pub mod dashboard;
pub mod influx;
pub mod logging;
pub mod reconnect;
pub mod settings;
