//! Frame sinks: headless stand-ins for the physical display.

mod log;
mod status_file;

pub use log::LogSink;
pub use status_file::StatusFileSink;
