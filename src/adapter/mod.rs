//! Adapters implementing the ports against real infrastructure.

pub mod outbound;
