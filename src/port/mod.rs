//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Influx  │            │   sysinfo   │              │   Frame   │
//! │ Adapter │            │   Adapter   │              │   Sinks   │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod inbound;
pub mod outbound;

pub use inbound::activity::ActivitySource;
pub use outbound::display::FrameSink;
pub use outbound::host::HostMetricsSource;
pub use outbound::timeseries::{SeriesSession, SessionFactory};
