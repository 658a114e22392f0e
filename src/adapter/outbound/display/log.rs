//! Frame sink that emits structured log events.

use tracing::{debug, info};

use crate::domain::Frame;
use crate::error::Result;
use crate::port::FrameSink;

/// Logs each frame at debug level and every `summary_every`-th frame at info.
pub struct LogSink {
    summary_every: u64,
}

impl LogSink {
    #[must_use]
    pub fn new(summary_every: u64) -> Self {
        Self {
            summary_every: summary_every.max(1),
        }
    }
}

impl FrameSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let gauges = frame.activity.gauges;
        let ip = frame
            .host
            .ip_address
            .map_or_else(|| "-".to_string(), |ip| ip.to_string());
        if frame.tick % self.summary_every == 0 {
            info!(
                host = %frame.hostname,
                cpu_percent = frame.host.cpu_percent,
                cpu_temp_c = frame.host.cpu_temp_c,
                memory_percent = frame.host.memory.percent(),
                swap_percent = frame.host.swap.percent(),
                disk_percent = frame.host.disk.percent(),
                ip = %ip,
                execution = gauges.execution,
                node = gauges.node,
                consensus = gauges.consensus,
                connected = frame.activity.connected,
                "Dashboard frame"
            );
        } else {
            debug!(
                tick = frame.tick,
                cpu_percent = frame.host.cpu_percent,
                execution = gauges.execution,
                node = gauges.node,
                consensus = gauges.consensus,
                "Dashboard frame"
            );
        }
        Ok(())
    }
}
