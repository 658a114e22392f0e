//! Headless display loop.
//!
//! On every tick the loop samples local metrics on a tiered cadence, reads
//! the activity gauges without blocking the metrics store, and hands the
//! resulting [`Frame`] to each configured sink.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::domain::{Frame, HostSnapshot};
use crate::error::describe;
use crate::infrastructure::config::dashboard::DashboardConfig;
use crate::port::{ActivitySource, FrameSink, HostMetricsSource};

/// Periodic frame producer. Reads the store, never writes it.
pub struct DisplayLoop<H: HostMetricsSource> {
    hostname: String,
    host: H,
    activity: Arc<dyn ActivitySource>,
    sinks: Vec<Box<dyn FrameSink>>,
    config: DashboardConfig,
    snapshot: HostSnapshot,
    tick: u64,
}

impl<H: HostMetricsSource> DisplayLoop<H> {
    pub fn new(
        hostname: impl Into<String>,
        host: H,
        activity: Arc<dyn ActivitySource>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            host,
            activity,
            sinks: Vec::new(),
            config,
            snapshot: HostSnapshot::default(),
            tick: 0,
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn FrameSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Number of frames produced so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Refresh whichever host metrics are due on the current tick.
    ///
    /// CPU every tick, memory every `medium_every` ticks, disk and address
    /// every `slow_every` ticks. Tick 0 samples everything.
    fn sample(&mut self) {
        let tick = self.tick;
        self.snapshot.cpu_percent = self.host.cpu_percent();
        self.snapshot.cpu_temp_c = self.host.cpu_temperature();

        if tick % self.config.medium_every.max(1) == 0 {
            self.snapshot.memory = self.host.memory();
            self.snapshot.swap = self.host.swap();
        }

        if tick % self.config.slow_every.max(1) == 0 {
            self.snapshot.disk = self.host.disk();
            self.snapshot.ip_address = self.host.ip_address();
        }
    }

    /// Build the frame for the current tick and advance the tick counter.
    pub fn next_frame(&mut self) -> Frame {
        self.sample();
        let frame = Frame {
            hostname: self.hostname.clone(),
            tick: self.tick,
            captured_at: Utc::now(),
            host: self.snapshot.clone(),
            activity: self.activity.snapshot(),
        };
        self.tick += 1;
        frame
    }

    /// Produce one frame and present it. Sink failures are logged and skipped.
    pub fn step(&mut self) -> Frame {
        let frame = self.next_frame();
        for sink in &mut self.sinks {
            if let Err(err) = sink.present(&frame) {
                warn!(
                    sink = sink.name(),
                    tick = frame.tick,
                    error = %describe(&err),
                    "Failed to present frame"
                );
            }
        }
        frame
    }

    /// Tick until shutdown is signalled.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.config.refresh_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            refresh_ms = self.config.refresh_interval_ms,
            sinks = self.sinks.len(),
            "Entering display loop"
        );

        loop {
            tokio::select! {
                _ = shutdown.wait_for(|stop| *stop) => break,
                _ = interval.tick() => {
                    self.step();
                }
            }
        }
        info!(frames = self.tick, "Display loop stopped");
    }
}
