//! Host metrics and display doubles.

use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{Frame, GaugeSnapshot, Usage};
use crate::error::{Error, Result};
use crate::port::{ActivitySource, FrameSink, HostMetricsSource};

/// Per-metric call counters shared with a [`StaticHost`].
#[derive(Clone, Default)]
pub struct HostCalls {
    cpu: Arc<AtomicU32>,
    memory: Arc<AtomicU32>,
    disk: Arc<AtomicU32>,
}

impl HostCalls {
    pub fn cpu(&self) -> u32 {
        self.cpu.load(Ordering::SeqCst)
    }

    pub fn memory(&self) -> u32 {
        self.memory.load(Ordering::SeqCst)
    }

    pub fn disk(&self) -> u32 {
        self.disk.load(Ordering::SeqCst)
    }
}

/// Host source returning constant readings.
#[derive(Default)]
pub struct StaticHost {
    calls: HostCalls,
}

impl StaticHost {
    pub const CPU_PERCENT: f32 = 12.5;
    pub const CPU_TEMP_C: f32 = 48.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> HostCalls {
        self.calls.clone()
    }
}

impl HostMetricsSource for StaticHost {
    fn cpu_percent(&mut self) -> f32 {
        self.calls.cpu.fetch_add(1, Ordering::SeqCst);
        Self::CPU_PERCENT
    }

    fn cpu_temperature(&mut self) -> f32 {
        Self::CPU_TEMP_C
    }

    fn memory(&mut self) -> Usage {
        self.calls.memory.fetch_add(1, Ordering::SeqCst);
        Usage::new(2 << 30, 8 << 30)
    }

    fn swap(&mut self) -> Usage {
        Usage::new(0, 1 << 30)
    }

    fn disk(&mut self) -> Usage {
        self.calls.disk.fetch_add(1, Ordering::SeqCst);
        Usage::new(500 << 30, 2000 << 30)
    }

    fn ip_address(&mut self) -> Option<IpAddr> {
        Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)))
    }
}

/// Activity source pinned to one snapshot.
pub struct FixedActivity {
    snapshot: GaugeSnapshot,
}

impl FixedActivity {
    pub fn new(snapshot: GaugeSnapshot) -> Arc<Self> {
        Arc::new(Self { snapshot })
    }

    pub fn zero() -> Arc<Self> {
        Self::new(GaugeSnapshot::default())
    }
}

impl ActivitySource for FixedActivity {
    fn execution_activity(&self) -> u8 {
        self.snapshot.gauges.execution
    }

    fn node_activity(&self) -> u8 {
        self.snapshot.gauges.node
    }

    fn consensus_activity(&self) -> u8 {
        self.snapshot.gauges.consensus
    }

    fn snapshot(&self) -> GaugeSnapshot {
        self.snapshot
    }
}

/// Sink that keeps every frame it receives.
#[derive(Default)]
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Arc<Mutex<Vec<Frame>>> {
        Arc::clone(&self.frames)
    }
}

impl FrameSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.frames.lock().push(frame.clone());
        Ok(())
    }
}

/// Sink that rejects every frame.
pub struct FailingSink;

impl FrameSink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn present(&mut self, _frame: &Frame) -> Result<()> {
        Err(Error::Io(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "display unavailable",
        )))
    }
}
