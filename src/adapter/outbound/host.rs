//! Local OS metrics through `sysinfo`.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use sysinfo::{Components, CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};
use tracing::debug;

use crate::domain::Usage;
use crate::port::HostMetricsSource;

/// Keeps `sysinfo` handles alive between ticks so CPU usage has a baseline.
pub struct SysinfoHost {
    sys: System,
    components: Components,
    disks: Disks,
    networks: Networks,
    disk_path: PathBuf,
    interfaces: Vec<String>,
}

impl SysinfoHost {
    pub fn new(disk_path: impl Into<PathBuf>, interfaces: Vec<String>) -> Self {
        let mut sys = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        Self {
            sys,
            components: Components::new_with_refreshed_list(),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            disk_path: disk_path.into(),
            interfaces,
        }
    }
}

impl HostMetricsSource for SysinfoHost {
    fn cpu_percent(&mut self) -> f32 {
        self.sys.refresh_cpu_usage();
        self.sys.global_cpu_usage()
    }

    fn cpu_temperature(&mut self) -> f32 {
        self.components.refresh();
        match self.components.list().first() {
            Some(sensor) => sensor.temperature(),
            None => {
                debug!("No temperature sensors available");
                0.0
            }
        }
    }

    fn memory(&mut self) -> Usage {
        self.sys.refresh_memory();
        Usage::new(self.sys.used_memory(), self.sys.total_memory())
    }

    fn swap(&mut self) -> Usage {
        self.sys.refresh_memory();
        Usage::new(self.sys.used_swap(), self.sys.total_swap())
    }

    fn disk(&mut self) -> Usage {
        self.disks.refresh_list();
        let mounts = self
            .disks
            .list()
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let used = total.saturating_sub(disk.available_space());
                (disk.mount_point(), Usage::new(used, total))
            });
        mount_for(&self.disk_path, mounts).unwrap_or_default()
    }

    fn ip_address(&mut self) -> Option<IpAddr> {
        self.networks.refresh_list();
        let networks = self.networks.list();
        self.interfaces.iter().find_map(|name| {
            let data = networks.get(name)?;
            first_routable_v4(data.ip_networks().iter().map(|net| net.addr))
        })
    }
}

/// Usage of the mount point that is the longest prefix of `path`.
fn mount_for<'a>(
    path: &Path,
    mounts: impl Iterator<Item = (&'a Path, Usage)>,
) -> Option<Usage> {
    mounts
        .filter(|(mount, _)| path.starts_with(mount))
        .max_by_key(|(mount, _)| mount.components().count())
        .map(|(_, usage)| usage)
}

/// First IPv4 address that is not loopback.
fn first_routable_v4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<IpAddr> {
    addrs
        .into_iter()
        .find(|addr| matches!(addr, IpAddr::V4(v4) if !v4.is_loopback()))
}
