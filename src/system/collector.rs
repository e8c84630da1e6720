use std::fs;
use std::path::Path;

use sysinfo::System;
use tracing::debug;

use super::cpu::{self, CpuSnapshot};
use super::platform;
use super::sessions::{self, UserSession};
use super::snapshot::{HostIdentity, MemoryUsage, ProgramMemory};
use crate::config::SourcesConfig;
use crate::error::CollectionError;

pub const CPUINFO: &str = "/proc/cpuinfo";

/// Everything the scheduler reads from the host. One call, one attempt.
pub trait MetricSource {
    fn host_identity(&mut self) -> Result<HostIdentity, CollectionError>;
    fn program_memory(&mut self) -> Result<ProgramMemory, CollectionError>;
    fn memory_usage(&mut self) -> Result<MemoryUsage, CollectionError>;
    fn core_count(&mut self) -> Result<usize, CollectionError>;
    fn sessions(&mut self) -> Result<Vec<UserSession>, CollectionError>;
    fn cpu_counters(&mut self) -> Result<CpuSnapshot, CollectionError>;
}

#[derive(Default)]
pub struct Collector {
    sources: SourcesConfig,
}

impl Collector {
    pub fn from_sources(sources: SourcesConfig) -> Self {
        Collector { sources }
    }
}

impl MetricSource for Collector {
    fn host_identity(&mut self) -> Result<HostIdentity, CollectionError> {
        platform::host_identity()
    }

    fn program_memory(&mut self) -> Result<ProgramMemory, CollectionError> {
        platform::program_memory()
    }

    fn memory_usage(&mut self) -> Result<MemoryUsage, CollectionError> {
        let totals = platform::memory_totals()?;
        debug!(?totals, "memory totals read");
        Ok(MemoryUsage::from(totals))
    }

    fn core_count(&mut self) -> Result<usize, CollectionError> {
        read_core_count(&self.sources.cpuinfo)
    }

    fn sessions(&mut self) -> Result<Vec<UserSession>, CollectionError> {
        sessions::read_sessions(&self.sources.utmp)
    }

    fn cpu_counters(&mut self) -> Result<CpuSnapshot, CollectionError> {
        cpu::collect(&self.sources.proc_stat)
    }
}

/// First `cpu cores` value in cpuinfo-formatted text.
pub fn parse_core_count(text: &str) -> Option<usize> {
    text.lines()
        .filter(|line| line.starts_with("cpu cores"))
        .find_map(|line| line.split_once(':')?.1.trim().parse().ok())
}

fn read_core_count(path: &Path) -> Result<usize, CollectionError> {
    let text = fs::read_to_string(path).map_err(|e| CollectionError::io(path, e))?;
    if let Some(cores) = parse_core_count(&text) {
        return Ok(cores);
    }

    // Architectures such as arm64 do not publish `cpu cores`.
    let mut sys = System::new();
    sys.refresh_cpu_all();
    let cpus = sys.cpus().len();
    debug!(cpus, path = %path.display(), "no `cpu cores` field, using cpu count");
    Ok(cpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    const X86_CPUINFO: &str = "processor\t: 0\n\
vendor_id\t: GenuineIntel\n\
cpu family\t: 6\n\
siblings\t: 8\n\
core id\t\t: 0\n\
cpu cores\t: 4\n\
apicid\t\t: 0\n\
\n\
processor\t: 1\n\
cpu cores\t: 4\n";

    #[test]
    fn parses_first_cpu_cores_field() {
        assert_eq!(parse_core_count(X86_CPUINFO), Some(4));
    }

    #[test]
    fn missing_cpu_cores_field() {
        let arm = "processor\t: 0\nBogoMIPS\t: 48.00\nFeatures\t: fp asimd\n";
        assert_eq!(parse_core_count(arm), None);
    }

    #[test]
    fn fallback_when_field_absent() {
        let path = std::env::temp_dir().join("sysglance_test_cpuinfo_arm");
        std::fs::write(&path, "processor\t: 0\nBogoMIPS\t: 48.00\n").unwrap();
        let cores = read_core_count(&path).unwrap();
        assert!(cores >= 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unreadable_cpuinfo_is_fatal() {
        let err = read_core_count(Path::new("/nonexistent/sysglance/cpuinfo")).unwrap_err();
        assert!(matches!(err, CollectionError::Io { .. }));
    }
}
