use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{CollectionError, SampleError};

pub const PROC_STAT: &str = "/proc/stat";

const FIELD_COUNT: usize = 10;

/// Cumulative time counters of the aggregate `cpu` line, in clock ticks since boot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuSnapshot {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuSnapshot {
    pub fn from_fields(f: [u64; FIELD_COUNT]) -> Self {
        CpuSnapshot {
            user: f[0],
            nice: f[1],
            system: f[2],
            idle: f[3],
            iowait: f[4],
            irq: f[5],
            softirq: f[6],
            steal: f[7],
            guest: f[8],
            guest_nice: f[9],
        }
    }

    pub fn fields(&self) -> [u64; FIELD_COUNT] {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
            self.guest,
            self.guest_nice,
        ]
    }

    pub fn total(&self) -> u64 {
        self.fields()
            .iter()
            .fold(0u64, |acc, &v| acc.saturating_add(v))
    }

    pub fn idle_total(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn used(&self) -> u64 {
        self.total().saturating_sub(self.idle_total())
    }
}

impl FromStr for CpuSnapshot {
    type Err = String;

    /// Parses the aggregate line, e.g. `cpu  4705 356 584 3699 23 23 0 0 0 0`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("cpu") => {}
            Some(other) => return Err(format!("expected aggregate `cpu` line, found `{other}`")),
            None => return Err("empty counter line".to_string()),
        }

        let values = parts
            .map(|p| {
                p.parse::<u64>()
                    .map_err(|e| format!("invalid counter `{p}`: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let fields: [u64; FIELD_COUNT] = values.as_slice().try_into().map_err(|_| {
            format!(
                "expected {FIELD_COUNT} counters, found {}",
                values.len()
            )
        })?;
        Ok(CpuSnapshot::from_fields(fields))
    }
}

/// Reads the current cumulative counters from the first line of `path`.
pub fn collect(path: &Path) -> Result<CpuSnapshot, CollectionError> {
    let _span = tracing::debug_span!("cpu.collect").entered();

    let contents = fs::read_to_string(path).map_err(|e| CollectionError::io(path, e))?;
    let line = contents
        .lines()
        .next()
        .ok_or_else(|| CollectionError::malformed(path, "file is empty"))?;
    let snapshot = line
        .parse::<CpuSnapshot>()
        .map_err(|reason| CollectionError::malformed(path, reason))?;

    debug!(used = snapshot.used(), total = snapshot.total(), "cpu counters read");
    Ok(snapshot)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PreviousCounters {
    total: u64,
    idle: u64,
}

impl PreviousCounters {
    fn used(&self) -> u64 {
        self.total.saturating_sub(self.idle)
    }
}

/// Result of feeding one snapshot to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuUpdate {
    /// Non-idle ticks of the new snapshot.
    pub used: u64,
    /// `used - previous_used`; `None` for the baseline call, which has nothing to compare against.
    pub delta_used: Option<i128>,
}

impl CpuUpdate {
    pub fn is_baseline(&self) -> bool {
        self.delta_used.is_none()
    }

    /// Utilization against the previous snapshot; `None` for a baseline.
    pub fn utilization(&self) -> Option<Result<f64, SampleError>> {
        let delta = self.delta_used?;
        let previous = u64::try_from(i128::from(self.used) - delta).unwrap_or(0);
        Some(utilization_percent(previous, self.used))
    }
}

/// Holds the counters of the last snapshot so consecutive samples can be compared.
#[derive(Debug, Default)]
pub struct CpuSampleEngine {
    previous: Option<PreviousCounters>,
}

impl CpuSampleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }

    pub fn update(&mut self, snapshot: &CpuSnapshot) -> CpuUpdate {
        let used = snapshot.used();
        let delta_used = self
            .previous
            .map(|prev| i128::from(used) - i128::from(prev.used()));

        self.previous = Some(PreviousCounters {
            total: snapshot.total(),
            idle: snapshot.idle_total(),
        });

        CpuUpdate { used, delta_used }
    }
}

/// `|used_now - used_prev| / used_prev * 100`.
///
/// This is relative growth of the busy-tick counter rather than the usual
/// `delta_used / delta_total`; output stays compatible with the reports this
/// tool has always produced.
pub fn utilization_percent(used_prev: u64, used_now: u64) -> Result<f64, SampleError> {
    if used_prev == 0 {
        return Err(SampleError::DivisionByZero);
    }
    Ok(used_now.abs_diff(used_prev) as f64 / used_prev as f64 * 100.0)
}
