/// Static identity of the running host, as reported by `uname`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostIdentity {
    pub system_name: String,
    pub node_name: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

/// Peak resident set size of this process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgramMemory {
    pub max_rss_kb: u64,
}

/// Raw memory record; every amount is a multiple of `mem_unit` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryTotals {
    pub total_ram: u64,
    pub free_ram: u64,
    pub total_swap: u64,
    pub free_swap: u64,
    pub mem_unit: u64,
}

/// Physical and virtual (RAM + swap) usage in bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    pub physical_used: u64,
    pub physical_total: u64,
    pub virtual_used: u64,
    pub virtual_total: u64,
}

impl From<MemoryTotals> for MemoryUsage {
    fn from(t: MemoryTotals) -> Self {
        let unit = t.mem_unit.max(1);
        let physical_total = t.total_ram.saturating_mul(unit);
        let free_ram = t.free_ram.saturating_mul(unit);
        let free_swap = t.free_swap.saturating_mul(unit);
        let virtual_total = t.total_ram.saturating_add(t.total_swap).saturating_mul(unit);

        MemoryUsage {
            physical_used: physical_total.saturating_sub(free_ram),
            physical_total,
            virtual_used: virtual_total.saturating_sub(free_swap).saturating_sub(free_ram),
            virtual_total,
        }
    }
}
