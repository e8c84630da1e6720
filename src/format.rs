use crate::error::SampleError;
use crate::system::snapshot::MemoryUsage;

const GB: u64 = 1024 * 1024 * 1024;

pub fn format_gb(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / GB as f64)
}

pub fn format_used_of_total(used: u64, total: u64) -> String {
    format!("{} / {}", format_gb(used), format_gb(total))
}

/// `phys used / phys total  --  virt used / virt total`
pub fn format_memory_usage(usage: &MemoryUsage) -> String {
    format!(
        "{}  --  {}",
        format_used_of_total(usage.physical_used, usage.physical_total),
        format_used_of_total(usage.virtual_used, usage.virtual_total)
    )
}

pub fn format_percent(reading: Result<f64, SampleError>) -> String {
    match reading {
        Ok(pct) => format!("{pct:.2}%"),
        Err(e) => format!("n/a ({e})"),
    }
}
