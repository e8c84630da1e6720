use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use super::{FieldSpan, LoginRecordLayout, PlatformExtensions};
use crate::error::CollectionError;
use crate::system::snapshot::{HostIdentity, MemoryTotals, ProgramMemory};

/// Hosts without `uname`/`sysinfo(2)` semantics we rely on; values come from `sysinfo`.
pub struct Platform;

/// glibc `struct utmp` on 64-bit targets.
pub(super) const LOGIN_RECORD: LoginRecordLayout = LoginRecordLayout {
    size: 384,
    kind: 0,
    line: FieldSpan { offset: 8, len: 32 },
    user: FieldSpan { offset: 44, len: 32 },
    host: FieldSpan { offset: 76, len: 256 },
};

impl PlatformExtensions for Platform {
    fn host_identity() -> Result<HostIdentity, CollectionError> {
        Ok(HostIdentity {
            system_name: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            node_name: System::host_name().unwrap_or_default(),
            release: System::kernel_version().unwrap_or_default(),
            version: System::os_version().unwrap_or_default(),
            machine: std::env::consts::ARCH.to_string(),
        })
    }

    // Current RSS; peak RSS is not exposed portably.
    fn program_memory() -> Result<ProgramMemory, CollectionError> {
        let pid = sysinfo::get_current_pid().map_err(|e| CollectionError::SystemCall {
            call: "get_current_pid",
            source: std::io::Error::other(e),
        })?;
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        let max_rss_kb = sys.process(pid).map(|p| p.memory() / 1024).unwrap_or(0);
        Ok(ProgramMemory { max_rss_kb })
    }

    fn memory_totals() -> Result<MemoryTotals, CollectionError> {
        let mut sys = System::new();
        sys.refresh_memory();
        Ok(MemoryTotals {
            total_ram: sys.total_memory(),
            free_ram: sys.free_memory(),
            total_swap: sys.total_swap(),
            free_swap: sys.free_swap(),
            mem_unit: 1,
        })
    }
}
