use crate::error::CollectionError;
use crate::system::snapshot::{HostIdentity, MemoryTotals, ProgramMemory};

/// A fixed-width text field inside a login record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpan {
    pub offset: usize,
    pub len: usize,
}

impl FieldSpan {
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Byte layout of one login record as the C library writes it on this target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoginRecordLayout {
    pub size: usize,
    /// Offset of the native-endian `i16` record type.
    pub kind: usize,
    pub line: FieldSpan,
    pub user: FieldSpan,
    pub host: FieldSpan,
}

pub const LOGIN_RECORD: LoginRecordLayout = platform_impl::LOGIN_RECORD;

pub trait PlatformExtensions {
    fn host_identity() -> Result<HostIdentity, CollectionError>;
    fn program_memory() -> Result<ProgramMemory, CollectionError>;
    fn memory_totals() -> Result<MemoryTotals, CollectionError>;
}

#[cfg(not(target_os = "linux"))]
mod fallback;
#[cfg(target_os = "linux")]
mod linux;

#[cfg(not(target_os = "linux"))]
use fallback as platform_impl;
#[cfg(target_os = "linux")]
use linux as platform_impl;

pub fn host_identity() -> Result<HostIdentity, CollectionError> {
    platform_impl::Platform::host_identity()
}

pub fn program_memory() -> Result<ProgramMemory, CollectionError> {
    platform_impl::Platform::program_memory()
}

pub fn memory_totals() -> Result<MemoryTotals, CollectionError> {
    platform_impl::Platform::memory_totals()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_record_fields_fit_inside_record() {
        let layout = LOGIN_RECORD;
        assert!(layout.kind + 2 <= layout.line.offset);
        assert!(layout.line.end() <= layout.user.offset);
        assert!(layout.user.end() <= layout.host.offset);
        assert!(layout.host.end() <= layout.size);
        assert!(layout.user.len > 0 && layout.line.len > 0 && layout.host.len > 0);
    }

    #[cfg(all(target_os = "linux", target_env = "gnu", target_pointer_width = "64"))]
    #[test]
    fn login_record_matches_glibc_64_bit_layout() {
        assert_eq!(LOGIN_RECORD.size, 384);
        assert_eq!(LOGIN_RECORD.kind, 0);
        assert_eq!(LOGIN_RECORD.line, FieldSpan { offset: 8, len: 32 });
        assert_eq!(LOGIN_RECORD.user, FieldSpan { offset: 44, len: 32 });
        assert_eq!(LOGIN_RECORD.host, FieldSpan { offset: 76, len: 256 });
    }

    #[test]
    fn host_identity_is_populated() {
        let host = host_identity().unwrap();
        assert!(!host.system_name.is_empty());
        assert!(!host.machine.is_empty());
    }

    #[test]
    fn program_memory_is_nonzero() {
        assert!(program_memory().unwrap().max_rss_kb > 0);
    }

    #[test]
    fn memory_totals_are_consistent() {
        let totals = memory_totals().unwrap();
        assert!(totals.total_ram > 0);
        assert!(totals.free_ram <= totals.total_ram);
        assert!(totals.free_swap <= totals.total_swap);
    }
}
