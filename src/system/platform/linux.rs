use std::ffi::CStr;
use std::mem::{MaybeUninit, offset_of};

use libc::{c_char, utmpx};

use super::{FieldSpan, LoginRecordLayout, PlatformExtensions};
use crate::error::CollectionError;
use crate::system::snapshot::{HostIdentity, MemoryTotals, ProgramMemory};

pub struct Platform;

// Each text field runs up to the start of the field that follows it.
pub(super) const LOGIN_RECORD: LoginRecordLayout = LoginRecordLayout {
    size: size_of::<utmpx>(),
    kind: offset_of!(utmpx, ut_type),
    line: FieldSpan {
        offset: offset_of!(utmpx, ut_line),
        len: offset_of!(utmpx, ut_id) - offset_of!(utmpx, ut_line),
    },
    user: FieldSpan {
        offset: offset_of!(utmpx, ut_user),
        len: offset_of!(utmpx, ut_host) - offset_of!(utmpx, ut_user),
    },
    host: FieldSpan {
        offset: offset_of!(utmpx, ut_host),
        len: offset_of!(utmpx, ut_exit) - offset_of!(utmpx, ut_host),
    },
};

fn field(raw: &[c_char]) -> String {
    // utsname fields are NUL-terminated within their fixed buffers
    unsafe { CStr::from_ptr(raw.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

impl PlatformExtensions for Platform {
    fn host_identity() -> Result<HostIdentity, CollectionError> {
        let mut buf = MaybeUninit::<libc::utsname>::zeroed();
        if unsafe { libc::uname(buf.as_mut_ptr()) } != 0 {
            return Err(CollectionError::last_os_error("uname"));
        }
        let uts = unsafe { buf.assume_init() };
        Ok(HostIdentity {
            system_name: field(&uts.sysname),
            node_name: field(&uts.nodename),
            release: field(&uts.release),
            version: field(&uts.version),
            machine: field(&uts.machine),
        })
    }

    fn program_memory() -> Result<ProgramMemory, CollectionError> {
        let mut usage = MaybeUninit::<libc::rusage>::zeroed();
        if unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) } != 0 {
            return Err(CollectionError::last_os_error("getrusage"));
        }
        let usage = unsafe { usage.assume_init() };
        // ru_maxrss is already in kilobytes on Linux
        Ok(ProgramMemory {
            max_rss_kb: u64::try_from(usage.ru_maxrss).unwrap_or(0),
        })
    }

    fn memory_totals() -> Result<MemoryTotals, CollectionError> {
        let mut info = MaybeUninit::<libc::sysinfo>::zeroed();
        if unsafe { libc::sysinfo(info.as_mut_ptr()) } != 0 {
            return Err(CollectionError::last_os_error("sysinfo"));
        }
        let info = unsafe { info.assume_init() };
        Ok(MemoryTotals {
            total_ram: info.totalram as u64,
            free_ram: info.freeram as u64,
            total_swap: info.totalswap as u64,
            free_swap: info.freeswap as u64,
            mem_unit: u64::from(info.mem_unit),
        })
    }
}
