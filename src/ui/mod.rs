pub mod terminal;

#[cfg(test)]
mod tests;

use std::io::{self, Write};

use crate::error::SampleError;
use crate::format::{format_memory_usage, format_percent};
use crate::system::sessions::UserSession;
use crate::system::snapshot::{HostIdentity, MemoryUsage, ProgramMemory};
use terminal::TerminalControl;

pub const SEPARATOR: &str = "---------------------------------------";

/// Column at which a session's `line (host)` starts, whatever the username length.
pub const SESSION_DETAIL_COLUMN: u16 = 15;

/// Rows of the sequential-mode memory table: only `index` carries data.
pub fn memory_column_rows(index: u32, samples: u32, usage: &MemoryUsage) -> Vec<String> {
    (0..samples)
        .map(|row| {
            if row == index {
                format_memory_usage(usage)
            } else {
                String::new()
            }
        })
        .collect()
}

/// Writes report sections to any `Write` sink. Holds no layout state.
pub struct Renderer<W: Write> {
    out: W,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Renderer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn separator(&mut self) -> io::Result<()> {
        writeln!(self.out, "{SEPARATOR}")
    }

    pub fn iteration_banner(&mut self, index: u32) -> io::Result<()> {
        writeln!(self.out, ">>>>>> iteration {index} <<<<<<")
    }

    pub fn header(&mut self, samples: u32, tdelay_secs: u64) -> io::Result<()> {
        writeln!(self.out, "Nbr of samples: {samples} -- every {tdelay_secs} secs")
    }

    pub fn program_memory(&mut self, mem: &ProgramMemory) -> io::Result<()> {
        writeln!(self.out, " Memory usage: {} kilobytes", mem.max_rss_kb)
    }

    pub fn sessions(&mut self, sessions: &[UserSession]) -> io::Result<()> {
        writeln!(self.out, "### Sessions/users ###")?;
        for session in sessions {
            self.out.save_cursor()?;
            write!(self.out, "{}", session.user)?;
            self.out.restore_cursor()?;
            self.out.move_right(SESSION_DETAIL_COLUMN)?;
            writeln!(self.out, "{} ({})", session.line, session.host)?;
        }
        self.separator()
    }

    pub fn host_identity(&mut self, host: &HostIdentity) -> io::Result<()> {
        writeln!(self.out, "### System Information ###")?;
        writeln!(self.out, " System Name = {}", host.system_name)?;
        writeln!(self.out, " Machine Name = {}", host.node_name)?;
        writeln!(self.out, " Version = {}", host.release)?;
        writeln!(self.out, " Release = {}", host.version)?;
        writeln!(self.out, " Architecture = {}", host.machine)?;
        self.separator()
    }

    pub fn memory_heading(&mut self) -> io::Result<()> {
        writeln!(self.out, "### Memory ### (Phys.Used/Tot -- Virtual Used/Tot)")
    }

    pub fn memory_line(&mut self, usage: &MemoryUsage) -> io::Result<()> {
        writeln!(self.out, "{}", format_memory_usage(usage))
    }

    pub fn memory_column(&mut self, index: u32, samples: u32, usage: &MemoryUsage) -> io::Result<()> {
        for row in memory_column_rows(index, samples, usage) {
            writeln!(self.out, "{row}")?;
        }
        Ok(())
    }

    pub fn core_count(&mut self, cores: usize) -> io::Result<()> {
        writeln!(self.out, "Number of cores: {cores}")
    }

    pub fn cpu_usage(&mut self, reading: Result<f64, SampleError>) -> io::Result<()> {
        writeln!(self.out, "Total CPU usage: {}", format_percent(reading))
    }

    /// Moves back onto the line just printed and blanks it, so the next line replaces it.
    pub fn overwrite_previous_line(&mut self) -> io::Result<()> {
        self.out.move_cursor_up(1)?;
        self.out.clear_line()
    }
}
