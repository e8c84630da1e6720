use std::path::PathBuf;

use clap::Parser;

use crate::config::{DisplayMode, GeneralConfig, RunConfig, SectionFilter};
use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(
    name = "sysglance",
    version,
    about = "Periodic snapshot of CPU, memory, sessions and host identity"
)]
pub struct Cli {
    /// Number of samples to take
    #[arg(long, value_name = "N")]
    pub samples: Option<u32>,

    /// Delay between samples, in seconds
    #[arg(long, value_name = "SECS")]
    pub tdelay: Option<u64>,

    /// Leave out the sessions/users section
    #[arg(long)]
    pub system: bool,

    /// Print only program memory and sessions/users, then exit
    #[arg(long)]
    pub user: bool,

    /// Reprint the full report on every iteration instead of updating in place
    #[arg(long)]
    pub sequential: bool,

    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sample count, then delay; each used only when its flag is absent
    #[arg(value_name = "SAMPLES_THEN_TDELAY", num_args = 0..=2)]
    pub positional: Vec<u32>,
}

impl Cli {
    /// Combines flags, trailing positionals and file defaults, in that order of precedence.
    pub fn resolve(&self, defaults: &GeneralConfig) -> Result<RunConfig, ConfigError> {
        let mut trailing = self.positional.iter().copied();

        let samples = match self.samples {
            Some(n) => n,
            None => trailing.next().unwrap_or(defaults.samples),
        };
        let tdelay = match self.tdelay {
            Some(secs) => secs,
            None => trailing.next().map(u64::from).unwrap_or(defaults.tdelay),
        };

        let mode = if self.sequential || defaults.sequential {
            DisplayMode::Sequential
        } else {
            DisplayMode::Rolling
        };
        let sections = SectionFilter {
            system_only: self.system,
            user_only: self.user,
        };

        RunConfig::new(samples, tdelay, mode, sections)
    }
}
