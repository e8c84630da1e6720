use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;
use crate::system::collector::CPUINFO;
use crate::system::cpu::PROC_STAT;
use crate::system::sessions::UTMP_PATH;

pub const DEFAULT_SAMPLES: u32 = 10;
pub const DEFAULT_TDELAY_SECS: u64 = 1;

/// Defaults read from `config.toml`; command-line values override them.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub general: GeneralConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub samples: u32,
    pub tdelay: u64,
    pub sequential: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            samples: DEFAULT_SAMPLES,
            tdelay: DEFAULT_TDELAY_SECS,
            sequential: false,
        }
    }
}

/// Locations of the text and record sources read by the collector.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub proc_stat: PathBuf,
    pub cpuinfo: PathBuf,
    pub utmp: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            proc_stat: PathBuf::from(PROC_STAT),
            cpuinfo: PathBuf::from(CPUINFO),
            utmp: PathBuf::from(UTMP_PATH),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sysglance").join("config.toml"))
}

pub fn load_config() -> FileConfig {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => FileConfig::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> FileConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            if path.exists() {
                warn!(path = %path.display(), error = %e, "config file unreadable, using defaults");
            }
            return FileConfig::default();
        }
    };
    toml::from_str(&contents).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
        FileConfig::default()
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    Rolling,
    Sequential,
}

/// Which optional sections a run prints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionFilter {
    /// `--system`: leave out the sessions section.
    pub system_only: bool,
    /// `--user`: stop after the sessions section of the first block.
    pub user_only: bool,
}

/// A validated run. Only [`RunConfig::new`] builds one, so a value of this
/// type never has zero samples, a zero delay, or both section filters set.
///
/// ```compile_fail
/// use std::time::Duration;
/// use sysglance::config::{DisplayMode, RunConfig, SectionFilter};
///
/// let _ = RunConfig {
///     samples: 3,
///     tdelay: Duration::ZERO,
///     mode: DisplayMode::Sequential,
///     sections: SectionFilter { system_only: true, user_only: true },
/// };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunConfig {
    samples: u32,
    tdelay: Duration,
    mode: DisplayMode,
    sections: SectionFilter,
}

impl RunConfig {
    pub fn new(
        samples: u32,
        tdelay_secs: u64,
        mode: DisplayMode,
        sections: SectionFilter,
    ) -> Result<Self, ConfigError> {
        if sections.system_only && sections.user_only {
            return Err(ConfigError::ConflictingModes);
        }
        if samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if tdelay_secs == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        Ok(RunConfig {
            samples,
            tdelay: Duration::from_secs(tdelay_secs),
            mode,
            sections,
        })
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn tdelay(&self) -> Duration {
        self.tdelay
    }

    pub fn tdelay_secs(&self) -> u64 {
        self.tdelay.as_secs()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn sections(&self) -> SectionFilter {
        self.sections
    }
}
