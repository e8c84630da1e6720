use std::io::Write;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{DisplayMode, RunConfig};
use crate::error::{RunError, SampleError};
use crate::system::collector::MetricSource;
use crate::system::cpu::{CpuSampleEngine, CpuUpdate};
use crate::ui::Renderer;

/// The only suspension point of a run.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Blocks the calling thread for the full delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// `--user` stopped the run after the first sessions section.
    UserOnly,
}

/// Drives `samples` iterations `tdelay` apart and decides what gets printed when.
pub struct Scheduler<S, Z, W: Write> {
    config: RunConfig,
    source: S,
    sleeper: Z,
    renderer: Renderer<W>,
    engine: CpuSampleEngine,
}

impl<S: MetricSource, Z: Sleeper, W: Write> Scheduler<S, Z, W> {
    pub fn new(config: RunConfig, source: S, sleeper: Z, renderer: Renderer<W>) -> Self {
        Scheduler {
            config,
            source,
            sleeper,
            renderer,
            engine: CpuSampleEngine::new(),
        }
    }

    pub fn run(&mut self) -> Result<RunOutcome, RunError> {
        debug!(
            samples = self.config.samples(),
            tdelay_secs = self.config.tdelay_secs(),
            mode = ?self.config.mode(),
            "starting run"
        );
        let outcome = match self.config.mode() {
            DisplayMode::Rolling => self.run_rolling(),
            DisplayMode::Sequential => self.run_sequential(),
        }?;
        self.renderer.flush()?;
        Ok(outcome)
    }

    /// Memory and CPU are sampled in two separate phases, each `samples` long.
    fn run_rolling(&mut self) -> Result<RunOutcome, RunError> {
        let samples = self.config.samples();

        if self.render_preamble()? == RunOutcome::UserOnly {
            return Ok(RunOutcome::UserOnly);
        }

        let host = self.source.host_identity()?;
        self.renderer.host_identity(&host)?;

        self.renderer.memory_heading()?;
        for index in 0..samples {
            let _span = tracing::debug_span!("scheduler.memory", index).entered();
            let usage = self.source.memory_usage()?;
            self.renderer.memory_line(&usage)?;
            self.renderer.flush()?;
            self.pause();
        }
        self.renderer.separator()?;

        let cores = self.source.core_count()?;
        self.renderer.core_count(cores)?;

        self.prime_cpu()?;
        for index in 0..samples {
            let _span = tracing::debug_span!("scheduler.cpu", index).entered();
            let reading = self.cpu_step()?;
            self.renderer.cpu_usage(reading)?;
            if index + 1 < samples {
                self.renderer.overwrite_previous_line()?;
            }
            self.renderer.flush()?;
        }
        self.renderer.separator()?;

        Ok(RunOutcome::Completed)
    }

    /// Reprints the whole block once per iteration, one CPU reading each.
    fn run_sequential(&mut self) -> Result<RunOutcome, RunError> {
        let samples = self.config.samples();

        if !self.config.sections().user_only {
            self.prime_cpu()?;
        }

        for index in 0..samples {
            let _span = tracing::debug_span!("scheduler.iteration", index).entered();
            self.renderer.iteration_banner(index)?;
            if self.render_preamble()? == RunOutcome::UserOnly {
                return Ok(RunOutcome::UserOnly);
            }

            let host = self.source.host_identity()?;
            self.renderer.host_identity(&host)?;

            self.renderer.memory_heading()?;
            let usage = self.source.memory_usage()?;
            self.renderer.memory_column(index, samples, &usage)?;
            self.renderer.separator()?;

            let cores = self.source.core_count()?;
            self.renderer.core_count(cores)?;
            self.renderer.flush()?;

            let reading = self.cpu_step()?;
            self.renderer.cpu_usage(reading)?;
            self.renderer.separator()?;
            self.renderer.flush()?;
        }

        Ok(RunOutcome::Completed)
    }

    /// Header, program memory and (unless `--system`) sessions.
    /// Returns `UserOnly` when nothing else should follow.
    fn render_preamble(&mut self) -> Result<RunOutcome, RunError> {
        self.renderer
            .header(self.config.samples(), self.config.tdelay_secs())?;
        let mem = self.source.program_memory()?;
        self.renderer.program_memory(&mem)?;
        self.renderer.separator()?;

        if !self.config.sections().system_only {
            let sessions = self.source.sessions().unwrap_or_else(|e| {
                warn!(error = %e, "login records unavailable");
                Vec::new()
            });
            self.renderer.sessions(&sessions)?;
        }

        if self.config.sections().user_only {
            self.renderer.flush()?;
            return Ok(RunOutcome::UserOnly);
        }
        Ok(RunOutcome::Completed)
    }

    fn pause(&mut self) {
        self.sleeper.sleep(self.config.tdelay());
    }

    fn sample_cpu(&mut self) -> Result<CpuUpdate, RunError> {
        let snapshot = self.source.cpu_counters()?;
        Ok(self.engine.update(&snapshot))
    }

    /// Warm-up read (a baseline, never shown), one delay, then the reference read
    /// the first displayed percentage is measured against.
    fn prime_cpu(&mut self) -> Result<(), RunError> {
        let warmup = self.sample_cpu()?;
        debug_assert!(warmup.is_baseline());
        self.pause();
        self.sample_cpu()?;
        Ok(())
    }

    fn cpu_step(&mut self) -> Result<Result<f64, SampleError>, RunError> {
        self.pause();
        let update = self.sample_cpu()?;
        // an unprimed engine has no previous reading, which counts as zero
        let reading = update
            .utilization()
            .unwrap_or(Err(SampleError::DivisionByZero));
        if let Err(e) = reading {
            warn!(error = %e, used = update.used, "cpu sample skipped");
        }
        Ok(reading)
    }
}
