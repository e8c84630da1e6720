pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod scheduler;
pub mod system;
pub mod ui;
