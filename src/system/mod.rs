pub mod collector;
pub mod cpu;
pub mod platform;
pub mod sessions;
pub mod snapshot;
