//! Run progress reporting, shared by import, check and export.

/// Trait for receiving progress updates from a run.
pub trait IngestProgress {
    /// Called before each file is processed. `current` starts at 1.
    fn on_file(&self, current: usize, total: usize, name: &str);

    /// Called when a phase starts (e.g., "Hashing 12 staged files").
    fn on_phase(&self, message: &str);

    /// Called when the run is complete.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl IngestProgress for SilentProgress {
    fn on_file(&self, _current: usize, _total: usize, _name: &str) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl IngestProgress for LogProgress {
    fn on_file(&self, current: usize, total: usize, name: &str) {
        log::debug!("  [{}/{}] {}", current, total, name);
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
