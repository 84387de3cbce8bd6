//! Progress bar for hashing-heavy runs.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romshelf_lib::IngestProgress;

/// Draws one bar per run; hidden in quiet mode.
pub(crate) struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            if let Ok(style) =
                ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {wide_msg}")
            {
                pb.set_style(style.progress_chars("=> "));
            }
            pb
        };
        crate::logging::set_active_bar(&pb);
        Self { pb }
    }
}

impl IngestProgress for BarProgress {
    fn on_file(&self, current: usize, total: usize, name: &str) {
        self.pb.set_length(total as u64);
        self.pb.set_position(current as u64);
        self.pb.set_message(name.to_string());
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        self.pb.finish_and_clear();
        crate::logging::clear_active_bar();
        log::info!(
            "{} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            message
        );
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
        crate::logging::clear_active_bar();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_is_registered_while_alive() {
        let progress = BarProgress::new(true);
        progress.on_file(1, 2, "1941.zip");
        assert!(crate::logging::active_bar().is_some());

        drop(progress);
        assert!(crate::logging::active_bar().is_none());
    }
}
