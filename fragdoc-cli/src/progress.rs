//! Terminal progress for `fragdoc build`
//!
//! A spinner that advances every few lines while the document is written. The
//! bar hides itself when stderr is not a terminal.

use fragdoc_core::sink::ProgressObserver;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const TEMPLATE_WRITING: &str = "{spinner} Writing {msg} ({pos} lines)";

pub struct SpinnerProgress {
    bar: ProgressBar,
    name: String,
}

impl SpinnerProgress {
    pub fn new(name: impl Into<String>) -> Self {
        let style = ProgressStyle::default_spinner()
            .template(TEMPLATE_WRITING)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
        let bar = ProgressBar::new_spinner().with_style(style);
        SpinnerProgress {
            bar,
            name: name.into(),
        }
    }
}

impl ProgressObserver for SpinnerProgress {
    fn start(&mut self) {
        self.bar.set_message(self.name.clone());
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn tick(&mut self, line_index: usize) {
        self.bar.set_position(line_index as u64);
    }

    fn finish(&mut self, lines: usize) {
        self.bar.set_position(lines as u64);
        self.bar.finish_with_message(format!("{} done", self.name));
    }
}
