use std::time::Duration;

use colored::ColoredString;
use indicatif::{ProgressBar, ProgressStyle};

use crate::style::{Style, StyledText, icons};

const TICK: Duration = Duration::from_millis(80);

pub struct SpinnerBuilder {
    message: String,
}

impl SpinnerBuilder {
    pub fn start(self) -> Spinner {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(self.message.clone());
        bar.enable_steady_tick(TICK);
        Spinner {
            bar,
            message: self.message,
        }
    }
}

/// A single line of progress. Finishing it replaces the spinner with a
/// status icon followed by the original message and a short outcome.
pub struct Spinner {
    bar: ProgressBar,
    message: String,
}

impl Spinner {
    pub fn builder(message: impl Into<String>) -> SpinnerBuilder {
        SpinnerBuilder {
            message: message.into(),
        }
    }

    /// Clear the spinner without printing anything.
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    pub fn success(self, outcome: impl AsRef<str>) {
        self.finish_with(icons::success(), outcome.as_ref().with_style(Style::Green));
    }

    pub fn warning(self, outcome: impl AsRef<str>) {
        self.finish_with(icons::warning(), outcome.as_ref().with_style(Style::Yellow));
    }

    pub fn error(self, outcome: impl AsRef<str>) {
        self.finish_with(icons::error(), outcome.as_ref().with_style(Style::Red));
    }

    pub fn info(self, outcome: impl AsRef<str>) {
        self.finish_with(icons::info(), outcome.as_ref().with_style(Style::Blue));
    }

    pub fn skipped(self, outcome: impl AsRef<str>) {
        self.finish_with(icons::skipped(), outcome.as_ref().with_style(Style::Dim));
    }

    fn finish_with(self, icon: ColoredString, outcome: ColoredString) {
        self.bar.finish_and_clear();
        eprintln!("{icon} {} … {outcome}", self.message);
    }
}
