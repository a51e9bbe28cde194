use colored::{ColoredString, Colorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
    Dim,
}

/// Apply a [`Style`] to anything string-like.
pub trait StyledText {
    fn with_style(&self, style: Style) -> ColoredString;
}

impl<T: AsRef<str> + ?Sized> StyledText for T {
    fn with_style(&self, style: Style) -> ColoredString {
        let text = self.as_ref();
        match style {
            Style::Red => text.red(),
            Style::Green => text.green(),
            Style::Yellow => text.yellow(),
            Style::Blue => text.blue(),
            Style::Cyan => text.cyan(),
            Style::Dim => text.dimmed(),
        }
    }
}

pub mod icons {
    use colored::{ColoredString, Colorize};

    pub fn success() -> ColoredString {
        "✓".green()
    }

    pub fn error() -> ColoredString {
        "✗".red()
    }

    pub fn warning() -> ColoredString {
        "!".yellow()
    }

    pub fn info() -> ColoredString {
        "i".blue()
    }

    pub fn skipped() -> ColoredString {
        "-".dimmed()
    }

    pub fn arrow() -> ColoredString {
        "➜".cyan()
    }
}
