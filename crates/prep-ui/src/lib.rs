//! # prep-ui
//!
//! Terminal output for craft-prep: styled text, status icons and per-step
//! spinners.
//!
//! ## Example
//!
//! ```rust,no_run
//! use prep_ui::{Spinner, Style, StyledText};
//!
//! let spinner = Spinner::builder("Updating composer.json").start();
//! // ... do work ...
//! spinner.success("done");
//! println!("{}", "public".with_style(Style::Cyan));
//! ```

mod spinner;
mod style;

pub use spinner::{Spinner, SpinnerBuilder};
pub use style::{Style, StyledText, icons};

pub use colored::Colorize;

pub mod prelude {
    pub use crate::{
        Colorize,
        spinner::{Spinner, SpinnerBuilder},
        style::{Style, StyledText},
    };
}
