use anyhow::{Context, Result};
use clap::Args;
use inquire::Confirm;
use prep_core::{
    Confirmation, Event, Orchestrator, PrepConfig, PrepReport, ProjectRoot, Reporter, State,
    StepReport, StepStatus,
};
use prep_ui::prelude::*;
use std::path::PathBuf;

/// Arguments for the `prep` command
#[derive(Args, Debug, Default, Clone)]
pub struct PrepArgs {
    /// Project directory to migrate. Defaults to the current directory.
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::DirPath)]
    pub path: Option<PathBuf>,

    /// Rename the public folder to `public` without asking
    #[arg(long, short = 'y', conflicts_with = "no_rename")]
    pub yes: bool,

    /// Keep the public folder where it is without asking
    #[arg(long)]
    pub no_rename: bool,
}

/// The run completed but at least one step did not.
#[derive(Debug, thiserror::Error)]
#[error("{0} step(s) failed. Fix the problems above and run craft-prep again.")]
pub struct StepsFailed(pub usize);

/// Ask on the terminal, or answer straight away when a flag decided it.
struct RenamePrompt {
    preset: Option<bool>,
}

impl Confirmation for RenamePrompt {
    fn confirm_rename(&self, from: &str, to: &str) -> bool {
        if let Some(answer) = self.preset {
            return answer;
        }
        Confirm::new(&format!("Rename the `{from}` folder to `{to}`?"))
            .with_help_message("Craft 6 serves the site from `public` by default")
            .with_default(true)
            .prompt()
            .unwrap_or(false)
    }
}

/// Renders engine events as one spinner line per step.
#[derive(Default)]
struct TerminalReporter {
    spinner: Option<Spinner>,
}

impl Reporter for TerminalReporter {
    fn event(&mut self, event: &Event) {
        match event {
            Event::StateChanged(State::Validating) => {
                eprintln!("{}", "Checking the project".with_style(Style::Blue).bold());
            }
            Event::StateChanged(State::Transforming) => {
                eprintln!("\n{}", "Migrating".with_style(Style::Blue).bold());
            }
            Event::StateChanged(State::Failed) => {
                if let Some(spinner) = self.spinner.take() {
                    spinner.finish();
                }
            }
            Event::StateChanged(_) => {}
            Event::PublicPathLocated(path) => {
                eprintln!(
                    "{} Public folder: {}",
                    prep_ui::icons::success(),
                    path.with_style(Style::Cyan)
                );
            }
            Event::StepStarted(kind) => {
                self.spinner = Some(Spinner::builder(kind.to_string()).start());
            }
            Event::Step(report) => {
                let spinner = self
                    .spinner
                    .take()
                    .unwrap_or_else(|| Spinner::builder(report.step.to_string()).start());
                finish_step(spinner, report);
            }
        }
    }
}

fn finish_step(spinner: Spinner, report: &StepReport) {
    match report.status {
        StepStatus::Done => spinner.success("done"),
        StepStatus::Unchanged => spinner.success("already up to date"),
        StepStatus::Skipped => spinner.skipped("skipped"),
        StepStatus::Info => spinner.info("not applicable"),
        StepStatus::Warning => spinner.warning("done with warnings"),
        StepStatus::Failed => spinner.error("failed"),
    }
    for message in &report.messages {
        let message = match report.status {
            StepStatus::Failed => message.with_style(Style::Red),
            StepStatus::Warning => message.with_style(Style::Yellow),
            _ => message.with_style(Style::Dim),
        };
        eprintln!("    {message}");
    }
}

fn print_summary(report: &PrepReport) {
    println!();
    println!("{}", "Next steps".with_style(Style::Blue).bold());
    for command in &report.next_steps {
        println!("  {} {}", prep_ui::icons::arrow(), command.with_style(Style::Cyan));
    }
    if !report.obsolete_settings.is_empty() {
        println!();
        println!(
            "Remove these settings from {}:",
            "config/general.php".with_style(Style::Cyan)
        );
        for setting in &report.obsolete_settings {
            println!("  - {setting}");
        }
    }
}

/// Execute the `prep` command
pub fn execute(args: PrepArgs) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };
    let root = ProjectRoot::new(&path)?;
    log::debug!("Migrating {root}");

    let preset = if args.yes {
        Some(true)
    } else if args.no_rename {
        Some(false)
    } else {
        None
    };
    let orchestrator = Orchestrator::new(root, PrepConfig::default());
    let mut reporter = TerminalReporter::default();
    let report = orchestrator.run(&RenamePrompt { preset }, &mut reporter)?;

    print_summary(&report);

    let failed = report
        .steps
        .iter()
        .filter(|step| step.status == StepStatus::Failed)
        .count();
    if failed > 0 {
        return Err(StepsFailed(failed).into());
    }
    eprintln!("\n{} Migration complete", prep_ui::icons::success());
    eprintln!("  Review changes with: git diff");
    Ok(())
}
