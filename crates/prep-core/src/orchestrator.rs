//! Sequences one migration run against a project tree.
//!
//! `Validating` and `LocatingPublicPath` never touch the filesystem; an error
//! in either ends the run before anything is written. Once `Transforming`
//! starts, a failing step is recorded and the remaining steps still run.

use std::fmt;

use crate::config::{CANONICAL_PUBLIC_PATH, PrepConfig};
use crate::error::{PrepError, Result};
use crate::json::{self, DEFAULT_INDENT};
use crate::project::ProjectRoot;
use crate::public_path::{self, PublicPathDecision};
use crate::steps::{self, StepContext, StepKind, StepOutcome, StepReport, StepStatus};
use crate::version_guard::{self, DependencyManifest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Validating,
    LocatingPublicPath,
    AwaitingConfirmation,
    Transforming,
    Reporting,
    Done,
    Failed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            State::Validating => "Validating the project",
            State::LocatingPublicPath => "Locating the public folder",
            State::AwaitingConfirmation => "Waiting for confirmation",
            State::Transforming => "Migrating",
            State::Reporting => "Reporting",
            State::Done => "Done",
            State::Failed => "Failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StateChanged(State),
    PublicPathLocated(String),
    StepStarted(StepKind),
    Step(StepReport),
}

/// Receives progress while a run is in flight.
pub trait Reporter {
    fn event(&mut self, event: &Event);
}

impl Reporter for Vec<Event> {
    fn event(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

impl Reporter for () {
    fn event(&mut self, _event: &Event) {}
}

/// The single yes/no decision of a run: move the public folder to its
/// canonical location or leave it where it is.
pub trait Confirmation {
    fn confirm_rename(&self, from: &str, to: &str) -> bool;
}

/// Answers every confirmation the same way without asking.
#[derive(Debug, Clone, Copy)]
pub struct PresetAnswer(pub bool);

impl Confirmation for PresetAnswer {
    fn confirm_rename(&self, from: &str, to: &str) -> bool {
        log::debug!("Preset answer for renaming {from} to {to}: {}", self.0);
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepReport {
    pub public: PublicPathDecision,
    pub steps: Vec<StepReport>,
    /// Whether the project has a development environment descriptor.
    pub uses_ddev: bool,
    /// Commands the operator has to run once the migration is done.
    pub next_steps: Vec<String>,
    /// Settings to remove from the general config by hand.
    pub obsolete_settings: Vec<String>,
}

impl PrepReport {
    pub fn has_failures(&self) -> bool {
        self.steps
            .iter()
            .any(|step| step.status == StepStatus::Failed)
    }
}

pub struct Orchestrator {
    root: ProjectRoot,
    config: PrepConfig,
}

impl Orchestrator {
    pub fn new(root: ProjectRoot, config: PrepConfig) -> Self {
        Self { root, config }
    }

    pub fn root(&self) -> &ProjectRoot {
        &self.root
    }

    pub fn run(
        &self,
        confirmation: &dyn Confirmation,
        reporter: &mut dyn Reporter,
    ) -> Result<PrepReport> {
        match self.run_inner(confirmation, reporter) {
            Ok(report) => Ok(report),
            Err(e) => {
                reporter.event(&Event::StateChanged(State::Failed));
                Err(e)
            }
        }
    }

    fn run_inner(
        &self,
        confirmation: &dyn Confirmation,
        reporter: &mut dyn Reporter,
    ) -> Result<PrepReport> {
        reporter.event(&Event::StateChanged(State::Validating));
        self.validate()?;

        reporter.event(&Event::StateChanged(State::LocatingPublicPath));
        let located = public_path::locate(&self.root, &self.config)?;
        reporter.event(&Event::PublicPathLocated(located.clone()));

        let mut public = PublicPathDecision::keep(located);
        if !public.is_canonical() && !self.root.exists(CANONICAL_PUBLIC_PATH) {
            reporter.event(&Event::StateChanged(State::AwaitingConfirmation));
            public.rename_requested =
                confirmation.confirm_rename(&public.relative_path, CANONICAL_PUBLIC_PATH);
        }

        reporter.event(&Event::StateChanged(State::Transforming));
        let mut reports = Vec::new();
        for step in steps::pipeline() {
            let ctx = StepContext {
                root: &self.root,
                config: &self.config,
                public: &public,
            };
            reporter.event(&Event::StepStarted(step.kind()));
            let outcome = step.apply(&ctx).unwrap_or_else(|e| {
                log::debug!("{} failed: {e:?}", step.kind());
                StepOutcome::new(StepStatus::Failed).with_message(e.to_string())
            });
            let report = StepReport {
                step: step.kind(),
                status: outcome.status,
                messages: outcome.messages,
            };
            reporter.event(&Event::Step(report.clone()));
            reports.push(report);
            if let Some(next) = outcome.public {
                public = next;
            }
        }

        reporter.event(&Event::StateChanged(State::Reporting));
        let uses_ddev = self.root.join(self.config.descriptor_file).is_file();
        let report = PrepReport {
            public,
            steps: reports,
            uses_ddev,
            next_steps: next_steps(uses_ddev),
            obsolete_settings: self
                .config
                .obsolete_settings
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };
        reporter.event(&Event::StateChanged(State::Done));
        Ok(report)
    }

    /// Every precondition, checked without writing anything.
    fn validate(&self) -> Result<()> {
        let manifest_path = self.root.join(self.config.manifest_file);
        if !manifest_path.is_file() {
            return Err(PrepError::MissingManifest(self.root.to_slash()));
        }
        let lock_path = self.root.join(self.config.lock_file);
        if !lock_path.is_file() {
            return Err(PrepError::MissingLockFile(self.root.to_slash()));
        }

        json::load(&manifest_path, DEFAULT_INDENT)?;
        let lock = DependencyManifest::from_file(&lock_path)?;
        let version = version_guard::extract_version(&lock, self.config.package).ok_or_else(
            || PrepError::PackageNotInstalled {
                root: self.root.to_slash(),
                package: self.config.package.to_string(),
            },
        )?;
        version_guard::validate(self.config.package, version, self.config.min_version)?;
        log::debug!("{} {version} satisfies ^{}", self.config.package, self.config.min_version);
        Ok(())
    }
}

fn next_steps(uses_ddev: bool) -> Vec<String> {
    let prefix = if uses_ddev { "ddev " } else { "" };
    let mut steps = Vec::new();
    if uses_ddev {
        steps.push("ddev restart".to_string());
    }
    steps.push(format!("{prefix}composer update"));
    steps.push(format!("{prefix}php artisan vendor:publish --tag=craftcms"));
    steps
}
