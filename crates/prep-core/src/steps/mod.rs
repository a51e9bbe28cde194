use std::fmt;

use crate::config::PrepConfig;
use crate::error::Result;
use crate::project::ProjectRoot;
use crate::public_path::PublicPathDecision;

pub mod composer;
pub mod ddev;
pub mod env;
pub mod legacy;
pub mod public;
pub mod scaffold;

/// Everything a step may read. Steps never mutate the context; a step that
/// moves the public path hands the new decision back in its outcome.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub root: &'a ProjectRoot,
    pub config: &'a PrepConfig,
    pub public: &'a PublicPathDecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Manifest,
    Descriptor,
    EnvVars,
    Executable,
    Bootstrap,
    FrameworkFolders,
    RenamePublic,
    EntryFile,
    RemoveLegacyExecutable,
    RemoveLegacyBootstrap,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepKind::Manifest => "Updating composer.json",
            StepKind::Descriptor => "Updating .ddev/config.yaml",
            StepKind::EnvVars => "Updating environment variables",
            StepKind::Executable => "Creating the artisan executable",
            StepKind::Bootstrap => "Creating bootstrap/app.php",
            StepKind::FrameworkFolders => "Creating storage/framework",
            StepKind::RenamePublic => "Renaming the public folder",
            StepKind::EntryFile => "Updating the public index.php",
            StepKind::RemoveLegacyExecutable => "Removing the craft executable",
            StepKind::RemoveLegacyBootstrap => "Removing bootstrap.php",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Files were changed.
    Done,
    /// Everything was already in the target state.
    Unchanged,
    /// Not applicable to this project.
    Skipped,
    /// An optional input is absent.
    Info,
    /// Completed, but part of the step could not be applied.
    Warning,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub status: StepStatus,
    pub messages: Vec<String>,
    /// Replacement public path decision for every later step.
    pub public: Option<PublicPathDecision>,
}

impl StepOutcome {
    pub fn new(status: StepStatus) -> Self {
        Self {
            status,
            messages: Vec::new(),
            public: None,
        }
    }

    pub fn changed(changed: bool) -> Self {
        Self::new(if changed {
            StepStatus::Done
        } else {
            StepStatus::Unchanged
        })
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: StepKind,
    pub status: StepStatus,
    pub messages: Vec<String>,
}

pub trait Step {
    fn kind(&self) -> StepKind;
    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome>;
}

/// The transformation sequence, in execution order. The public path rename
/// precedes the entry file rewrite, which writes into the renamed folder.
pub fn pipeline() -> Vec<Box<dyn Step>> {
    vec![
        Box::new(composer::UpdateManifest),
        Box::new(ddev::UpdateDescriptor),
        Box::new(env::MigrateEnvVars),
        Box::new(scaffold::AddExecutable),
        Box::new(scaffold::AddBootstrap),
        Box::new(scaffold::AddFrameworkFolders),
        Box::new(public::RenamePublic),
        Box::new(public::UpdateEntryFile),
        Box::new(legacy::RemoveLegacyFile::executable()),
        Box::new(legacy::RemoveLegacyFile::bootstrap()),
    ]
}
