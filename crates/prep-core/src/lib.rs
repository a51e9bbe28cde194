pub mod config;
pub mod env_vars;
pub mod error;
mod fs;
pub mod json;
pub mod line_patch;
pub mod orchestrator;
pub mod project;
pub mod public_path;
pub mod scaffold;
pub mod steps;
pub mod templates;
pub mod version_guard;

pub use config::{CANONICAL_PUBLIC_PATH, PrepConfig};
pub use error::{PrepError, Result};
pub use orchestrator::{
    Confirmation, Event, Orchestrator, PrepReport, PresetAnswer, Reporter, State,
};
pub use project::ProjectRoot;
pub use public_path::PublicPathDecision;
pub use steps::{StepKind, StepReport, StepStatus};
