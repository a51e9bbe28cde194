use super::{Step, StepContext, StepKind, StepOutcome, StepStatus};
use crate::config::PrepConfig;
use crate::error::{PrepError, Result};

/// Delete a file the old application layout relied on.
pub struct RemoveLegacyFile {
    kind: StepKind,
    pick: fn(&PrepConfig) -> &'static str,
}

impl RemoveLegacyFile {
    pub fn executable() -> Self {
        Self {
            kind: StepKind::RemoveLegacyExecutable,
            pick: |config| config.legacy_executable,
        }
    }

    pub fn bootstrap() -> Self {
        Self {
            kind: StepKind::RemoveLegacyBootstrap,
            pick: |config| config.legacy_bootstrap,
        }
    }
}

impl Step for RemoveLegacyFile {
    fn kind(&self) -> StepKind {
        self.kind
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let rel = (self.pick)(ctx.config);
        let path = ctx.root.join(rel);
        if !path.is_file() {
            return Ok(StepOutcome::new(StepStatus::Skipped));
        }
        std::fs::remove_file(&path).map_err(|e| PrepError::io(&path, e))?;
        Ok(StepOutcome::new(StepStatus::Done).with_message(format!("Removed {rel}")))
    }
}
