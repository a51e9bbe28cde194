use super::{Step, StepContext, StepKind, StepOutcome, StepStatus};
use crate::config::CANONICAL_PUBLIC_PATH;
use crate::error::{PrepError, Result};
use crate::fs;
use crate::templates;

/// Move the public folder to its canonical location, if that was requested.
pub struct RenamePublic;

/// Replace the front controller inside the (possibly renamed) public folder.
pub struct UpdateEntryFile;

impl Step for RenamePublic {
    fn kind(&self) -> StepKind {
        StepKind::RenamePublic
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        if !ctx.public.rename_pending() {
            return Ok(StepOutcome::new(StepStatus::Skipped));
        }

        let from = ctx.root.join(&ctx.public.relative_path);
        let to = ctx.root.join(CANONICAL_PUBLIC_PATH);
        if to.exists() {
            return Err(PrepError::io(
                &to,
                std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "the rename target already exists",
                ),
            ));
        }
        std::fs::rename(&from, &to).map_err(|e| PrepError::io(&from, e))?;
        log::debug!("Renamed {} to {}", from.display(), to.display());

        let mut outcome = StepOutcome::new(StepStatus::Done).with_message(format!(
            "Renamed {} to {CANONICAL_PUBLIC_PATH}",
            ctx.public.relative_path
        ));
        outcome.public = Some(ctx.public.renamed());
        Ok(outcome)
    }
}

impl Step for UpdateEntryFile {
    fn kind(&self) -> StepKind {
        StepKind::EntryFile
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        if ctx.public.rename_pending() {
            return Err(PrepError::RenameIncomplete(
                ctx.public.relative_path.clone(),
            ));
        }

        let path = ctx
            .root
            .join(&format!("{}/{}", ctx.public.relative_path, ctx.config.entry_file));
        let current = match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(PrepError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        if current.as_deref() == Some(templates::INDEX) {
            return Ok(StepOutcome::new(StepStatus::Unchanged));
        }
        fs::write_atomic(&path, templates::INDEX)?;
        Ok(StepOutcome::new(StepStatus::Done))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrepConfig;
    use crate::project::ProjectRoot;
    use crate::public_path::PublicPathDecision;
    use std::fs;

    fn web_project() -> anyhow::Result<tempfile::TempDir> {
        let temp = tempfile::tempdir()?;
        fs::create_dir(temp.path().join("web"))?;
        fs::write(temp.path().join("web/index.php"), "<?php // craft\n")?;
        fs::write(temp.path().join("web/robots.txt"), "User-agent: *\n")?;
        Ok(temp)
    }

    #[test]
    fn test_rename_then_rewrite_entry_file() -> anyhow::Result<()> {
        let temp = web_project()?;
        let root = ProjectRoot::new(temp.path())?;
        let config = PrepConfig::default();
        let requested = PublicPathDecision {
            relative_path: "web".into(),
            rename_requested: true,
        };
        let ctx = StepContext {
            root: &root,
            config: &config,
            public: &requested,
        };

        assert!(matches!(
            UpdateEntryFile.apply(&ctx),
            Err(PrepError::RenameIncomplete(_))
        ));

        let outcome = RenamePublic.apply(&ctx)?;
        assert_eq!(outcome.status, StepStatus::Done);
        let renamed = outcome.public.expect("renamed decision");
        assert_eq!(renamed.relative_path, "public");
        assert!(!temp.path().join("web").exists());
        assert!(temp.path().join("public/robots.txt").is_file());

        let ctx = StepContext {
            public: &renamed,
            ..ctx
        };
        assert_eq!(UpdateEntryFile.apply(&ctx)?.status, StepStatus::Done);
        assert_eq!(
            fs::read_to_string(temp.path().join("public/index.php"))?,
            templates::INDEX
        );
        assert_eq!(UpdateEntryFile.apply(&ctx)?.status, StepStatus::Unchanged);
        assert_eq!(RenamePublic.apply(&ctx)?.status, StepStatus::Skipped);
        Ok(())
    }

    #[test]
    fn test_kept_public_path_is_rewritten_in_place() -> anyhow::Result<()> {
        let temp = web_project()?;
        let root = ProjectRoot::new(temp.path())?;
        let config = PrepConfig::default();
        let public = PublicPathDecision::keep("web");
        let ctx = StepContext {
            root: &root,
            config: &config,
            public: &public,
        };

        assert_eq!(RenamePublic.apply(&ctx)?.status, StepStatus::Skipped);
        UpdateEntryFile.apply(&ctx)?;
        assert_eq!(
            fs::read_to_string(temp.path().join("web/index.php"))?,
            templates::INDEX
        );
        Ok(())
    }

    #[test]
    fn test_rename_refuses_to_clobber() -> anyhow::Result<()> {
        let temp = web_project()?;
        fs::create_dir(temp.path().join("public"))?;
        let root = ProjectRoot::new(temp.path())?;
        let config = PrepConfig::default();
        let public = PublicPathDecision {
            relative_path: "web".into(),
            rename_requested: true,
        };
        let ctx = StepContext {
            root: &root,
            config: &config,
            public: &public,
        };

        assert!(RenamePublic.apply(&ctx).is_err());
        assert!(temp.path().join("web/index.php").is_file());
        Ok(())
    }
}
