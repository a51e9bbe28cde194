use super::{Step, StepContext, StepKind, StepOutcome, StepStatus};
use crate::env_vars::{self, EnvFileOutcome};
use crate::error::Result;

/// Rename the legacy database variables in every env file that exists.
pub struct MigrateEnvVars;

impl Step for MigrateEnvVars {
    fn kind(&self) -> StepKind {
        StepKind::EnvVars
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let reports = env_vars::migrate(ctx.root, ctx.config.env_files, ctx.config.env_key_map);

        let mut messages = Vec::new();
        let mut found = false;
        let mut migrated = false;
        let mut failed = false;
        for report in reports {
            match report.outcome {
                EnvFileOutcome::Missing => {}
                EnvFileOutcome::Untouched => found = true,
                EnvFileOutcome::Migrated {
                    renamed, discarded, ..
                } => {
                    found = true;
                    migrated = true;
                    messages.push(format!("{}: {}", report.file, renamed.join(", ")));
                    for (old, existing) in discarded {
                        messages.push(format!(
                            "{}: dropped {old}, {existing} is already set",
                            report.file
                        ));
                    }
                }
                EnvFileOutcome::Failed(err) => {
                    found = true;
                    failed = true;
                    log::warn!("Failed to migrate {}: {err}", report.file);
                    messages.push(format!("{}: {err}", report.file));
                }
            }
        }

        let status = if failed {
            StepStatus::Failed
        } else if migrated {
            StepStatus::Done
        } else if found {
            StepStatus::Unchanged
        } else {
            messages.push("No .env files detected.".to_string());
            StepStatus::Info
        };

        Ok(StepOutcome {
            status,
            messages,
            public: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrepConfig;
    use crate::project::ProjectRoot;
    use crate::public_path::PublicPathDecision;
    use std::fs;

    fn run(root: &std::path::Path) -> anyhow::Result<StepOutcome> {
        let root = ProjectRoot::new(root)?;
        let config = PrepConfig::default();
        let public = PublicPathDecision::keep("web");
        let ctx = StepContext {
            root: &root,
            config: &config,
            public: &public,
        };
        Ok(MigrateEnvVars.apply(&ctx)?)
    }

    #[test]
    fn test_no_env_files_is_informational() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let outcome = run(temp.path())?;
        assert_eq!(outcome.status, StepStatus::Info);
        Ok(())
    }

    #[test]
    fn test_each_file_is_migrated() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        fs::create_dir(temp.path().join(".ddev"))?;
        fs::write(temp.path().join(".ddev/.env"), "CRAFT_DB_SERVER=db\n")?;
        fs::write(temp.path().join(".env"), "APP_ENV=dev\nCRAFT_DB_USER=root\n")?;

        let outcome = run(temp.path())?;
        assert_eq!(outcome.status, StepStatus::Done);
        assert_eq!(
            outcome.messages,
            vec![".ddev/.env: CRAFT_DB_SERVER", ".env: CRAFT_DB_USER"]
        );
        assert_eq!(fs::read_to_string(temp.path().join(".ddev/.env"))?, "DB_HOST=db\n");
        assert_eq!(
            fs::read_to_string(temp.path().join(".env"))?,
            "APP_ENV=dev\nDB_USERNAME=root\n"
        );

        let rerun = run(temp.path())?;
        assert_eq!(rerun.status, StepStatus::Unchanged);
        Ok(())
    }

    #[test]
    fn test_discarded_values_are_reported() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(
            temp.path().join(".env"),
            "DB_HOST=localhost\nCRAFT_DB_SERVER=db\nCRAFT_DB_PORT=3306\n",
        )?;

        let outcome = run(temp.path())?;
        assert_eq!(outcome.status, StepStatus::Done);
        assert_eq!(
            outcome.messages,
            vec![
                ".env: CRAFT_DB_SERVER, CRAFT_DB_PORT",
                ".env: dropped CRAFT_DB_SERVER, DB_HOST is already set",
            ]
        );
        assert_eq!(
            fs::read_to_string(temp.path().join(".env"))?,
            "DB_HOST=localhost\nDB_PORT=3306\n"
        );
        Ok(())
    }
}
