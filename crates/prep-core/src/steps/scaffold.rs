use super::{Step, StepContext, StepKind, StepOutcome, StepStatus};
use crate::error::Result;
use crate::scaffold::{self, ScaffoldEntry, ScaffoldPlan};
use crate::templates;

const FRAMEWORK_DIR: &str = "storage/framework";
const FRAMEWORK_CACHES: &[&str] = &["cache", "sessions", "views"];

/// The `artisan` console entry point.
pub struct AddExecutable;

/// `bootstrap/app.php` and the `bootstrap/cache` directory it expects.
pub struct AddBootstrap;

/// The `storage/framework` cache directories, each with its own `.gitignore`.
pub struct AddFrameworkFolders;

impl AddExecutable {
    pub fn plan(ctx: &StepContext<'_>) -> ScaffoldPlan {
        vec![ScaffoldEntry::executable(
            ctx.config.executable,
            templates::ARTISAN,
        )]
    }
}

impl AddBootstrap {
    pub fn plan(ctx: &StepContext<'_>) -> ScaffoldPlan {
        let app = ctx.config.bootstrap_file;
        let dir = app.rsplit_once('/').map_or("", |(dir, _)| dir);
        let mut plan = Vec::new();
        if !dir.is_empty() {
            plan.push(ScaffoldEntry::dir(dir));
            plan.push(ScaffoldEntry::dir(format!("{dir}/cache")));
        }
        plan.push(ScaffoldEntry::file(app, templates::bootstrap_app(ctx.public)));
        plan
    }
}

impl AddFrameworkFolders {
    pub fn plan() -> ScaffoldPlan {
        let mut plan = vec![
            ScaffoldEntry::dir("storage"),
            ScaffoldEntry::dir(FRAMEWORK_DIR),
        ];
        for cache in FRAMEWORK_CACHES {
            let dir = format!("{FRAMEWORK_DIR}/{cache}");
            let gitignore = format!("{dir}/.gitignore");
            plan.push(ScaffoldEntry::dir(dir));
            plan.push(ScaffoldEntry::file(gitignore, templates::CACHE_GITIGNORE));
        }
        plan
    }
}

fn apply_plan(ctx: &StepContext<'_>, plan: &[ScaffoldEntry]) -> Result<StepOutcome> {
    let outcome = scaffold::ensure(ctx.root, plan)?;
    if outcome.is_noop() {
        return Ok(StepOutcome::new(StepStatus::Unchanged));
    }
    Ok(outcome
        .created
        .into_iter()
        .fold(StepOutcome::new(StepStatus::Done), |acc, path| {
            acc.with_message(format!("Created {path}"))
        }))
}

impl Step for AddExecutable {
    fn kind(&self) -> StepKind {
        StepKind::Executable
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        apply_plan(ctx, &Self::plan(ctx))
    }
}

impl Step for AddBootstrap {
    fn kind(&self) -> StepKind {
        StepKind::Bootstrap
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        apply_plan(ctx, &Self::plan(ctx))
    }
}

impl Step for AddFrameworkFolders {
    fn kind(&self) -> StepKind {
        StepKind::FrameworkFolders
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        apply_plan(ctx, &Self::plan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrepConfig;
    use crate::project::ProjectRoot;
    use crate::public_path::PublicPathDecision;
    use std::fs;

    #[test]
    fn test_framework_plan_lists_parents_first() {
        let paths: Vec<_> = AddFrameworkFolders::plan()
            .into_iter()
            .map(|entry| entry.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "storage",
                "storage/framework",
                "storage/framework/cache",
                "storage/framework/cache/.gitignore",
                "storage/framework/sessions",
                "storage/framework/sessions/.gitignore",
                "storage/framework/views",
                "storage/framework/views/.gitignore",
            ]
        );
    }

    #[test]
    fn test_scaffold_steps_create_then_leave_alone() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let root = ProjectRoot::new(temp.path())?;
        let config = PrepConfig::default();
        let public = PublicPathDecision::keep("web");
        let ctx = StepContext {
            root: &root,
            config: &config,
            public: &public,
        };

        let first = AddBootstrap.apply(&ctx)?;
        assert_eq!(first.status, StepStatus::Done);
        assert_eq!(
            first.messages,
            vec![
                "Created bootstrap",
                "Created bootstrap/cache",
                "Created bootstrap/app.php"
            ]
        );
        let app = fs::read_to_string(temp.path().join("bootstrap/app.php"))?;
        assert!(app.contains("->usePublicPath(base_path('web'))"));

        AddFrameworkFolders.apply(&ctx)?;
        assert_eq!(
            fs::read_to_string(temp.path().join("storage/framework/views/.gitignore"))?,
            "*\n!.gitignore"
        );

        assert_eq!(AddBootstrap.apply(&ctx)?.status, StepStatus::Unchanged);
        assert_eq!(AddFrameworkFolders.apply(&ctx)?.status, StepStatus::Unchanged);
        Ok(())
    }

    #[test]
    fn test_existing_executable_is_kept() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join("artisan"), "custom")?;
        let root = ProjectRoot::new(temp.path())?;
        let config = PrepConfig::default();
        let public = PublicPathDecision::keep("public");
        let ctx = StepContext {
            root: &root,
            config: &config,
            public: &public,
        };

        assert_eq!(AddExecutable.apply(&ctx)?.status, StepStatus::Unchanged);
        assert_eq!(fs::read_to_string(temp.path().join("artisan"))?, "custom");
        Ok(())
    }
}
