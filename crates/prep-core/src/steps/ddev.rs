use once_cell::sync::Lazy;
use regex::Regex;

use super::{Step, StepContext, StepKind, StepOutcome, StepStatus};
use crate::config::{CANONICAL_PUBLIC_PATH, PrepConfig};
use crate::error::Result;
use crate::fs;
use crate::line_patch::{captured_value, patch_line};
use crate::public_path::PublicPathDecision;

static PHP_VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?mR)^php_version:\s+['"]?([\d.]+)['"]?[ \t]*$"#)
        .expect("valid php_version pattern")
});

static DOCROOT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?mR)^docroot:\s+['"]?([\w+/]+)['"]?[ \t]*$"#)
        .expect("valid docroot pattern")
});

/// Bump the runtime version and, when the public folder is being renamed, the
/// document root in the development environment descriptor.
pub struct UpdateDescriptor;

impl Step for UpdateDescriptor {
    fn kind(&self) -> StepKind {
        StepKind::Descriptor
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let path = ctx.root.join(ctx.config.descriptor_file);
        if !path.is_file() {
            return Ok(StepOutcome::new(StepStatus::Info)
                .with_message(format!("No {} file detected.", ctx.config.descriptor_file)));
        }

        let original = fs::read_to_string(&path)?;
        let patch = patch_descriptor(&original, ctx.config, ctx.public);
        let changed = patch.text != original;
        if changed {
            fs::write_atomic(&path, &patch.text)?;
        }

        if patch.missing.is_empty() {
            return Ok(StepOutcome::changed(changed));
        }
        let mut outcome = StepOutcome::new(StepStatus::Warning);
        for field in patch.missing {
            outcome = outcome.with_message(format!(
                "No {field} detected in {}.",
                ctx.config.descriptor_file
            ));
        }
        Ok(outcome)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorPatch {
    pub text: String,
    /// Fields that should have been updated but were not found.
    pub missing: Vec<&'static str>,
}

/// Rewrite the `php_version` line, and the `docroot` line when a rename was
/// requested, leaving every other line of `text` as it was.
pub fn patch_descriptor(
    text: &str,
    config: &PrepConfig,
    public: &PublicPathDecision,
) -> DescriptorPatch {
    let mut text = text.to_string();
    let mut missing = Vec::new();

    match captured_value(&text, &PHP_VERSION_RE) {
        None => missing.push("php_version"),
        Some(current) if current == config.php_version => {}
        Some(_) => {
            let replacement = format!("php_version: \"{}\"", config.php_version);
            text = patch_line(&text, &PHP_VERSION_RE, &replacement).text;
        }
    }

    if public.rename_requested {
        let replacement = format!("docroot: {CANONICAL_PUBLIC_PATH}");
        let patched = patch_line(&text, &DOCROOT_RE, &replacement);
        if patched.matched {
            text = patched.text;
        } else {
            missing.push("docroot");
        }
    }

    DescriptorPatch { text, missing }
}
