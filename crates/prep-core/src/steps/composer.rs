use serde_json::Value;

use super::{Step, StepContext, StepKind, StepOutcome};
use crate::config::PrepConfig;
use crate::error::{PrepError, Result};
use crate::json::{self, DEFAULT_INDENT, OnMissing};

const HOOK_LIST: &str = "post-autoload-dump";

/// Point `require` at the next major version, drop the PHP platform pin and
/// register the framework's post-autoload hooks.
pub struct UpdateManifest;

impl Step for UpdateManifest {
    fn kind(&self) -> StepKind {
        StepKind::Manifest
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepOutcome> {
        let path = ctx.root.join(ctx.config.manifest_file);
        let written = json::rewrite(&path, DEFAULT_INDENT, OnMissing::Fail, |manifest| {
            patch_manifest(manifest, ctx.config).map_err(|message| {
                PrepError::UnexpectedStructure {
                    path: path.clone(),
                    message,
                }
            })
        })?;
        Ok(StepOutcome::changed(written))
    }
}

/// Apply the manifest changes to a decoded `composer.json`. Applying it to its
/// own output changes nothing.
pub fn patch_manifest(
    mut manifest: Value,
    config: &PrepConfig,
) -> std::result::Result<Value, String> {
    if !manifest.is_object() {
        return Err("the top level is not an object".to_string());
    }

    json::object_entry(&mut manifest, "require")
        .ok_or("`require` is not an object")?
        .insert(
            config.package.to_string(),
            Value::String(config.require_constraint.to_string()),
        );

    if let Some(settings) = manifest.get_mut("config").and_then(Value::as_object_mut) {
        let drop_platform = match settings.get_mut("platform") {
            Some(Value::Object(platform)) => {
                platform.shift_remove("php");
                platform.is_empty()
            }
            // An empty list is what an emptied platform map used to be encoded as.
            Some(Value::Array(list)) => list.is_empty(),
            _ => false,
        };
        if drop_platform {
            settings.shift_remove("platform");
        }
    }

    let scripts =
        json::object_entry(&mut manifest, "scripts").ok_or("`scripts` is not an object")?;
    let hooks = scripts
        .entry(HOOK_LIST)
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::String(single) = hooks {
        let single = std::mem::take(single);
        *hooks = Value::Array(vec![Value::String(single)]);
    }
    let hooks = hooks
        .as_array_mut()
        .ok_or("`scripts.post-autoload-dump` is not a list")?;
    for script in config.hook_scripts {
        if !hooks.iter().any(|existing| existing.as_str() == Some(*script)) {
            hooks.push(Value::String(script.to_string()));
        }
    }

    Ok(manifest)
}
