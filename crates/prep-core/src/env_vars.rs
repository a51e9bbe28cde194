//! Rename legacy variables in dotenv files.
//!
//! Old keys are removed line by line and their values are appended under the
//! new names, leaving every other line (comments included) where it was.
//! Values are copied as written, quotes included, so nothing is expanded.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{PrepError, Result};
use crate::fs;
use crate::project::ProjectRoot;

static KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_.]*)\s*=(.*)$").expect("valid key pattern")
});

/// What happened to one candidate env file.
#[derive(Debug)]
pub enum EnvFileOutcome {
    Missing,
    /// The file holds none of the legacy keys and was not touched.
    Untouched,
    /// Legacy keys were removed; `appended` lists the new keys that were
    /// written. A legacy key whose new name is already set loses its value;
    /// those pairs are in `discarded` as `(legacy, existing)`.
    Migrated {
        renamed: Vec<String>,
        appended: Vec<String>,
        discarded: Vec<(String, String)>,
    },
    Failed(PrepError),
}

#[derive(Debug)]
pub struct EnvFileReport {
    pub file: String,
    pub outcome: EnvFileOutcome,
}

/// Migrate every existing file in `candidates`, in order. Each file is handled
/// on its own; a failure in one does not stop the others.
pub fn migrate(
    root: &ProjectRoot,
    candidates: &[&str],
    key_map: &[(&str, &str)],
) -> Vec<EnvFileReport> {
    candidates
        .iter()
        .map(|rel| {
            let path = root.join(rel);
            let outcome = if !path.is_file() {
                EnvFileOutcome::Missing
            } else {
                match migrate_file(&path, key_map) {
                    Ok(outcome) => outcome,
                    Err(e) => EnvFileOutcome::Failed(e),
                }
            };
            EnvFileReport {
                file: rel.to_string(),
                outcome,
            }
        })
        .collect()
}

pub fn migrate_file(path: &Path, key_map: &[(&str, &str)]) -> Result<EnvFileOutcome> {
    let text = fs::read_to_string(path)?;
    let vars = parse(&text);
    let raw = raw_values(&text);

    let mut remove = HashSet::new();
    let mut renamed = Vec::new();
    let mut add = Vec::new();
    let mut discarded = Vec::new();
    for &(old, new) in key_map {
        if !vars.contains_key(old) {
            continue;
        }
        remove.insert(old);
        renamed.push(old.to_string());
        if vars.contains_key(new) {
            log::debug!("{old} dropped in {}: {new} is already set", path.display());
            discarded.push((old.to_string(), new.to_string()));
        } else if let Some(value) = raw.get(old) {
            add.push((new, value.as_str()));
        }
    }

    if remove.is_empty() {
        return Ok(EnvFileOutcome::Untouched);
    }

    let updated = rewrite_lines(&text, &remove, &add);
    fs::write_atomic(path, &updated)?;
    log::debug!("Renamed {renamed:?} in {}", path.display());

    Ok(EnvFileOutcome::Migrated {
        renamed,
        appended: add.iter().map(|(key, _)| key.to_string()).collect(),
        discarded,
    })
}

/// Parse dotenv `text` into a key/value map. Lines the parser rejects are
/// skipped. Values are expanded, so use this for key lookups only.
pub fn parse(text: &str) -> HashMap<String, String> {
    dotenvy::from_read_iter(text.as_bytes())
        .filter_map(|item| match item {
            Ok(pair) => Some(pair),
            Err(e) => {
                log::debug!("Skipping unparseable env line: {e}");
                None
            }
        })
        .collect()
}

/// The right-hand side of every assignment exactly as written, trimmed of
/// surrounding whitespace. A quoted value spanning several lines keeps its
/// continuation lines. Later assignments win.
pub fn raw_values(text: &str) -> HashMap<String, String> {
    let mut values: HashMap<String, String> = HashMap::new();
    let mut open: Option<(String, char)> = None;

    for line in text.lines() {
        if let Some((key, quote)) = open.take() {
            if let Some(value) = values.get_mut(&key) {
                value.push('\n');
                value.push_str(line);
            }
            if !closes_quote(line, quote) {
                open = Some((key, quote));
            }
            continue;
        }

        if let Some(caps) = KEY_RE.captures(line) {
            let key = caps[1].to_string();
            let value = caps[2].trim();
            if let Some(quote) = unterminated_quote(value) {
                open = Some((key.clone(), quote));
            }
            values.insert(key, value.to_string());
        }
    }
    values
}

/// Drop every line assigning a key in `remove` and append `add` at the end.
fn rewrite_lines(text: &str, remove: &HashSet<&str>, add: &[(&str, &str)]) -> String {
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let mut out = String::with_capacity(text.len());
    let mut open_quote: Option<char> = None;

    for line in text.split_inclusive('\n') {
        if let Some(quote) = open_quote {
            if closes_quote(line, quote) {
                open_quote = None;
            }
            continue;
        }

        let content = line.trim_end_matches(['\r', '\n']);
        if let Some(caps) = KEY_RE.captures(content) {
            if remove.contains(&caps[1]) {
                open_quote = unterminated_quote(&caps[2]);
                continue;
            }
        }
        out.push_str(line);
    }

    if add.is_empty() {
        return out;
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push_str(newline);
    }
    for (key, value) in add {
        out.push_str(key);
        out.push('=');
        out.push_str(&value.replace('\n', newline));
        out.push_str(newline);
    }
    out
}

/// The quote character of a value that opens a quote without closing it on
/// the same line.
fn unterminated_quote(raw_value: &str) -> Option<char> {
    let value = raw_value.trim_start();
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    if closes_quote(&value[1..], quote) {
        None
    } else {
        Some(quote)
    }
}

fn closes_quote(s: &str, quote: char) -> bool {
    let mut escaped = false;
    for c in s.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' && quote == '"' {
            escaped = true;
        } else if c == quote {
            return true;
        }
    }
    false
}
