//! Format-preserving JSON rewriting.
//!
//! Documents are re-encoded with the indentation unit and line ending found in
//! the original file, so a mutation that leaves a document alone produces the
//! same bytes that were read (plus a single trailing newline).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::path::Path;

use crate::error::{PrepError, Result};
use crate::fs;

pub const DEFAULT_INDENT: &str = "  ";

static INDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\A\s*\{[ \t]*\r?\n([ \t]+)""#).expect("valid indent pattern"));

/// What [`rewrite`] does when the target file does not exist.
#[derive(Debug, Clone)]
pub enum OnMissing {
    Fail,
    /// Start from this document, indented with the default unit.
    Create(Value),
}

/// A decoded document together with the indentation unit and line ending it
/// is written with.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredDocument {
    pub value: Value,
    pub indent: String,
    pub newline: &'static str,
}

impl StructuredDocument {
    pub fn new(value: Value, indent: impl Into<String>) -> Self {
        Self {
            value,
            indent: indent.into(),
            newline: "\n",
        }
    }

    /// Decode `source`, remembering its indentation or `default_indent` if
    /// none can be detected.
    pub fn parse(source: &str, default_indent: &str) -> serde_json::Result<Self> {
        let value = serde_json::from_str(source)?;
        let indent = detect_indent(source).unwrap_or(default_indent).to_string();
        let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };
        Ok(Self {
            value,
            indent,
            newline,
        })
    }

    /// Encode with the stored indentation unit and line ending, without a
    /// trailing newline.
    pub fn encode(&self) -> serde_json::Result<String> {
        let encoded = encode_with_indent(&self.value, &self.indent)?;
        if self.newline == "\n" {
            return Ok(encoded);
        }
        // String contents never hold a raw newline, so every one is structural.
        Ok(encoded.replace('\n', self.newline))
    }
}

/// Indentation of the first member line after the opening brace.
pub fn detect_indent(source: &str) -> Option<&str> {
    INDENT_RE
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Pretty-print `value` using `indent` as the unit for every nesting level.
///
/// Non-ASCII characters and `/` are written as-is.
pub fn encode_with_indent<T>(value: &T, indent: &str) -> serde_json::Result<String>
where
    T: Serialize + ?Sized,
{
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(out).map_err(serde::ser::Error::custom)
}

pub(crate) fn read_source(path: &Path) -> Result<String> {
    if path.is_dir() {
        return Err(PrepError::UnexpectedStructure {
            path: path.to_path_buf(),
            message: "expected a file, found a directory".to_string(),
        });
    }
    fs::read_to_string(path)
}

/// Load and decode the document at `path`.
pub fn load(path: &Path, default_indent: &str) -> Result<StructuredDocument> {
    let source = read_source(path)?;
    StructuredDocument::parse(&source, default_indent).map_err(|source| {
        PrepError::MalformedDocument {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Decode the document at `path`, apply `mutate`, and write the result back
/// in the file's own indentation.
///
/// Returns `true` when the file was written, `false` when the re-encoded
/// document is byte-identical to what is already on disk.
pub fn rewrite<F>(
    path: &Path,
    default_indent: &str,
    on_missing: OnMissing,
    mutate: F,
) -> Result<bool>
where
    F: FnOnce(Value) -> Result<Value>,
{
    let (doc, original) = if path.exists() {
        let source = read_source(path)?;
        let doc = StructuredDocument::parse(&source, default_indent).map_err(|source| {
            PrepError::MalformedDocument {
                path: path.to_path_buf(),
                source,
            }
        })?;
        (doc, Some(source))
    } else {
        match on_missing {
            OnMissing::Fail => return Err(PrepError::NotFound(path.to_path_buf())),
            OnMissing::Create(value) => (StructuredDocument::new(value, default_indent), None),
        }
    };

    let updated = StructuredDocument {
        value: mutate(doc.value)?,
        ..doc
    };
    let mut encoded = updated
        .encode()
        .map_err(|e| PrepError::UnexpectedStructure {
            path: path.to_path_buf(),
            message: format!("cannot be encoded: {e}"),
        })?;
    encoded.push_str(updated.newline);

    if original.as_deref() == Some(encoded.as_str()) {
        log::debug!("{} unchanged", path.display());
        return Ok(false);
    }

    fs::write_atomic(path, &encoded)?;
    Ok(true)
}

/// Mutable access to `value[key]` as an object, inserting an empty object when
/// the key is absent.
pub fn object_entry<'a>(
    value: &'a mut Value,
    key: &str,
) -> Option<&'a mut serde_json::Map<String, Value>> {
    value
        .as_object_mut()?
        .entry(key)
        .or_insert_with(|| Value::Object(Default::default()))
        .as_object_mut()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    const FOUR_SPACES: &str = r#"{
    "name": "acme/site",
    "description": "Café – naïve/ok",
    "require": {
        "php": "^8.2",
        "craftcms/cms": "^5.8.0"
    },
    "keywords": [
        "craft",
        "cms"
    ],
    "extra": {},
    "list": [],
    "number": 1.50,
    "nested": [
        {
            "a": true,
            "b": null
        }
    ]
}"#;

    #[test]
    fn test_detect_indent() {
        assert_eq!(detect_indent(FOUR_SPACES), Some("    "));
        assert_eq!(detect_indent("{\n  \"a\": 1\n}"), Some("  "));
        assert_eq!(detect_indent("{\n\t\"a\": 1\n}"), Some("\t"));
        assert_eq!(detect_indent("{\"a\": 1}"), None);
        assert_eq!(detect_indent("{}"), None);
    }

    #[test]
    fn test_unmodified_document_is_byte_identical() -> anyhow::Result<()> {
        let doc = StructuredDocument::parse(FOUR_SPACES, DEFAULT_INDENT)?;
        assert_eq!(doc.indent, "    ");
        assert_eq!(doc.encode()?, FOUR_SPACES);
        Ok(())
    }

    #[test]
    fn test_round_trip_for_each_indent_unit() -> anyhow::Result<()> {
        let value = json!({
            "require": {"craftcms/cms": "6.x-dev as 5.8.0"},
            "scripts": {"post-autoload-dump": ["@php artisan package:discover --ansi"]},
            "empty": {}
        });
        for unit in ["  ", "    ", "\t"] {
            let written = encode_with_indent(&value, unit)?;
            let doc = StructuredDocument::parse(&written, "?")?;
            assert_eq!(doc.indent, unit);
            assert_eq!(doc.encode()?, written);
        }
        Ok(())
    }

    #[test]
    fn test_rewrite_identity_keeps_file() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("composer.json");
        let original = format!("{FOUR_SPACES}\n");
        fs::write(&path, &original)?;

        let written = rewrite(&path, DEFAULT_INDENT, OnMissing::Fail, Ok)?;
        assert!(!written);
        assert_eq!(fs::read_to_string(&path)?, original);
        Ok(())
    }

    #[test]
    fn test_rewrite_identity_keeps_crlf_file() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("composer.json");
        let original = format!("{}\r\n", FOUR_SPACES.replace('\n', "\r\n"));
        fs::write(&path, &original)?;

        let written = rewrite(&path, DEFAULT_INDENT, OnMissing::Fail, Ok)?;
        assert!(!written);
        assert_eq!(fs::read_to_string(&path)?, original);
        Ok(())
    }

    #[test]
    fn test_rewrite_crlf_file_keeps_crlf() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("composer.json");
        fs::write(&path, "{\r\n  \"a\": 1\r\n}\r\n")?;

        assert!(rewrite(&path, DEFAULT_INDENT, OnMissing::Fail, |mut value| {
            value["b"] = json!(["x"]);
            Ok(value)
        })?);
        assert_eq!(
            fs::read_to_string(&path)?,
            "{\r\n  \"a\": 1,\r\n  \"b\": [\r\n    \"x\"\r\n  ]\r\n}\r\n"
        );
        Ok(())
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("no representation"))
        }
    }

    #[test]
    fn test_encode_failure_is_an_error() {
        let err = encode_with_indent(&Unencodable, DEFAULT_INDENT).unwrap_err();
        assert!(err.to_string().contains("no representation"), "{err}");
    }

    #[test]
    fn test_rewrite_adds_trailing_newline() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("composer.json");
        fs::write(&path, FOUR_SPACES)?;

        assert!(rewrite(&path, DEFAULT_INDENT, OnMissing::Fail, Ok)?);
        assert_eq!(fs::read_to_string(&path)?, format!("{FOUR_SPACES}\n"));
        Ok(())
    }

    #[test]
    fn test_rewrite_keeps_tab_indent_and_key_order() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("composer.json");
        fs::write(&path, "{\n\t\"b\": 1,\n\t\"a\": {\n\t\t\"x\": \"/path\"\n\t}\n}\n")?;

        rewrite(&path, DEFAULT_INDENT, OnMissing::Fail, |mut value| {
            value["c"] = json!("ü");
            Ok(value)
        })?;

        insta::assert_snapshot!(fs::read_to_string(&path)?.trim_end().replace('\t', "<TAB>"), @r#"
        {
        <TAB>"b": 1,
        <TAB>"a": {
        <TAB><TAB>"x": "/path"
        <TAB>},
        <TAB>"c": "ü"
        }
        "#);
        Ok(())
    }

    #[test]
    fn test_rewrite_missing_file() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("new.json");

        assert!(matches!(
            rewrite(&path, DEFAULT_INDENT, OnMissing::Fail, Ok),
            Err(PrepError::NotFound(_))
        ));
        assert!(!path.exists());

        rewrite(&path, DEFAULT_INDENT, OnMissing::Create(json!({})), |mut value| {
            value["a"] = json!(1);
            Ok(value)
        })?;
        assert_eq!(fs::read_to_string(&path)?, "{\n  \"a\": 1\n}\n");
        Ok(())
    }

    #[test]
    fn test_rewrite_malformed_file_is_untouched() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("composer.json");
        fs::write(&path, "{ \"a\": ")?;

        assert!(matches!(
            rewrite(&path, DEFAULT_INDENT, OnMissing::Fail, Ok),
            Err(PrepError::MalformedDocument { .. })
        ));
        assert_eq!(fs::read_to_string(&path)?, "{ \"a\": ");
        Ok(())
    }

    #[test]
    fn test_object_entry_inserts_missing_object() {
        let mut value = json!({"name": "x"});
        object_entry(&mut value, "require")
            .expect("object")
            .insert("a".into(), json!("1"));
        assert_eq!(value, json!({"name": "x", "require": {"a": "1"}}));

        let mut value = json!({"require": "oops"});
        assert!(object_entry(&mut value, "require").is_none());
    }
}
