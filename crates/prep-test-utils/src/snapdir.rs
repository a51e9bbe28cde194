//! Render a whole directory as text, for before/after comparisons.
//! - Hidden files are included; ignore files are not honoured
//! - Empty directories are listed so scaffolded folders show up
//! - Only UTF-8 text file bodies are included (CRLF→LF)
//! - Deterministic path order

use ignore::WalkBuilder;
use std::{fs, path::Path};

/// Render every entry under `root` as text: `=== path/` for a directory with
/// no children, `=== path` followed by the body for a file.
pub fn dir_manifest(root: &Path) -> String {
    let base = fs::canonicalize(root).expect("failed to canonicalize root path");

    let mut wb = WalkBuilder::new(&base);
    wb.hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .sort_by_file_path(|a, b| a.cmp(b));

    let mut out = String::new();
    for dent in wb.build().filter_map(Result::ok) {
        let p = dent.path();
        if p == base {
            continue;
        }
        let rel = p
            .strip_prefix(&base)
            .expect("path should be within base")
            .to_string_lossy()
            .replace('\\', "/");
        let Some(ft) = dent.file_type() else { continue };

        if ft.is_dir() {
            let empty = fs::read_dir(p)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if empty {
                out.push_str(&format!("=== {rel}/\n"));
            }
        } else if ft.is_file() {
            let buf = fs::read(p).expect("failed to read file");
            out.push_str(&format!("=== {rel}\n"));
            match std::str::from_utf8(&buf) {
                Ok(s) => {
                    let mut body = s.replace("\r\n", "\n");
                    if !body.is_empty() && !body.ends_with('\n') {
                        body.push('\n');
                    }
                    out.push_str(&body);
                }
                Err(_) => out.push_str("<binary>\n"),
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_manifest_lists_hidden_files_and_empty_dirs() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(temp.path().join("b/empty")).expect("mkdir");
        fs::write(temp.path().join("b/.gitignore"), "*\n!.gitignore").expect("write");
        fs::write(temp.path().join("a.txt"), "one\r\ntwo").expect("write");

        assert_eq!(
            dir_manifest(temp.path()),
            "=== a.txt\none\ntwo\n=== b/.gitignore\n*\n!.gitignore\n=== b/empty/\n"
        );
    }
}
