//! Throwaway project trees for integration tests.
//!
//! Everything lives under an `assert_fs::TempDir` and is cleaned up on drop.
//!
//! ## Quick example
//! ```no_run
//! use prep_test_utils::sandbox::Sandbox;
//!
//! let mut sb = Sandbox::new();
//! sb.craft_project("5.8.0").write("web/index.php", "<?php\n");
//!
//! let output = sb.snapshot_run("craft-prep", ["prep", ".", "--yes"]);
//! println!("{output}");
//! ```

use assert_fs::TempDir;
use duct::Expression;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub const COMPOSER_JSON: &str = r#"{
    "name": "acme/site",
    "require": {
        "craftcms/cms": "^5.8.0",
        "vlucas/phpdotenv": "^5.4.0"
    },
    "config": {
        "platform": {
            "php": "8.2"
        },
        "sort-packages": true
    },
    "scripts": {
        "post-root-package-install": [
            "@php -r \"file_exists('.env') || copy('.env.example', '.env');\""
        ]
    }
}
"#;

pub const DDEV_CONFIG: &str = r#"name: acme
type: craftcms
docroot: web
php_version: "8.3"
webserver_type: nginx-fpm
# Database settings
database:
  type: mysql
  version: "8.0"
"#;

/// `composer.lock` declaring `craftcms/cms` at `version`.
pub fn composer_lock(version: &str) -> String {
    format!(
        r#"{{
    "packages": [
        {{"name": "vlucas/phpdotenv", "version": "v5.6.1"}},
        {{"name": "craftcms/cms", "version": "{version}"}}
    ]
}}
"#
    )
}

pub struct Sandbox {
    root: TempDir,
    default_cwd: PathBuf,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create sandbox TempDir");
        let default_cwd = root.path().to_path_buf();
        Self { root, default_cwd }
    }

    /// Absolute path to the sandbox root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Set the default working directory for commands. Path is relative to sandbox root if not absolute.
    pub fn set_default_cwd<P: AsRef<Path>>(&mut self, cwd: P) -> &mut Self {
        let cwd = cwd.as_ref();
        self.default_cwd = if cwd.is_absolute() {
            cwd.to_path_buf()
        } else {
            self.root_path().join(cwd)
        };
        self
    }

    /// Write/overwrite a file relative to the sandbox root.
    pub fn write<P: AsRef<Path>, S: AsRef<[u8]>>(&mut self, rel: P, contents: S) -> &mut Self {
        let p = self.root_path().join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(p, contents).expect("write file");
        self
    }

    pub fn mkdir<P: AsRef<Path>>(&mut self, rel: P) -> &mut Self {
        fs::create_dir_all(self.root_path().join(rel)).expect("create dir");
        self
    }

    pub fn read<P: AsRef<Path>>(&self, rel: P) -> String {
        fs::read_to_string(self.root_path().join(rel)).expect("read file")
    }

    pub fn exists<P: AsRef<Path>>(&self, rel: P) -> bool {
        self.root_path().join(rel).exists()
    }

    /// A Craft 5 project with a manifest and a lock file pinning `version`.
    pub fn craft_project(&mut self, version: &str) -> &mut Self {
        self.write("composer.json", COMPOSER_JSON)
            .write("composer.lock", composer_lock(version))
    }

    /// Like [`Sandbox::craft_project`], with a ddev descriptor and env files
    /// and the web root in `web/`.
    pub fn ddev_project(&mut self, version: &str) -> &mut Self {
        self.craft_project(version)
            .write(".ddev/config.yaml", DDEV_CONFIG)
            .write(".ddev/.env.web", "CRAFT_DB_SERVER=db\nCRAFT_DB_DATABASE=db\n")
            .write(
                ".env",
                "# General\nCRAFT_ENVIRONMENT=dev\nCRAFT_DB_DRIVER=mysql\nCRAFT_DB_PASSWORD=\"s3cret pass\"\n",
            )
            .write("web/index.php", "<?php\nrequire dirname(__DIR__) . '/bootstrap.php';\n")
            .write("web/.htaccess", "RewriteEngine On\n")
            .write("craft", "#!/usr/bin/env php\n<?php\n")
            .write("bootstrap.php", "<?php\n")
    }

    /// Build a command for a cargo binary of this workspace, run from the
    /// default working directory with colors disabled.
    pub fn cmd<I>(&self, program: &str, args: I) -> Expression
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let bin = assert_cmd::cargo::cargo_bin(program);
        let args: Vec<_> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_os_string())
            .collect();
        duct::cmd(bin, args)
            .dir(&self.default_cwd)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .stdin_null()
    }

    /// Run a cargo binary and return its exit status, stdout and stderr as one
    /// string, with the sandbox root replaced by `<ROOT>`.
    pub fn snapshot_run<I>(&self, program: &str, args: I) -> String
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let output = self
            .cmd(program, args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .expect("spawn command");

        let root = fs::canonicalize(self.root_path()).unwrap_or_else(|_| self.root_path().into());
        let mut text = format!(
            "Exit Code: {}\n\n--- STDOUT ---\n{}\n--- STDERR ---\n{}",
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
        for path in [root.as_path(), self.root_path()] {
            text = text.replace(&path.to_string_lossy().replace('\\', "/"), "<ROOT>");
            text = text.replace(&*path.to_string_lossy(), "<ROOT>");
        }
        text
    }
}
