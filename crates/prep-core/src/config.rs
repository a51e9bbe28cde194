//! Fixed migration policy: which package is tracked, which version it must be
//! on, and the names of every file the migration touches.

/// Directory the web server serves the application from after migration.
pub const CANONICAL_PUBLIC_PATH: &str = "public";

#[derive(Debug, Clone)]
pub struct PrepConfig {
    pub manifest_file: &'static str,
    pub lock_file: &'static str,
    /// Package whose installed version gates the migration.
    pub package: &'static str,
    pub min_version: &'static str,
    /// Version expression written to `require.<package>`.
    pub require_constraint: &'static str,
    pub hook_scripts: &'static [&'static str],
    pub php_version: &'static str,
    pub envtool_dir: &'static str,
    pub descriptor_file: &'static str,
    pub entry_file: &'static str,
    pub public_candidates: &'static [&'static str],
    pub vendor_dirs: &'static [&'static str],
    pub env_files: &'static [&'static str],
    pub env_key_map: &'static [(&'static str, &'static str)],
    pub executable: &'static str,
    pub bootstrap_file: &'static str,
    pub legacy_executable: &'static str,
    pub legacy_bootstrap: &'static str,
    /// Settings the operator has to drop from `config/general.php` by hand.
    pub obsolete_settings: &'static [&'static str],
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            manifest_file: "composer.json",
            lock_file: "composer.lock",
            package: "craftcms/cms",
            min_version: "5.8.0",
            require_constraint: "6.x-dev as 5.8.0",
            hook_scripts: &[
                "Illuminate\\Foundation\\ComposerScripts::postAutoloadDump",
                "@php artisan package:discover --ansi",
            ],
            php_version: "8.4",
            envtool_dir: ".ddev",
            descriptor_file: ".ddev/config.yaml",
            entry_file: "index.php",
            public_candidates: &["public", "public_html", "web", "html"],
            vendor_dirs: &["vendor", "node_modules"],
            env_files: &[".ddev/.env", ".ddev/.env.web", ".env"],
            env_key_map: &[
                ("CRAFT_DB_DRIVER", "DB_CONNECTION"),
                ("CRAFT_DB_SERVER", "DB_HOST"),
                ("CRAFT_DB_PORT", "DB_PORT"),
                ("CRAFT_DB_USER", "DB_USERNAME"),
                ("CRAFT_DB_PASSWORD", "DB_PASSWORD"),
                ("CRAFT_DB_DATABASE", "DB_DATABASE"),
                ("CRAFT_DB_SCHEMA", "DB_SCHEMA"),
                ("CRAFT_DB_TABLE_PREFIX", "DB_TABLE_PREFIX"),
            ],
            executable: "artisan",
            bootstrap_file: "bootstrap/app.php",
            legacy_executable: "craft",
            legacy_bootstrap: "bootstrap.php",
            obsolete_settings: &["omitScriptNameInUrls", "pathParam"],
        }
    }
}
