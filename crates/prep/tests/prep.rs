#![cfg(not(target_os = "windows"))]

use prep_test_utils::sandbox::Sandbox;

const CRAFT_PREP: &str = "craft-prep";

#[test]
fn test_prep_without_manifest_exits_one() {
    let sb = Sandbox::new();
    let output = sb.snapshot_run(CRAFT_PREP, ["prep", "."]);
    assert!(output.starts_with("Exit Code: 1\n"), "{output}");
    assert!(output.contains("No composer.json file found at <ROOT>."), "{output}");
}

#[test]
fn test_prep_rejects_old_version_without_writing() {
    let mut sb = Sandbox::new();
    sb.craft_project("5.7.9").write("web/index.php", "<?php\n");
    let before = prep_test_utils::snapdir::dir_manifest(sb.root_path());

    let output = sb.snapshot_run(CRAFT_PREP, ["prep", ".", "--yes"]);
    assert!(output.starts_with("Exit Code: 1\n"), "{output}");
    assert!(output.contains("5.8.0 or later (found 5.7.9)"), "{output}");
    assert_eq!(prep_test_utils::snapdir::dir_manifest(sb.root_path()), before);
}

#[test]
fn test_prep_full_run_with_rename() {
    let mut sb = Sandbox::new();
    sb.ddev_project("5.8.0");

    let output = sb.snapshot_run(CRAFT_PREP, ["prep", ".", "--yes"]);
    assert!(output.starts_with("Exit Code: 0\n"), "{output}");
    assert!(output.contains("ddev composer update"), "{output}");
    assert!(output.contains("omitScriptNameInUrls"), "{output}");

    assert!(sb.exists("public/index.php"));
    assert!(sb.exists("public/.htaccess"));
    assert!(!sb.exists("web"));
    assert!(!sb.exists("craft"));
    assert!(!sb.exists("bootstrap.php"));
    let descriptor = sb.read(".ddev/config.yaml");
    assert!(descriptor.contains("docroot: public\n"));
    assert!(descriptor.contains("php_version: \"8.4\"\n"));
    assert!(sb.read("composer.json").contains("\"craftcms/cms\": \"6.x-dev as 5.8.0\""));
}

#[test]
fn test_prep_no_rename_declares_public_path() {
    let mut sb = Sandbox::new();
    sb.ddev_project("5.8.1");

    let output = sb.snapshot_run(CRAFT_PREP, ["prep", "--no-rename"]);
    assert!(output.starts_with("Exit Code: 0\n"), "{output}");
    assert!(sb.exists("web/index.php"));
    assert!(!sb.exists("public"));
    assert!(sb.read(".ddev/config.yaml").contains("docroot: web\n"));
    assert!(
        sb.read("bootstrap/app.php")
            .contains("->usePublicPath(base_path('web'))")
    );
}

#[test]
fn test_prep_without_tty_keeps_public_path() {
    let mut sb = Sandbox::new();
    sb.craft_project("5.8.0").write("web/index.php", "<?php\n");

    let output = sb.snapshot_run(CRAFT_PREP, ["prep", "."]);
    assert!(output.starts_with("Exit Code: 0\n"), "{output}");
    assert!(sb.exists("web/index.php"));
    assert!(!sb.exists("public"));
}

#[test]
fn test_prep_rejects_conflicting_flags() {
    let sb = Sandbox::new();
    let output = sb.snapshot_run(CRAFT_PREP, ["prep", "--yes", "--no-rename"]);
    assert!(output.starts_with("Exit Code: 2\n"), "{output}");
    assert!(output.contains("cannot be used with"), "{output}");
}
