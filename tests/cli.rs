use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "build output").unwrap();
}

fn setup_test_directory() -> TempDir {
    let dir = tempdir().unwrap();

    touch(dir.path(), "proj/bin/app.dll");
    touch(dir.path(), "proj/obj/temp.cache");
    touch(dir.path(), "proj/src/code.txt");
    touch(dir.path(), "proj/.git/config");

    dir
}

fn superclean() -> Command {
    Command::cargo_bin("superclean").unwrap()
}

#[test]
fn test_cleans_bin_and_obj() {
    let dir = setup_test_directory();

    superclean()
        .arg(dir.path())
        .args(["--mask", "*.dll", "--mask", "*.cache", "--ignore", ".git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SuperClean (v"))
        .stdout(predicate::str::contains("Deleted 1 File(s) in Directory").count(2))
        .stdout(predicate::str::contains("No Files Found").not());

    assert!(!dir.path().join("proj/bin/app.dll").exists());
    assert!(!dir.path().join("proj/obj/temp.cache").exists());
    assert!(dir.path().join("proj/src/code.txt").exists());
    assert!(dir.path().join("proj/.git/config").exists());
}

#[test]
fn test_defaults_to_current_directory() {
    let dir = setup_test_directory();

    superclean()
        .current_dir(dir.path())
        .args(["-m", "*.dll"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 File(s) in Directory"));

    assert!(!dir.path().join("proj/bin/app.dll").exists());
}

#[test]
fn test_no_files_found() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "proj/src/code.txt");

    superclean()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::ends_with("No Files Found\n\n"));
}

#[test]
fn test_second_run_finds_nothing() {
    let dir = setup_test_directory();

    superclean().arg(dir.path()).assert().success();

    superclean()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted").not())
        .stdout(predicate::str::contains("No Files Found"));
}

#[test]
fn test_missing_root_fails() {
    let dir = tempdir().unwrap();

    superclean()
        .arg(dir.path().join("missing"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failure: "));
}

#[test]
fn test_json_output() {
    let dir = setup_test_directory();

    superclean()
        .arg(dir.path())
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"directories_cleaned\": 1"))
        .stdout(predicate::str::contains("SuperClean (v").not());
}

#[test]
fn test_version_flag() {
    superclean()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_relative_path_reported_as_absolute() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "proj/bin/app.dll");
    let bin = dir.path().canonicalize().unwrap().join("proj").join("bin");

    superclean()
        .current_dir(dir.path())
        .arg("proj")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Deleted 1 File(s) in Directory {}",
            bin.display()
        )));

    assert!(!bin.join("app.dll").exists());
}

#[test]
fn test_default_run_reports_once() {
    let dir = setup_test_directory();

    superclean()
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[cfg(unix)]
#[test]
fn test_abort_on_inaccessible_directory() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    touch(dir.path(), "proj/bin/app.dll");
    let locked = dir.path().join("proj");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // root 不受目录权限限制
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    superclean()
        .arg(dir.path())
        .arg("--abort-on-inaccessible")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failure: "))
        .stdout(predicate::str::contains("Unable to access directory"));

    superclean()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Unable to access directory: {}",
            locked.display()
        )));

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(locked.join("bin/app.dll").exists());
}
