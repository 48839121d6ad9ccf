//! Integration tests for depsync

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn depsync() -> Command {
        let mut cmd = cargo_bin_cmd!("depsync");
        cmd.env_remove("DEPSYNC_CONFIG");
        cmd
    }

    fn in_project(dir: &Path) -> Command {
        let mut cmd = depsync();
        cmd.arg("-C").arg(dir);
        cmd
    }

    const LOW: &str = "# uv 0.4.0\nfoo==1.0\n";
    const HIGH: &str = "# uv 0.4.0\nfoo==2.0\n";

    fn write_comps(dir: &Path) {
        let comps = dir.join(".comps");
        fs::create_dir_all(&comps).unwrap();
        fs::write(comps.join("requirements_linux_3.12.txt"), LOW).unwrap();
        fs::write(comps.join("requirements_linux_3.12_high.txt"), HIGH).unwrap();
    }

    #[test]
    fn help_displays() {
        depsync()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Reconcile locked"));
    }

    #[test]
    fn version_displays() {
        depsync()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("depsync"));
    }

    #[test]
    fn lock_merges_compilations() {
        let temp = TempDir::new().unwrap();
        write_comps(temp.path());

        in_project(temp.path())
            .arg("lock")
            .assert()
            .success()
            .stdout(predicate::str::contains("lock.json"));

        let lock = fs::read_to_string(temp.path().join("lock.json")).unwrap();
        let entries: serde_json::Value = serde_json::from_str(&lock).unwrap();
        assert_eq!(entries["linux_3.12"], LOW);
        assert_eq!(entries["linux_3.12_high"], HIGH);
        assert!(lock.ends_with("}\n"));
    }

    #[test]
    fn lock_keeps_existing_keys() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("lock.json"),
            "{\n  \"windows_3.9\": \"# uv 0.3.0\\nbar==1.0\\n\"\n}\n",
        )
        .unwrap();
        write_comps(temp.path());

        in_project(temp.path()).arg("lock").assert().success();

        let lock = fs::read_to_string(temp.path().join("lock.json")).unwrap();
        let entries: serde_json::Value = serde_json::from_str(&lock).unwrap();
        assert_eq!(entries.as_object().unwrap().len(), 3);
        assert_eq!(entries["windows_3.9"], "# uv 0.3.0\nbar==1.0\n");
    }

    #[test]
    fn lock_rejects_corrupt_store() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("lock.json"), "not json").unwrap();
        write_comps(temp.path());

        in_project(temp.path())
            .arg("lock")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn show_lists_keys() {
        let temp = TempDir::new().unwrap();
        write_comps(temp.path());
        in_project(temp.path()).arg("lock").assert().success();

        in_project(temp.path())
            .args(["show", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::eq("linux_3.12\nlinux_3.12_high\n"));
    }

    #[test]
    fn show_json_summarizes_entries() {
        let temp = TempDir::new().unwrap();
        write_comps(temp.path());
        in_project(temp.path()).arg("lock").assert().success();

        in_project(temp.path())
            .args(["show", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"resolver_version\": \"0.4.0\""));
    }

    #[test]
    fn show_prints_listing() {
        let temp = TempDir::new().unwrap();
        write_comps(temp.path());
        in_project(temp.path()).arg("lock").assert().success();

        in_project(temp.path())
            .args(["show", "linux_3.12_high"])
            .assert()
            .success()
            .stdout(predicate::eq(HIGH));
    }

    #[test]
    fn show_missing_key() {
        let temp = TempDir::new().unwrap();

        in_project(temp.path())
            .args(["show", "linux_3.12"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No compilation locked"));
    }

    #[test]
    fn compile_requires_inputs() {
        let temp = TempDir::new().unwrap();

        in_project(temp.path())
            .args(["compile", "--platform", "linux", "--python-version", "3.12"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("requirements"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();

        in_project(temp.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[paths]"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();

        in_project(temp.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("depsync.toml"));
    }

    #[test]
    fn config_from_project_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("depsync.toml"),
            "[paths]\nlock = \"locks/all.json\"\n",
        )
        .unwrap();
        write_comps(temp.path());

        in_project(temp.path()).arg("lock").assert().success();
        assert!(temp.path().join("locks/all.json").is_file());
    }

    #[test]
    fn explicit_missing_config_fails() {
        let temp = TempDir::new().unwrap();

        in_project(temp.path())
            .args(["--config", "nope.toml", "lock"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("nope.toml"));
    }

    #[test]
    fn unknown_platform_rejected() {
        depsync()
            .args(["compile", "--platform", "beos"])
            .assert()
            .failure();
    }
}
