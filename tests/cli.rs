use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::{tempdir, TempDir};

/// Scratch HOME plus a working directory for one invocation.
struct Sandbox {
    root: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("home")).unwrap();
        fs::create_dir_all(root.path().join("work")).unwrap();
        Self { root }
    }

    fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    fn work(&self) -> PathBuf {
        self.root.path().join("work")
    }

    fn write_config(&self, defaults: serde_json::Value) {
        let dir = self.home().join(".config").join("hotpot");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("hotpot.json"),
            serde_json::json!({ "defaults": defaults }).to_string(),
        )
        .unwrap();
    }

    fn run(&self, args: &[&str], stdin: &str) -> Output {
        self.run_binary(Path::new(env!("CARGO_BIN_EXE_create-hotpot")), args, stdin)
    }

    fn run_binary(&self, binary: &Path, args: &[&str], stdin: &str) -> Output {
        let mut child = Command::new(binary)
            .args(args)
            .current_dir(self.work())
            .env("HOME", self.home())
            .env("APPDATA", self.home())
            .env("npm_config_user_agent", "pnpm/9.0.0 npm/? node/v20.0.0")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        child
            .stdin
            .take()
            .unwrap()
            .write_all(stdin.as_bytes())
            .unwrap();

        child.wait_with_output().unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn manifest_name(dir: &Path) -> String {
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("package.json")).unwrap()).unwrap();
    value["name"].as_str().unwrap().to_string()
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn init_repo(dir: &Path) {
    for args in [
        vec!["init", "--quiet"],
        vec!["add", "--all"],
        vec![
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@test.com",
            "commit",
            "--quiet",
            "-m",
            "init",
        ],
    ] {
        let status = Command::new("git")
            .args(&args)
            .current_dir(dir)
            .status()
            .unwrap();
        assert!(status.success());
    }
}

#[test]
fn generates_local_template_into_named_directory() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["test-app", "-t", "react-desktop"], "");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let target = sandbox.work().join("test-app");
    assert_eq!(manifest_name(&target), "test-app");
    assert!(target.join(".gitignore").is_file());
    assert!(target.join("src/main.tsx").is_file());

    let out = stdout(&output);
    assert!(out.contains("Done. Now run:"));
    assert!(out.contains("cd test-app"));
    assert!(out.contains("pnpm i"));
}

#[test]
fn relocated_binary_generates_from_embedded_template() {
    let sandbox = Sandbox::new();
    let bin_dir = sandbox.root.path().join("bin");
    fs::create_dir_all(&bin_dir).unwrap();
    let binary = bin_dir.join(format!("create-hotpot{}", std::env::consts::EXE_SUFFIX));
    fs::copy(env!("CARGO_BIN_EXE_create-hotpot"), &binary).unwrap();
    assert!(!bin_dir.join("templates").exists());

    let output = sandbox.run_binary(&binary, &["desk", "-t", "react-desktop"], "");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let target = sandbox.work().join("desk");
    assert_eq!(manifest_name(&target), "desk");
    assert!(target.join(".gitignore").is_file());
    assert!(target.join("src/App.tsx").is_file());
}

#[test]
fn broken_config_fails_with_config_exit_code() {
    let sandbox = Sandbox::new();
    let dir = sandbox.home().join(".config").join("hotpot");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("hotpot.json"), "{ \"defaults\": ").unwrap();

    let output = sandbox.run(&["app", "-t", "react-desktop"], "");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error [config.invalid_json]"));
    assert!(!sandbox.work().join("app").exists());
}

#[test]
fn no_arguments_asks_for_project_name_first() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&[], "");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Project name:"));
    assert!(out.contains("Operation cancelled"));
    assert!(entries(&sandbox.work()).is_empty());
}

#[test]
fn current_directory_overwrite_prompt_has_its_own_wording() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.work().join("package.json"), "not even json").unwrap();

    let output = sandbox.run(&["."], "");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Current directory is not empty. Remove existing files and continue?"));
    assert!(!out.contains("Target directory"));
    assert_eq!(
        fs::read_to_string(sandbox.work().join("package.json")).unwrap(),
        "not even json"
    );
}

#[test]
fn unknown_template_offers_framework_selection() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["app", "--template", "unknown"], "");

    assert!(output.status.success());
    let out = stdout(&output);
    let not_found = out
        .find("Template \"unknown\" not found. Choose from the templates below:")
        .expect("not-found prompt");
    let react = out.find("React").expect("framework option");
    assert!(not_found < react);
    assert!(entries(&sandbox.work().join("app")).is_empty());
}

#[test]
fn declining_overwrite_leaves_directory_unchanged() {
    let sandbox = Sandbox::new();
    let target = sandbox.work().join("existing");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("notes.txt"), "keep me").unwrap();

    let output = sandbox.run(&["existing", "-t", "react-desktop"], "n\n");

    assert!(output.status.success());
    assert!(stdout(&output)
        .contains("Target directory \"existing\" is not empty. Remove existing files and continue?"));
    assert_eq!(entries(&target), vec!["notes.txt"]);
    assert_eq!(fs::read_to_string(target.join("notes.txt")).unwrap(), "keep me");
}

#[test]
fn interactive_selection_generates_chosen_template() {
    let sandbox = Sandbox::new();

    // framework 1 = React, variant 2 = react-desktop
    let output = sandbox.run(&["picked", "-t"], "1\n2\n");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let out = stdout(&output);
    assert!(out.contains("Select a framework:"));
    assert!(out.contains("Select a project template:"));
    assert_eq!(manifest_name(&sandbox.work().join("picked")), "picked");
}

#[test]
fn remote_template_is_cloned_with_git_fetch() {
    let sandbox = Sandbox::new();
    let remotes = sandbox.root.path().join("remotes");
    let origin = remotes.join("binghuis").join("template-react-desktop");
    fs::create_dir_all(&origin).unwrap();
    fs::write(
        origin.join("package.json"),
        "{\n  \"name\": \"upstream\",\n  \"version\": \"3.1.0\"\n}\n",
    )
    .unwrap();
    init_repo(&origin);
    sandbox.write_config(serde_json::json!({
        "fetch": "git",
        "git_base_url": format!("file://{}", remotes.display()),
    }));

    let output = sandbox.run(&["admin", "-t", "react-admin"], "");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let target = sandbox.work().join("admin");
    assert_eq!(manifest_name(&target), "admin");
    assert!(!target.join(".git").exists());
    assert!(fs::read_to_string(target.join("package.json"))
        .unwrap()
        .contains("\"version\": \"0.0.1\""));
}

#[test]
fn failed_fetch_reports_error_and_exit_code() {
    let sandbox = Sandbox::new();
    sandbox.write_config(serde_json::json!({
        "fetch": "git",
        "git_base_url": format!("file://{}/missing", sandbox.root.path().display()),
    }));

    let output = sandbox.run(&["admin", "-t", "react-admin"], "");

    assert_eq!(output.status.code(), Some(20));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error [git.command_failed]"));
}

#[test]
fn list_prints_offered_templates() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["--list"], "");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("react-desktop"));
    assert!(out.contains("nextjs-app"));
    assert!(!out.contains("vue-big-screen"));
    assert!(!out.contains("astro-docs"));
}
