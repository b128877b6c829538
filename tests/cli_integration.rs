//! CLI integration tests for juce-build.
//!
//! Each test builds a synthetic module tree and project in a temporary
//! directory and runs the binary against it with `--platform linux`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the juce-build binary command, isolated from the user's config.
fn juce_build(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("juce-build").unwrap();
    cmd.env("HOME", home)
        .env_remove("JUCE_MODULE_PATH")
        .args(["--platform", "linux"]);
    cmd
}

/// Write a module with a descriptor and a unity source.
fn write_module(root: &Path, id: &str, deps: &[&str], linux_libs: &str) -> PathBuf {
    let dir = root.join(id);
    fs::create_dir_all(&dir).unwrap();
    let deps: Vec<String> = deps
        .iter()
        .map(|d| format!(r#"{{ "id": "{}", "version": "matching" }}"#, d))
        .collect();
    let json = format!(
        r#"{{
  "id": "{id}",
  "name": "JUCE {id} classes",
  "version": "3.0.8",
  "description": "Test module",
  "license": "GPL/Commercial",
  "dependencies": [{deps}],
  "LinuxLibs": "{libs}",
  "compile": [
    {{ "file": "{id}.cpp", "target": "! xcode" }},
    {{ "file": "{id}.mm", "target": "xcode" }}
  ]
}}"#,
        id = id,
        deps = deps.join(", "),
        libs = linux_libs
    );
    fs::write(dir.join("juce_module_info"), json).unwrap();
    fs::write(dir.join(format!("{}.cpp", id)), "").unwrap();
    fs::write(dir.join(format!("{}.mm", id)), "").unwrap();
    dir
}

/// A module root with juce_core <- juce_events.
fn module_root(tmp: &TempDir) -> PathBuf {
    let root = tmp.path().join("modules");
    write_module(&root, "juce_core", &[], "rt dl");
    write_module(&root, "juce_events", &["juce_core"], "");
    root
}

fn write_project(dir: &Path) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join("Demo.jucer");
    fs::write(
        &path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<JUCERPROJECT id="x1" name="Demo" projectType="guiapp" version="1.2.0"
              bundleIdentifier="com.example.demo" jucerVersion="3.1.0">
  <MAINGROUP id="m" name="Demo">
    <GROUP id="g" name="Source">
      <FILE id="a" name="Main.cpp" compile="1" resource="0" file="Source/Main.cpp"/>
      <FILE id="b" name="Main.h" compile="0" resource="0" file="Source/Main.h"/>
    </GROUP>
  </MAINGROUP>
  <MODULES>
    <MODULES id="juce_core" showAllCode="1"/>
    <MODULE id="juce_events" showAllCode="1"/>
  </MODULES>
  <EXPORTFORMATS>
    <LINUX_MAKE targetFolder="Builds/Linux">
      <CONFIGURATIONS>
        <CONFIGURATION name="Debug" isDebug="1" targetName="DemoDebug"/>
        <CONFIGURATION name="Release" isDebug="0" targetName=""/>
      </CONFIGURATIONS>
      <MODULEPATHS>
        <MODULEPATH id="juce_core" path="../modules"/>
        <MODULEPATH id="juce_events" path="../modules"/>
      </MODULEPATHS>
    </LINUX_MAKE>
  </EXPORTFORMATS>
</JUCERPROJECT>
"#,
    )
    .unwrap();
    path
}

fn plan_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

// ============================================================================
// juce-build configure
// ============================================================================

#[test]
fn test_configure_reports_version() {
    let tmp = TempDir::new().unwrap();
    let root = module_root(&tmp);

    juce_build(tmp.path())
        .arg("--module-path")
        .arg(&root)
        .arg("configure")
        .assert()
        .success()
        .stdout(predicate::str::contains("platform:     linux"))
        .stdout(predicate::str::contains("juce version: 3.0.8"))
        .stdout(predicate::str::contains("-DNDEBUG=1"));
}

#[test]
fn test_configure_debug_flags() {
    let tmp = TempDir::new().unwrap();

    juce_build(tmp.path())
        .arg("--module-path")
        .arg(tmp.path().join("missing"))
        .args(["--debug", "configure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("juce version: not found"))
        .stdout(predicate::str::contains("-g -ggdb -O0"));
}

#[test]
fn test_unsupported_platform_fails() {
    let tmp = TempDir::new().unwrap();

    Command::cargo_bin("juce-build")
        .unwrap()
        .env("HOME", tmp.path())
        .args(["--platform", "plan9", "configure"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported platform `plan9`"));
}

#[test]
fn test_config_file_supplies_module_path() {
    let tmp = TempDir::new().unwrap();
    let root = module_root(&tmp);
    let work = tmp.path().join("work");
    fs::create_dir_all(work.join(".juce-build")).unwrap();
    fs::write(
        work.join(".juce-build/config.toml"),
        format!("[juce]\nmodule_path = {:?}\n", root.to_string_lossy()),
    )
    .unwrap();

    juce_build(tmp.path())
        .current_dir(&work)
        .arg("modules")
        .assert()
        .success()
        .stdout(predicate::str::contains("juce_core"))
        .stdout(predicate::str::contains("(needs juce_core)"));
}

// ============================================================================
// juce-build modules / info
// ============================================================================

#[test]
fn test_modules_missing_root_fails() {
    let tmp = TempDir::new().unwrap();

    juce_build(tmp.path())
        .arg("--module-path")
        .arg(tmp.path().join("nope"))
        .arg("modules")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_info_shows_closure_and_flags() {
    let tmp = TempDir::new().unwrap();
    let root = module_root(&tmp);

    juce_build(tmp.path())
        .arg("--module-path")
        .arg(&root)
        .args(["info", "juce_events"])
        .assert()
        .success()
        .stdout(predicate::str::contains("juce_events (descriptor)"))
        .stdout(predicate::str::contains("closure:      juce_core juce_events"))
        .stdout(predicate::str::contains("use:          juce-core-3"));
}

#[test]
fn test_info_falls_back_to_tables() {
    let tmp = TempDir::new().unwrap();

    juce_build(tmp.path())
        .arg("--module-path")
        .arg(tmp.path())
        .args(["info", "juce_gui_extra"])
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in table"))
        .stdout(predicate::str::contains("unity source: not found"));
}

// ============================================================================
// juce-build project
// ============================================================================

#[test]
fn test_project_summary() {
    let tmp = TempDir::new().unwrap();
    module_root(&tmp);
    let project = write_project(&tmp.path().join("Demo"));

    juce_build(tmp.path())
        .arg("project")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo 1.2.0 (guiapp)"))
        .stdout(predicate::str::contains("modules:        juce_core juce_events"))
        .stdout(predicate::str::contains("target:         DemoDebug"))
        .stdout(predicate::str::contains("juce_core.cpp"))
        .stdout(predicate::str::contains("juce_core.mm").not());
}

#[test]
fn test_project_not_a_jucer_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("other.xml");
    fs::write(&path, "<PLIST/>").unwrap();

    juce_build(tmp.path())
        .arg("project")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a project file"))
        .stderr(predicate::str::contains("code: juce_build::project::not_a_project"));
}

// ============================================================================
// juce-build plan
// ============================================================================

#[test]
fn test_plan_modular() {
    let tmp = TempDir::new().unwrap();
    let root = module_root(&tmp);

    let output = juce_build(tmp.path())
        .arg("--module-path")
        .arg(&root)
        .args(["plan", "modular", "--vnum", "3.0.8"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan = plan_json(&output.stdout);
    let targets = plan["targets"].as_array().unwrap();
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0]["name"], "juce-core-3");
    assert_eq!(targets[0]["target"], "juce_core-3");
    assert_eq!(targets[0]["linkflags"], serde_json::json!(["-lrt", "-ldl"]));
    assert_eq!(targets[1]["use"], serde_json::json!(["juce-core-3"]));
    assert_eq!(targets[1]["vnum"], "3.0.8");
}

#[test]
fn test_plan_modular_bad_vnum() {
    let tmp = TempDir::new().unwrap();
    let root = module_root(&tmp);

    juce_build(tmp.path())
        .arg("--module-path")
        .arg(&root)
        .args(["plan", "modular", "juce_core", "--vnum", "three"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid library version"));
}

#[test]
fn test_plan_unified() {
    let tmp = TempDir::new().unwrap();
    let root = module_root(&tmp);

    let output = juce_build(tmp.path())
        .arg("--module-path")
        .arg(&root)
        .args(["plan", "unified", "--name", "juce", "juce_core", "juce_events"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan = plan_json(&output.stdout);
    let target = &plan["targets"][0];
    assert_eq!(target["features"], "cxx cxxshlib");
    assert_eq!(target["source"].as_array().unwrap().len(), 2);
}

#[test]
fn test_plan_project() {
    let tmp = TempDir::new().unwrap();
    let root = module_root(&tmp);
    let project_dir = tmp.path().join("Demo");
    let project = write_project(&project_dir);

    let output = juce_build(tmp.path())
        .arg("plan")
        .arg("project")
        .arg(&project)
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan = plan_json(&output.stdout);
    let target = &plan["targets"][0];
    assert_eq!(target["features"], "cxx cxxprogram");
    assert_eq!(target["target"], "DemoDebug");
    let sources: Vec<PathBuf> = target["source"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| PathBuf::from(s.as_str().unwrap()))
        .collect();
    assert_eq!(
        sources,
        vec![
            project_dir.join("Source/Main.cpp"),
            root.join("juce_core/juce_core.cpp"),
            root.join("juce_events/juce_events.cpp"),
        ]
    );
    assert_eq!(target["linkflags"], serde_json::json!(["-lrt", "-ldl"]));
}

#[test]
fn test_plan_project_uses_config_module_path() {
    let tmp = TempDir::new().unwrap();
    let root = module_root(&tmp);
    // The exporter's `../modules` does not exist from here.
    let work = tmp.path().join("apps");
    let project = write_project(&work.join("Demo"));
    fs::create_dir_all(work.join(".juce-build")).unwrap();
    fs::write(
        work.join(".juce-build/config.toml"),
        format!("[juce]\nmodule_path = {:?}\n", root.to_string_lossy()),
    )
    .unwrap();

    let output = juce_build(tmp.path())
        .current_dir(&work)
        .arg("plan")
        .arg("project")
        .arg(&project)
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan = plan_json(&output.stdout);
    let sources = plan["targets"][0]["source"].as_array().unwrap();
    assert_eq!(sources.len(), 3);
    assert_eq!(
        PathBuf::from(sources[1].as_str().unwrap()),
        root.join("juce_core/juce_core.cpp")
    );
}

#[test]
fn test_plan_project_release_without_module_code() {
    let tmp = TempDir::new().unwrap();
    module_root(&tmp);
    let project = write_project(&tmp.path().join("Demo"));

    let output = juce_build(tmp.path())
        .arg("plan")
        .arg("project")
        .arg(&project)
        .args(["--no-module-code", "--config", "Release"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan = plan_json(&output.stdout);
    let target = &plan["targets"][0];
    assert_eq!(target["target"], "a.out");
    assert_eq!(target["source"].as_array().unwrap().len(), 1);
}

// ============================================================================
// juce-build completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();

    juce_build(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("juce-build"));
}
