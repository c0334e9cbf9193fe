//! Common test utilities for metastage integration tests.
//!
//! `TestEnv` gives each test an isolated working directory, a staging base
//! directory, and a fake HOME so user-level config never leaks in.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        fs::create_dir_all(dir.path().join("fake_home")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn base_dir(&self) -> PathBuf {
        self.dir.path().join("metadata-manager")
    }

    /// Write an entity descriptor file and return its path
    pub fn write_descriptor(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Run the metastage binary with the given args in this environment
    pub fn run(&self, args: &[&str]) -> Output {
        let bin = env!("CARGO_BIN_EXE_metastage");
        Command::new(bin)
            .current_dir(self.dir.path())
            .env("HOME", self.dir.path().join("fake_home"))
            .env("XDG_CONFIG_HOME", self.dir.path().join("fake_home/.config"))
            .env_remove("METASTAGE_ENVIRONMENT")
            .env_remove("METASTAGE_BASE_DIR")
            .env_remove("METASTAGE_OWNER")
            .args(args)
            .output()
            .expect("spawn metastage")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Parse the canonical staged file for an entity
pub fn read_staged(base: &Path, env: &str, type_dir: &str, id: &str) -> serde_json::Value {
    let path = base.join(env).join(type_dir).join(id).join("mcp_file.json");
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    serde_json::from_str(&content).expect("staged file is valid JSON")
}
