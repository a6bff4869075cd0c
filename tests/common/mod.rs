#![allow(dead_code)]

use assert_cmd::cargo_bin;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const STOCKED: &str = "C1::Candy::2::0.85\nA1::Chips::5::2.50\nB1::Cola::0::1.75\n";

/// A scratch machine: an inventory file and an audit path in a temp dir.
pub struct Machine {
    pub dir: TempDir,
}

impl Machine {
    pub fn with_inventory(contents: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("inventory.txt"), contents).unwrap();
        Self { dir }
    }

    pub fn inventory(&self) -> PathBuf {
        self.dir.path().join("inventory.txt")
    }

    pub fn audit(&self) -> PathBuf {
        self.dir.path().join("audit.txt")
    }

    pub fn write_script(&self, contents: &str) -> PathBuf {
        let path = self.dir.path().join("script.csv");
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// `coinvend --inventory <..> --audit <..>` ready for a subcommand.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(cargo_bin!("coinvend"));
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .arg("--inventory")
            .arg(self.inventory())
            .arg("--audit")
            .arg(self.audit());
        cmd
    }

    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }
}
