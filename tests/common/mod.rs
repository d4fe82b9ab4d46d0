#![allow(dead_code)]

use assert_cmd::Command;
use std::io::Write;
use tempfile::TempDir;

/// A `bf` command isolated from the caller's BF_* variables and config file.
pub struct Bf {
    pub cmd: Command,
    pub home: TempDir,
}

pub fn bf() -> Bf {
    let home = tempfile::tempdir().expect("tempdir");
    let mut cmd = Command::cargo_bin("bf").expect("bf binary");
    for key in ["BF_MEMORY", "BF_SNAPX", "BF_SNAPY", "BF_IMAGE_WIDTH", "BF_OUTPUT_MODE", "NO_COLOR"] {
        cmd.env_remove(key);
    }
    cmd.env("HOME", home.path()).env("XDG_CONFIG_HOME", home.path().join(".config"));
    Bf { cmd, home }
}

impl Bf {
    /// Write `bf.toml` where the config loader will find it.
    pub fn with_config_file(mut self, content: &str) -> Self {
        let dir = self.home.path().join(".config");
        std::fs::create_dir_all(&dir).expect("config dir");
        let mut f = std::fs::File::create(dir.join("bf.toml")).expect("bf.toml");
        write!(f, "{}", content).unwrap();
        self.cmd.env("XDG_CONFIG_HOME", &dir);
        self
    }
}


pub fn bf_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::Builder::new().suffix(".bf").tempfile().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}
