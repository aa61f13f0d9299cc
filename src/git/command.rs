use crate::error::{FameError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::trace;

/// Where per-file attribution text comes from.
pub trait AttributionSource: Sync {
    /// `git blame --porcelain` output for `path` at `revision`.
    fn blame(&self, revision: &str, path: &Path) -> Result<Vec<u8>>;

    /// Summary of the last commit touching `path` at `revision`, in
    /// `git log --format=fuller` layout.
    fn last_change(&self, revision: &str, path: &Path) -> Result<Vec<u8>>;
}

/// Runs the `git` executable inside a repository work tree.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Runs `git <args> -- <path>`.
    fn run(&self, args: &[&str], path: &Path) -> Result<Vec<u8>> {
        let command = format!("git {} -- {}", args.join(" "), path.display());
        trace!(%command, "running");

        let output = Command::new("git")
            .args(args)
            .arg("--")
            .arg(path)
            .current_dir(&self.root)
            .output()
            .map_err(|e| FameError::GitCommand {
                command: command.clone(),
                status: "not started".to_string(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(FameError::GitCommand {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl AttributionSource for GitCli {
    fn blame(&self, revision: &str, path: &Path) -> Result<Vec<u8>> {
        self.run(&["blame", "--porcelain", revision], path)
    }

    fn last_change(&self, revision: &str, path: &Path) -> Result<Vec<u8>> {
        self.run(&["log", "-1", "--format=fuller", revision], path)
    }
}
