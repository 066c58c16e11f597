use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, debug_span};

use crate::defaults::LOG_PRETTY_FORMAT;
use crate::git_url::GitUrl;

#[derive(Debug)]
pub enum GitError {
    IOError(std::io::Error),
    GitError {
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        status: ExitStatus,
    },
}

impl From<std::io::Error> for GitError {
    fn from(err: std::io::Error) -> GitError {
        GitError::IOError(err)
    }
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::IOError(e) => write!(f, "git execution failed: {e}"),
            GitError::GitError {
                stdout,
                stderr,
                status,
            } => write!(
                f,
                "git execution failed\ncode={status}\nstdout=```\n{}```\nstderr=```\n{}```",
                String::from_utf8_lossy(stdout),
                String::from_utf8_lossy(stderr)
            ),
        }
    }
}

impl std::error::Error for GitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GitError::IOError(e) => Some(e),
            GitError::GitError { .. } => None,
        }
    }
}

/// Runs the `git` binary found on the `PATH`.
///
/// Global and system-wide git configuration is ignored, and stdin is closed, so that git never
/// prompts.
#[derive(Debug, Default)]
pub struct Git {}

impl Git {
    pub fn new() -> Self {
        Self {}
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.env("GIT_CONFIG_GLOBAL", "/dev/null");
        cmd.env("GIT_CONFIG_NOSYSTEM", "1");
        cmd.env("GIT_CONFIG_SYSTEM", "/dev/null");
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.stdin(Stdio::null());
        cmd
    }

    fn run(mut cmd: Command) -> Result<Vec<u8>, GitError> {
        debug!("{cmd:#?}");
        let output = cmd.output()?;
        if !output.status.success() {
            return Err(GitError::GitError {
                stdout: output.stdout,
                stderr: output.stderr,
                status: output.status,
            });
        }
        Ok(output.stdout)
    }

    /// Get the author and committer of every commit reachable from any ref of the repository at
    /// `repo_dir`, one `hash;"author";"committer"` line per commit.
    pub fn log(&self, repo_dir: &Path) -> Result<String, GitError> {
        let _span = debug_span!("git_log", "{}", repo_dir.display()).entered();

        let mut cmd = self.git();
        cmd.arg("-C")
            .arg(repo_dir)
            .arg("log")
            .arg("--all")
            .arg(format!("--pretty={LOG_PRETTY_FORMAT}"));

        let stdout = Self::run(cmd)?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    /// Create a bare clone of `repo_url` at `output_dir`.
    pub fn create_fresh_clone(&self, repo_url: &GitUrl, output_dir: &Path) -> Result<(), GitError> {
        let _span = debug_span!("git_clone", "{repo_url} {}", output_dir.display()).entered();
        debug!("Attempting to create fresh clone of {} at {}", repo_url, output_dir.display());

        let mut cmd = self.git();
        cmd.arg("clone")
            .arg("--bare")
            .arg(repo_url.as_str())
            .arg(output_dir);

        Self::run(cmd)?;
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
// test
// -------------------------------------------------------------------------------------------------
#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn log_of_missing_repo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(Git::new().log(&missing).is_err());
    }

    #[test]
    fn io_error_display() {
        let err = GitError::IOError(std::io::Error::new(std::io::ErrorKind::NotFound, "no git"));
        assert_eq!(err.to_string(), "git execution failed: no git");
    }
}
