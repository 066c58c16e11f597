//! Integration Test Utilities and Common Code

#![allow(dead_code)]

pub use assert_cmd::prelude::*;
pub use assert_fs::prelude::*;
pub use assert_fs::{fixture::ChildPath, TempDir};
pub use predicates::prelude::*;
pub use predicates::str::{contains, is_empty, RegexPredicate};
pub use pretty_assertions::{assert_eq, assert_ne};
pub use std::path::Path;
pub use std::process::Command;

/// Build a `Command` for the `identigraph` crate binary with variadic command-line arguments.
///
/// The arguments can be anything that is allowed by `Command::arg`.
#[macro_export]
macro_rules! identigraph {
    ( $( $arg:expr ),* ) => {
        {
            let mut cmd = identigraph_cmd();
            $(
                cmd.arg($arg);
            )*
            cmd
        }
    }
}

/// Build an `assert_cmd::assert::Assert` by calling `identigraph!(args).assert().success()`.
#[macro_export]
macro_rules! identigraph_success {
    ( $( $arg:expr ),* ) => { identigraph!($( $arg ),*).assert().success() }
}

/// Build an `assert_cmd::assert::Assert` by calling `identigraph!(args).assert().failure()`.
#[macro_export]
macro_rules! identigraph_failure {
    ( $( $arg:expr ),* ) => { identigraph!($( $arg ),*).assert().failure() }
}

// make macros easily visible to other modules
pub use {identigraph, identigraph_failure, identigraph_success};

/// Build a `Command` for the `identigraph` crate binary.
pub fn identigraph_cmd() -> Command {
    let mut cmd = Command::cargo_bin("identigraph").expect("identigraph should be executable");
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("IDENTIGRAPH_GITHUB_API_URL");
    cmd
}

/// Create a `RegexPredicate` from the given pattern.
pub fn is_match(pat: &str) -> RegexPredicate {
    predicates::str::is_match(pat).expect("pattern should compile")
}

/// Run `git` in `dir` without any user or system configuration, asserting that it succeeds.
pub fn git(dir: &Path, args: &[&str], env: &[(&str, &str)]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .envs(env.iter().copied())
        .status()
        .expect("git should be executable");
    assert!(status.success(), "git {args:?} should succeed");
}

/// The author or committer of a test commit.
#[derive(Clone, Copy)]
pub struct Who<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

pub const fn who<'a>(name: &'a str, email: &'a str) -> Who<'a> {
    Who { name, email }
}

/// A type to represent a mock environment of Git repositories for testing identigraph.
pub struct RepoEnv {
    pub root: TempDir,
}

impl RepoEnv {
    pub fn new() -> Self {
        let root = TempDir::new().expect("should be able to create tempdir");
        Self { root }
    }

    /// Create an empty Git repository with the given name.
    pub fn repo(&self, name: &str) -> ChildPath {
        let repo = self.root.child(name);
        repo.create_dir_all()
            .expect("should be able to create repository directory");
        git(repo.path(), &["init", "-q"], &[]);
        repo
    }

    /// Create a plain directory with the given name.
    pub fn dir(&self, name: &str) -> ChildPath {
        let dir = self.root.child(name);
        dir.create_dir_all().expect("should be able to create directory");
        dir
    }

    /// Add an empty commit with the given author and committer to the repository at `repo`.
    pub fn commit(&self, repo: &ChildPath, author: Who, committer: Who) {
        git(
            repo.path(),
            &["commit", "-q", "--allow-empty", "-m", "commit"],
            &[
                ("GIT_AUTHOR_NAME", author.name),
                ("GIT_AUTHOR_EMAIL", author.email),
                ("GIT_COMMITTER_NAME", committer.name),
                ("GIT_COMMITTER_EMAIL", committer.email),
            ],
        );
    }

    /// Add an empty commit whose author is also its committer.
    pub fn commit_as(&self, repo: &ChildPath, person: Who) {
        self.commit(repo, person, person);
    }
}
