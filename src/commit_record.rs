use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

lazy_static! {
    /// One line of `git log` output, as produced by `defaults::LOG_PRETTY_FORMAT`.
    static ref LOG_LINE_PATTERN: Regex = Regex::new(r#"^(\w+);"(.*?)";"(.*?)"$"#)
        .expect("log line regex should compile");

    // The name is everything up to the last run of whitespace; the email is the trailing token.
    static ref NAME_EMAIL_PATTERN: Regex = Regex::new(r"^(.+?)\s+(\S+)$")
        .expect("name/email regex should compile");
}

// -------------------------------------------------------------------------------------------------
// ParseError
// -------------------------------------------------------------------------------------------------
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("could not extract commit info from {0:?}")]
    MalformedLine(String),
}

// -------------------------------------------------------------------------------------------------
// Role
// -------------------------------------------------------------------------------------------------
/// The slot of a commit in which an identity appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Author,
    Committer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Author => "author",
            Role::Committer => "committer",
        };
        write!(f, "{s}")
    }
}

// -------------------------------------------------------------------------------------------------
// CommitRecord
// -------------------------------------------------------------------------------------------------
/// The author and committer information of a single commit, extracted from one log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub hash: String,

    /// The author as it appeared in the log, i.e., `"<name> <email>"`
    pub author: String,

    /// The committer as it appeared in the log, i.e., `"<name> <email>"`
    pub committer: String,

    pub author_name: String,
    pub author_email: String,
    pub committer_name: String,
    pub committer_email: String,

    /// Are the raw author and committer strings identical?
    pub roles_match: bool,
}

impl CommitRecord {
    /// Parse a record from a line in the `hash;"author";"committer"` format.
    ///
    /// A line that doesn't have that overall shape is an error.
    /// An author or committer that can't be split into a name and email is not: it is logged and
    /// recorded with an empty name and email.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let captures = LOG_LINE_PATTERN
            .captures(line)
            .ok_or_else(|| ParseError::MalformedLine(line.to_string()))?;

        let hash = captures[1].to_string();
        let author = captures[2].to_string();
        let committer = captures[3].to_string();

        let (author_name, author_email) = split_name_email(&author);
        let (committer_name, committer_email) = split_name_email(&committer);

        let roles_match = author == committer;

        Ok(CommitRecord {
            hash,
            author,
            committer,
            author_name,
            author_email,
            committer_name,
            committer_email,
            roles_match,
        })
    }

    /// The raw `"<name> <email>"` string for the given role.
    pub fn raw(&self, role: Role) -> &str {
        match role {
            Role::Author => &self.author,
            Role::Committer => &self.committer,
        }
    }

    pub fn name(&self, role: Role) -> &str {
        match role {
            Role::Author => &self.author_name,
            Role::Committer => &self.committer_name,
        }
    }

    pub fn email(&self, role: Role) -> &str {
        match role {
            Role::Author => &self.author_email,
            Role::Committer => &self.committer_email,
        }
    }
}

/// Split a raw `"<name> <email>"` string, falling back to empty strings.
fn split_name_email(raw: &str) -> (String, String) {
    match NAME_EMAIL_PATTERN.captures(raw) {
        Some(captures) => (captures[1].to_string(), captures[2].to_string()),
        None => {
            warn!("Could not extract name/email from {raw:?}");
            (String::new(), String::new())
        }
    }
}
