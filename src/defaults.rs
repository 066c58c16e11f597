/// The `git log` pretty format that yields one `hash;"author";"committer"` line per commit.
pub const LOG_PRETTY_FORMAT: &str = r#"tformat:%H;"%an %ae";"%cn %ce""#;

/// Emails of accounts that the hosting platform itself commits as.
/// These are never sent for account verification.
pub const DEFAULT_SYSTEM_EMAILS: &[&str] = &["noreply@github.com"];

/// Only repositories under this prefix can have their commit pages checked for account names.
pub const GITHUB_HOST_PREFIX: &str = "https://github.com/";

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com/";

/// The header delimiter used in the human-readable report.
pub const REPORT_DELIMITER: &str = "---------------";
