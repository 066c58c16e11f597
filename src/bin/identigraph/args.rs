use anyhow::{Context, Result};
use clap::{crate_description, crate_version, ArgAction, Args, Parser, ValueEnum};
use std::path::PathBuf;

use identigraph::defaults::{DEFAULT_GITHUB_API_URL, DEFAULT_SYSTEM_EMAILS};
use identigraph::git_url::GitUrl;

// -----------------------------------------------------------------------------
// command-line args
// -----------------------------------------------------------------------------
#[derive(Parser, Debug)]
#[command(
    author,   // retrieved from Cargo.toml `authors`
    version,  // retrieved from Cargo.toml `version`
    about,    // retrieved from Cargo.toml `description`

    long_version = concat!(
        crate_version!(),
    ),

    long_about = concat!(
        crate_description!(),
    ),
)]
#[deny(missing_docs)]
/// Map the identities behind the commits of Git repositories
///
/// The author and committer of every commit in the given repositories are collected into
/// identities. Identities that appear together on a commit are reported as aliases of each other,
/// and names that were used with exactly the same set of email addresses are reported as the same
/// person.
///
/// The `git` binary on the PATH is used to read history and to clone any remote repositories.
/// It is invoked so as to avoid using any system-wide or user-specific configuration.
pub struct CommandLineArgs {
    #[command(flatten)]
    pub input_args: InputArgs,

    #[command(flatten)]
    pub verify_args: VerifyArgs,

    #[command(flatten)]
    pub output_args: OutputArgs,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

impl CommandLineArgs {
    pub fn parse_args() -> Self {
        let mut s = Self::parse();

        // If `NO_COLOR` is set in the environment, disable colored output
        //
        // https://no-color.org/
        if std::env::var("NO_COLOR").is_ok() {
            s.global_args.color = Mode::Never
        }

        s
    }
}

// -----------------------------------------------------------------------------
// global options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Global Options")]
pub struct GlobalArgs {
    /// Enable verbose output
    ///
    /// This can be repeated up to 3 times to enable successively more output.
    #[arg(global=true, long, short, action=ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    ///
    /// This is equivalent to `-vv`.
    #[arg(global = true, long)]
    pub debug: bool,

    /// Enable or disable colored output
    ///
    /// When this is "auto", colors are enabled when stdout is a tty.
    ///
    /// If the `NO_COLOR` environment variable is set, it takes precedence and is equivalent to `--color=never`.
    #[arg(global=true, long, default_value_t=Mode::Auto, value_name="MODE")]
    pub color: Mode,

    /// Enable or disable progress bars
    ///
    /// When this is "auto", progress bars are enabled when stderr is a tty.
    #[arg(global=true, long, default_value_t=Mode::Auto, value_name="MODE")]
    pub progress: Mode,
}

impl GlobalArgs {
    pub fn use_color(&self) -> bool {
        match self.color {
            Mode::Never => false,
            Mode::Always => true,
            Mode::Auto => atty::is(atty::Stream::Stdout),
        }
    }

    pub fn use_progress(&self) -> bool {
        match self.progress {
            Mode::Never => false,
            Mode::Always => true,
            Mode::Auto => atty::is(atty::Stream::Stderr),
        }
    }

    /// The effective verbosity: the number of `-v` flags, raised to 2 by `--debug`.
    pub fn verbosity(&self) -> u8 {
        if self.debug {
            self.verbose.max(2)
        } else {
            self.verbose
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Mode {
    Auto,
    Never,
    Always,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mode::Auto => "auto",
            Mode::Never => "never",
            Mode::Always => "always",
        };
        write!(f, "{s}")
    }
}

// -----------------------------------------------------------------------------
// input options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Input Specifier Options")]
pub struct InputArgs {
    /// Path to a local Git repository to analyze
    ///
    /// This option can be repeated.
    #[arg(long, short, value_name = "PATH", display_order = 1)]
    pub dir: Vec<PathBuf>,

    /// Also analyze every Git repository found beneath each `--dir`
    ///
    /// A directory is considered a repository when its name ends in `.git`.
    #[arg(long, short, display_order = 2)]
    pub recursive: bool,

    /// URL of a Git repository to clone and analyze
    ///
    /// Only https, http, ssh, and git URLs without credentials, query parameters, or fragment
    /// identifiers are supported. This option can be repeated.
    #[arg(long, short, value_name = "URL", display_order = 10)]
    pub url: Vec<GitUrl>,

    /// Name of a GitHub user or organization whose public repositories to clone and analyze
    #[arg(long, value_name = "NAME", display_order = 20)]
    pub nickname: Option<String>,

    /// Include forks when enumerating the repositories of `--nickname`
    #[arg(long, display_order = 21)]
    pub include_forks: bool,

    /// Use the specified URL for GitHub API access
    #[arg(
        long,
        value_name = "URL",
        env = "IDENTIGRAPH_GITHUB_API_URL",
        default_value = DEFAULT_GITHUB_API_URL,
        display_order = 22,
    )]
    pub github_api_url: String,
}

impl InputArgs {
    pub fn is_empty(&self) -> bool {
        self.dir.is_empty() && self.url.is_empty() && self.nickname.is_none()
    }
}

// -----------------------------------------------------------------------------
// verification options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Verification Options")]
pub struct VerifyArgs {
    /// Look up the GitHub account behind each identity
    ///
    /// For each identity from a repository hosted on GitHub, the web page of a commit it appears
    /// in is fetched and the account it links to is recorded.
    #[arg(long)]
    pub github: bool,

    /// Never look up identities with this email address
    ///
    /// This option can be repeated.
    #[arg(long, value_name = "EMAIL", default_values_t = DEFAULT_SYSTEM_EMAILS.iter().map(|s| s.to_string()))]
    pub system_email: Vec<String>,
}

// -----------------------------------------------------------------------------
// output options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Output Options")]
pub struct OutputArgs {
    /// Write output to the specified path
    ///
    /// If this argument is not provided, stdout will be used.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write output in the specified format
    #[arg(long, short, value_name="FORMAT", default_value_t=OutputFormat::Human)]
    pub format: OutputFormat,
}

impl OutputArgs {
    /// Get a writer for the specified output destination.
    pub fn get_writer(&self) -> std::io::Result<Box<dyn std::io::Write>> {
        use std::fs::File;
        use std::io::BufWriter;

        match &self.output {
            None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
            Some(p) => {
                let f = File::create(p)?;
                Ok(Box::new(BufWriter::new(f)))
            }
        }
    }
}

// -----------------------------------------------------------------------------
// output format
// -----------------------------------------------------------------------------
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    /// A text-based format designed for humans
    Human,

    /// Pretty-printed JSON format
    Json,

    /// JSON Lines format
    ///
    /// This is a sequence of JSON objects, one identity per line.
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        };
        write!(f, "{s}")
    }
}

// -----------------------------------------------------------------------------
// report writer
// -----------------------------------------------------------------------------
pub trait Reportable {
    fn human_format<W: std::io::Write>(&self, writer: W) -> Result<()>;
    fn json_format<W: std::io::Write>(&self, writer: W) -> Result<()>;
    fn jsonl_format<W: std::io::Write>(&self, writer: W) -> Result<()>;

    fn report(&self, output_args: &OutputArgs) -> Result<()> {
        let writer = output_args
            .get_writer()
            .context("Failed to open output destination for writing")?;

        let result = match &output_args.format {
            OutputFormat::Human => self.human_format(writer),
            OutputFormat::Json => self.json_format(writer),
            OutputFormat::Jsonl => self.jsonl_format(writer),
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) => match e.downcast_ref::<std::io::Error>() {
                // Ignore SIGPIPE errors, like those that can come from piping to `head`
                Some(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                _ => Err(e)?,
            },
        }
    }
}
