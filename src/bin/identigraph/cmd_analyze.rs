use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, debug_span, info};

use crate::args;

use identigraph::analysis::Analysis;
use identigraph::git_binary::Git;
use identigraph::git_url::GitUrl;
use identigraph::github;
use identigraph::input_enumerator::find_git_repos;
use identigraph::name_emails::ExactEmailSet;
use identigraph::progress::Progress;
use identigraph::report::{Report, Styles};
use identigraph::verifier::{verify_identities, CommitPageVerifier, SystemEmails};

const USAGE_HINT: &str =
    "Nothing to analyze: specify a repository with --dir, --url, or --nickname (see --help)";

/// A repository to analyze.
#[derive(Debug)]
enum Source {
    Local(PathBuf),
    Remote(GitUrl),
}

impl Source {
    /// How the source is named in the report and in identity sightings.
    fn label(&self) -> String {
        match self {
            Source::Local(path) => path.display().to_string(),
            Source::Remote(url) => url.web_url(),
        }
    }
}

/// Strip trailing slashes from a directory argument, leaving a bare `/` alone.
fn trim_dir(dir: &Path) -> PathBuf {
    let s = dir.to_string_lossy();
    let trimmed = s.trim_end_matches('/');
    if trimmed.is_empty() {
        dir.to_path_buf()
    } else {
        PathBuf::from(trimmed)
    }
}

/// Repositories beneath `dir`, other than `dir`'s own `.git` directory, which is already a source.
fn nested_repos(dir: &Path) -> Vec<PathBuf> {
    let own_git_dir = dir.join(".git");
    find_git_repos(dir)
        .into_iter()
        .filter(|repo| *repo != own_git_dir)
        .collect()
}

pub fn run(global_args: &args::GlobalArgs, args: &args::CommandLineArgs) -> Result<()> {
    let _span = debug_span!("analyze").entered();

    debug!("Args: {args:#?}");

    let input_args = &args.input_args;
    if input_args.is_empty() {
        println!("{USAGE_HINT}");
        return Ok(());
    }

    let progress_enabled = global_args.use_progress();

    // ---------------------------------------------------------------------------------------------
    // Gather sources: remote URLs, then directories, then repositories of the nickname
    // ---------------------------------------------------------------------------------------------
    let mut sources: Vec<Source> = input_args.url.iter().cloned().map(Source::Remote).collect();

    for dir in input_args.dir.iter() {
        sources.push(Source::Local(trim_dir(dir)));
        if input_args.recursive {
            sources.extend(nested_repos(dir).into_iter().map(Source::Local));
        }
    }

    if let Some(nickname) = &input_args.nickname {
        let repo_type = if input_args.include_forks {
            github::RepoType::All
        } else {
            github::RepoType::Source
        };
        let repo_urls =
            match github::enumerate_repo_urls(&input_args.github_api_url, nickname, repo_type) {
                Ok(repo_urls) => repo_urls,
                Err(e) => {
                    debug!("Failed to enumerate repositories of {nickname}: {e:#}");
                    Vec::new()
                }
            };
        for repo_string in repo_urls {
            match GitUrl::from_str(&repo_string) {
                Ok(repo_url) => sources.push(Source::Remote(repo_url)),
                Err(e) => debug!("Failed to parse repo URL from {repo_string}: {e}"),
            }
        }
    }

    info!("{} repositories to analyze", sources.len());

    // ---------------------------------------------------------------------------------------------
    // Read the history of every source
    // ---------------------------------------------------------------------------------------------
    let clones_dir = tempfile::Builder::new()
        .prefix("identigraph-clones-")
        .tempdir()
        .context("Failed to create temporary directory for clones")?;
    let git = Git::new();
    let mut analysis = Analysis::new();

    let progress =
        Progress::new_bar(sources.len() as u64, "Analyzing repositories", progress_enabled);
    for source in sources.iter() {
        let label = source.label();
        analysis.add_source(&label);

        let repo_dir = match source {
            Source::Local(path) => path.clone(),
            Source::Remote(repo_url) => {
                let output_dir = clones_dir.path().join(repo_url.to_path_buf());
                progress.suspend(|| info!("Cloning {repo_url}..."));
                if let Err(e) = git.create_fresh_clone(repo_url, &output_dir) {
                    debug!("Failed to clone {repo_url}: {e}");
                    progress.inc(1);
                    continue;
                }
                output_dir
            }
        };

        match git.log(&repo_dir) {
            Ok(log_text) => {
                let stats = analysis.ingest_log(&label, &log_text);
                progress.suspend(|| {
                    info!("{label}: {} commits, {} identities so far", stats.records, analysis.registry.len())
                });
            }
            Err(e) => debug!("Failed to read history of {label}: {e}"),
        }
        progress.inc(1);
    }
    progress.finish_with_message(format!(
        "Analyzed {} repositories: {} identities",
        sources.len(),
        analysis.registry.len()
    ));

    // ---------------------------------------------------------------------------------------------
    // Look up hosting accounts
    // ---------------------------------------------------------------------------------------------
    if args.verify_args.github {
        let system_emails = SystemEmails::new(args.verify_args.system_email.iter().cloned());
        let num_candidates = analysis
            .registry
            .iter()
            .filter(|(_, identity)| identity.last_seen.is_some() && !system_emails.contains(&identity.email))
            .count();

        let client = github::Client::new().context("Failed to initialize GitHub client")?;
        let verifier = Arc::new(CommitPageVerifier::new(client));
        let progress =
            Progress::new_bar(num_candidates as u64, "Resolving GitHub accounts", progress_enabled);
        let num_verified =
            verify_identities(&mut analysis.registry, verifier, &system_emails, &progress)?;
        progress.finish_with_message(format!(
            "Resolved GitHub accounts for {num_verified} of {num_candidates} identities"
        ));
    }

    // ---------------------------------------------------------------------------------------------
    // Report
    // ---------------------------------------------------------------------------------------------
    let reporter = IdentityReporter {
        report: Report::new(&analysis, &ExactEmailSet),
        styles: Styles::new(global_args.use_color()),
    };
    args::Reportable::report(&reporter, &args.output_args)
}

struct IdentityReporter<'a> {
    report: Report<'a>,
    styles: Styles,
}

impl<'a> args::Reportable for IdentityReporter<'a> {
    fn human_format<W: Write>(&self, mut writer: W) -> Result<()> {
        self.report.write_human(&mut writer, &self.styles)?;
        writer.flush()?;
        Ok(())
    }

    fn json_format<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, &self.report)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    fn jsonl_format<W: Write>(&self, mut writer: W) -> Result<()> {
        for identity in self.report.identities.iter() {
            serde_json::to_writer(&mut writer, identity)?;
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}
