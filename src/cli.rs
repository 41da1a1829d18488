use clap::Parser;
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::{Error, Result},
    github::{DEFAULT_API_URL, parse_api_url},
    types::{AccessToken, CloseSpec, Repo, Selection},
};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

// Every input can also come from the environment variable the Actions runner
// sets for it. Values are trimmed, and the empty strings the runner passes
// for unset inputs are treated as absent.
#[derive(Parser, Debug)]
#[command(
    name = "close-fork-prs",
    about = "Close pull requests opened from forks, optionally leaving a comment first"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// Token used to authenticate GitHub API requests (falls back to GITHUB_TOKEN, GH_TOKEN, then `gh auth token`)
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Target repository in format 'owner/name'
    #[arg(long, env = "INPUT_REPOSITORY", value_name = "OWNER/NAME")]
    pub repository: Option<String>,

    /// Comment posted on each fork pull request before it is closed
    #[arg(long, env = "INPUT_COMMENT", value_name = "TEXT")]
    pub comment: Option<String>,

    /// Only consider this pull request (a positive integer); otherwise every open pull request
    #[arg(long = "pr-number", env = "INPUT_PR-NUMBER", value_name = "NUM")]
    pub pr_number: Option<String>,

    /// GitHub API base URL
    #[arg(long = "api-url", env = "GITHUB_API_URL", value_name = "URL")]
    pub api_url: Option<String>,
}

/// Inputs resolved into the shapes the run needs.
#[derive(Debug)]
pub struct Config {
    /// Token given as input, if any. See [`crate::github::resolve_token`].
    pub token: Option<AccessToken>,
    pub api_url: Url,
    pub spec: CloseSpec,
}

/// Trims surrounding whitespace; blank values become `None`.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Interprets the pull request number input.
///
/// A positive integer selects that pull request. Anything else, including
/// an absent or empty value, selects every open pull request.
pub fn parse_selection(raw: Option<&str>) -> Selection {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Selection::AllOpen;
    };

    match raw.parse::<u64>() {
        Ok(number) if number > 0 => Selection::Single(number),
        _ => {
            warn!(
                "Ignoring pr-number '{raw}': not a positive integer, processing all open pull requests"
            );
            Selection::AllOpen
        }
    }
}

impl CliArgs {
    fn into_config(self) -> Result<Config> {
        let repository = non_empty(self.repository).ok_or(Error::MissingInput("repository"))?;
        let repo = Repo::parse(&repository)?;
        debug!("Repo: {repo}");

        let api_url = parse_api_url(
            non_empty(self.api_url)
                .as_deref()
                .unwrap_or(DEFAULT_API_URL),
        )?;

        let spec = CloseSpec::new(
            repo,
            non_empty(self.comment),
            parse_selection(self.pr_number.as_deref()),
        );

        Ok(Config {
            token: self.token.and_then(AccessToken::new),
            api_url,
            spec,
        })
    }
}

/// Parses command-line arguments (and their environment fallbacks) into a
/// [`Config`].
///
/// Fails before any remote call when the repository is missing or is not of
/// the form `owner/name`.
pub fn parse_args<I, T>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    let config = cli.into_config()?;
    debug!("Inputs: {config:?}");
    Ok(config)
}
