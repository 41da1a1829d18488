use std::fmt;

use crate::types::{Repo, RepoError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Remote operations issued against the forge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetPullRequest,
    ListPullRequests,
    CreateComment,
    ClosePullRequest,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            Operation::GetPullRequest => "fetch pull request",
            Operation::ListPullRequests => "list open pull requests",
            Operation::CreateComment => "comment on pull request",
            Operation::ClosePullRequest => "close pull request",
        };
        f.write_str(what)
    }
}

/// Everything that can end a run unsuccessfully.
///
/// Nothing is recovered locally: each variant unwinds to the binary, which
/// reports its `Display` text as the failure message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    #[error("Invalid API URL '{input}': {source}")]
    ApiUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to obtain GitHub authentication token: {0:#}")]
    Authentication(#[source] anyhow::Error),

    #[error("Failed to create GitHub client: {0:#}")]
    Client(#[source] anyhow::Error),

    #[error("Pull request #{number} not found in {repo}")]
    PullRequestNotFound { repo: Repo, number: u64 },

    /// `message` is a one-line summary of `source`, which keeps the full
    /// detail (including any backtrace) for debug output.
    #[error("Failed to {operation}{}: {message}", number_suffix(.number))]
    Remote {
        operation: Operation,
        number: Option<u64>,
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write step output '{name}': {source}")]
    Output {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Cli(#[from] clap::Error),
}

fn number_suffix(number: &Option<u64>) -> String {
    number.map(|n| format!(" #{n}")).unwrap_or_default()
}

/// Drops the backtrace octocrab's transport errors append to their
/// `Display` output.
fn strip_backtrace(message: &str) -> &str {
    let end = message.find("\nFound at").unwrap_or(message.len());
    message[..end].trim_end()
}

/// One-line description of a remote failure.
///
/// API errors reported by GitHub use the response's `message`. Anything
/// else is the error chain with backtraces removed.
fn brief_message(source: &anyhow::Error) -> String {
    if let Some(octocrab::Error::GitHub { source, .. }) = source.downcast_ref::<octocrab::Error>() {
        return source.message.clone();
    }

    let mut parts: Vec<String> = Vec::new();
    for cause in source.chain() {
        let text = cause.to_string();
        let text = strip_backtrace(&text);
        if text.is_empty() || parts.last().is_some_and(|prev| prev.ends_with(text)) {
            continue;
        }
        parts.push(text.to_string());
    }
    parts.join(": ")
}

impl Error {
    pub fn remote(
        operation: Operation,
        number: Option<u64>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        let source = source.into();
        Error::Remote {
            operation,
            number,
            message: brief_message(&source),
            source,
        }
    }

    /// True for errors caused by the supplied inputs rather than the remote
    /// side. These fail before any request is issued.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Repository(_) | Error::MissingInput(_) | Error::ApiUrl { .. } | Error::Cli(_)
        )
    }
}
