//! close-fork-prs: close pull requests opened from forked repositories.
//!
//! Fetches either a single pull request or every open one, picks out those
//! whose head branch belongs to someone other than the repository owner,
//! optionally comments on each and then closes it. Meant to run as a GitHub
//! Actions step, but works as a plain CLI too.

pub mod cli;
pub mod closer;
pub mod error;
pub mod github;
pub mod logging;
pub mod outputs;
pub mod types;

pub use cli::{Config, parse_args};
pub use closer::{close_fork_pull_requests, run_and_report};
pub use error::{Error, Operation, Result};
pub use github::{GitHub, resolve_token};
pub use outputs::{CLOSED_COUNT, OutputSink};
pub use types::{
    AccessToken, CloseReport, CloseSpec, Forge, PullRequest, Repo, RepoError, Selection,
};
