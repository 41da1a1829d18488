use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

/// Reasons a repository identifier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
    #[error("Repository must be in format 'owner/name', got: '{0}'")]
    MissingSeparator(String),
    #[error("Repository owner is empty in '{0}'")]
    EmptyOwner(String),
    #[error("Repository name is empty in '{0}'")]
    EmptyName(String),
    #[error("Repository name must not contain '/', got: '{0}'")]
    NestedName(String),
}

/// A repository on the forge, identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, RepoError> {
        let (owner, name) = (owner.into(), name.into());
        let full = format!("{owner}/{name}");
        if owner.is_empty() {
            return Err(RepoError::EmptyOwner(full));
        }
        if name.is_empty() {
            return Err(RepoError::EmptyName(full));
        }
        if name.contains('/') {
            return Err(RepoError::NestedName(full));
        }
        Ok(Self { owner, name })
    }

    /// Parses `owner/name`, splitting on the first `/`.
    pub fn parse(input: &str) -> Result<Self, RepoError> {
        let Some((owner, name)) = input.split_once('/') else {
            return Err(RepoError::MissingSeparator(input.to_string()));
        };
        Self::new(owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The parts of a pull request needed to decide whether it came from a fork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    /// Login of the account owning the head branch. Absent when that
    /// account or repository has been deleted.
    pub head_owner: Option<String>,
}

impl PullRequest {
    pub fn new(number: u64, head_owner: Option<&str>) -> Self {
        Self {
            number,
            head_owner: head_owner.map(str::to_string),
        }
    }

    /// Whether the head branch lives under a different owner than `owner`.
    ///
    /// Comparison is exact and case-sensitive. A pull request with no head
    /// owner is never treated as a fork.
    pub fn is_from_fork(&self, owner: &str) -> bool {
        self.head_owner
            .as_deref()
            .is_some_and(|login| login != owner)
    }
}

/// Which pull requests are considered for closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Exactly one pull request, by number.
    Single(u64),
    /// Every pull request currently open.
    AllOpen,
}

/// A GitHub access token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let token = token.trim();
        (!token.is_empty()).then(|| Self(token.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Everything a run needs, resolved once from the inputs.
#[derive(Debug, Clone)]
pub struct CloseSpec {
    pub repo: Repo,
    /// Posted on each fork pull request before it is closed. Never empty.
    pub comment: Option<String>,
    pub selection: Selection,
}

impl CloseSpec {
    pub fn new(repo: Repo, comment: Option<String>, selection: Selection) -> Self {
        Self {
            repo,
            comment: comment.filter(|c| !c.is_empty()),
            selection,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseReport {
    /// Numbers of the pull requests closed, in the order they were closed.
    pub closed: Vec<u64>,
    /// How many candidates were fetched.
    pub examined: usize,
}

impl CloseReport {
    pub fn closed_count(&self) -> usize {
        self.closed.len()
    }

    pub fn summary(&self) -> String {
        match self.closed_count() {
            0 => "No pull requests from forks found.".to_string(),
            n => format!("Pull requests closed: {n}"),
        }
    }
}

/// Remote source-control host holding the pull requests.
///
/// Every call may fail; callers treat any failure as fatal to the run.
#[async_trait]
pub trait Forge {
    /// Fetches one pull request. Returns
    /// [`Error::PullRequestNotFound`](crate::Error::PullRequestNotFound)
    /// when it does not exist.
    async fn get_pull_request(&self, repo: &Repo, number: u64) -> Result<PullRequest>;

    /// Lists every open pull request, across all pages.
    async fn list_open_pull_requests(&self, repo: &Repo) -> Result<Vec<PullRequest>>;

    /// Posts `body` as an issue comment on pull request `number`.
    async fn create_comment(&self, repo: &Repo, number: u64, body: &str) -> Result<()>;

    /// Sets the state of pull request `number` to closed.
    async fn close_pull_request(&self, repo: &Repo, number: u64) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_owner_and_name() {
        let repo = Repo::parse("acme/widgets").unwrap();
        assert_eq!(repo.owner(), "acme");
        assert_eq!(repo.name(), "widgets");
        assert_eq!(repo.to_string(), "acme/widgets");
    }

    #[test]
    fn parse_rejects_malformed_identifiers() {
        assert_eq!(
            Repo::parse("widgets"),
            Err(RepoError::MissingSeparator("widgets".into()))
        );
        assert_eq!(
            Repo::parse("/widgets"),
            Err(RepoError::EmptyOwner("/widgets".into()))
        );
        assert_eq!(Repo::parse("acme/"), Err(RepoError::EmptyName("acme/".into())));
        assert_eq!(Repo::parse(""), Err(RepoError::MissingSeparator("".into())));
        assert_eq!(
            Repo::parse("acme/widgets/extra"),
            Err(RepoError::NestedName("acme/widgets/extra".into()))
        );
    }

    #[test]
    fn missing_separator_message() {
        let err = Repo::parse("widgets").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Repository must be in format 'owner/name', got: 'widgets'"
        );
    }

    #[test]
    fn new_validates_parts() {
        assert!(Repo::new("acme", "widgets").is_ok());
        assert!(Repo::new("", "widgets").is_err());
        assert!(Repo::new("acme", "").is_err());
        assert!(Repo::new("acme", "a/b").is_err());
    }

    #[test]
    fn fork_detection_is_case_sensitive() {
        assert!(PullRequest::new(1, Some("bob")).is_from_fork("acme"));
        assert!(PullRequest::new(2, Some("Acme")).is_from_fork("acme"));
        assert!(!PullRequest::new(3, Some("acme")).is_from_fork("acme"));
    }

    #[test]
    fn missing_head_owner_is_not_a_fork() {
        assert!(!PullRequest::new(4, None).is_from_fork("acme"));
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AccessToken::new("ghp_secret").unwrap();
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
        assert_eq!(token.expose(), "ghp_secret");
        assert!(AccessToken::new("   ").is_none());
    }

    #[test]
    fn empty_comment_is_dropped() {
        let repo = Repo::parse("acme/widgets").unwrap();
        let spec = CloseSpec::new(repo, Some(String::new()), Selection::AllOpen);
        assert_eq!(spec.comment, None);
    }

    #[test]
    fn summary_wording() {
        let mut report = CloseReport::default();
        assert_eq!(report.summary(), "No pull requests from forks found.");
        report.closed = vec![2, 9];
        assert_eq!(report.summary(), "Pull requests closed: 2");
    }
}
