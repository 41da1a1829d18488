use std::process::Command;

use anyhow::Context;
use async_trait::async_trait;
use octocrab::{Octocrab, params};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    error::{Error, Operation, Result},
    types::{AccessToken, Forge, PullRequest, Repo},
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Returns the token supplied as input, falling back to the environment and
/// finally the `gh` CLI.
pub fn resolve_token(input: Option<AccessToken>) -> anyhow::Result<AccessToken> {
    if let Some(token) = input {
        return Ok(token);
    }

    // Prefer environment variables over gh CLI to avoid subprocess overhead.
    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Some(token) = std::env::var(var).ok().and_then(AccessToken::new) {
            debug!("Using token from {var}");
            return Ok(token);
        }
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .context("No token supplied and the gh CLI could not be run")?;

    if !output.status.success() {
        anyhow::bail!(
            "No token supplied and 'gh auth token' failed. Please run 'gh auth login' first"
        );
    }

    AccessToken::new(String::from_utf8(output.stdout)?).context("Empty token returned from gh CLI")
}

pub fn parse_api_url(input: &str) -> Result<Url> {
    Url::parse(input).map_err(|source| Error::ApiUrl {
        input: input.to_string(),
        source,
    })
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

fn convert_pull_request(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        head_owner: pr.head.user.as_ref().map(|user| user.login.clone()),
    }
}

/// [`Forge`] backed by the GitHub REST API.
pub struct GitHub {
    client: Octocrab,
}

impl GitHub {
    /// Creates an authenticated client talking to `api_url`.
    pub fn new(token: &AccessToken, api_url: &Url) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.expose().to_string())
            .base_uri(api_url.as_str())
            .and_then(|builder| builder.build())
            .map_err(|err| Error::Client(err.into()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Forge for GitHub {
    #[instrument(skip(self), fields(repo = %repo))]
    async fn get_pull_request(&self, repo: &Repo, number: u64) -> Result<PullRequest> {
        match self.client.pulls(repo.owner(), repo.name()).get(number).await {
            Ok(pr) => Ok(convert_pull_request(&pr)),
            Err(err) if is_not_found(&err) => Err(Error::PullRequestNotFound {
                repo: repo.clone(),
                number,
            }),
            Err(err) => Err(Error::remote(Operation::GetPullRequest, Some(number), err)),
        }
    }

    #[instrument(skip(self), fields(repo = %repo))]
    async fn list_open_pull_requests(&self, repo: &Repo) -> Result<Vec<PullRequest>> {
        let failed = |err: octocrab::Error| Error::remote(Operation::ListPullRequests, None, err);

        let first_page = self
            .client
            .pulls(repo.owner(), repo.name())
            .list()
            .state(params::State::Open)
            .per_page(100)
            .send()
            .await
            .map_err(failed)?;
        let pulls = self.client.all_pages(first_page).await.map_err(failed)?;

        Ok(pulls.iter().map(convert_pull_request).collect())
    }

    #[instrument(skip(self, body), fields(repo = %repo))]
    async fn create_comment(&self, repo: &Repo, number: u64, body: &str) -> Result<()> {
        self.client
            .issues(repo.owner(), repo.name())
            .create_comment(number, body)
            .await
            .map_err(|err| Error::remote(Operation::CreateComment, Some(number), err))?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %repo))]
    async fn close_pull_request(&self, repo: &Repo, number: u64) -> Result<()> {
        self.client
            .pulls(repo.owner(), repo.name())
            .update(number)
            .state(params::pulls::State::Closed)
            .send()
            .await
            .map_err(|err| Error::remote(Operation::ClosePullRequest, Some(number), err))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_token_wins() {
        let token = AccessToken::new("explicit").unwrap();
        assert_eq!(resolve_token(Some(token.clone())).unwrap(), token);
    }

    #[test]
    fn api_url_must_be_absolute() {
        assert!(parse_api_url(DEFAULT_API_URL).is_ok());
        assert!(parse_api_url("https://ghe.example.com/api/v3").is_ok());

        let err = parse_api_url("not a url").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().starts_with("Invalid API URL 'not a url'"));
    }
}
