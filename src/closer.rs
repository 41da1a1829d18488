use tracing::{debug, info};

use crate::{
    error::Result,
    outputs::{CLOSED_COUNT, OutputSink},
    types::{CloseReport, CloseSpec, Forge, PullRequest, Selection},
};

/// Fetches the candidates named by `spec.selection`.
async fn fetch_candidates<F>(spec: &CloseSpec, forge: &F) -> Result<Vec<PullRequest>>
where
    F: Forge + Sync,
{
    match spec.selection {
        Selection::Single(number) => {
            let pr = forge.get_pull_request(&spec.repo, number).await?;
            Ok(vec![pr])
        }
        Selection::AllOpen => forge.list_open_pull_requests(&spec.repo).await,
    }
}

/// Closes every candidate pull request opened from a fork of `spec.repo`.
///
/// Candidates are processed one at a time. For each fork pull request the
/// configured comment (if any) is posted first and then the pull request is
/// closed. The first failing call aborts the run; anything already closed
/// stays closed.
pub async fn close_fork_pull_requests<F>(spec: &CloseSpec, forge: &F) -> Result<CloseReport>
where
    F: Forge + Sync,
{
    let owner = spec.repo.owner();
    let candidates = fetch_candidates(spec, forge).await?;
    debug!(repo = %spec.repo, count = candidates.len(), "Fetched candidates: {candidates:?}");

    let mut report = CloseReport {
        closed: Vec::new(),
        examined: candidates.len(),
    };

    for pr in candidates.iter().filter(|pr| pr.is_from_fork(owner)) {
        if let Some(body) = &spec.comment {
            info!("Adding a comment before closing pull request #{}", pr.number);
            forge.create_comment(&spec.repo, pr.number, body).await?;
        }

        forge.close_pull_request(&spec.repo, pr.number).await?;
        debug!(
            number = pr.number,
            head_owner = pr.head_owner.as_deref().unwrap_or_default(),
            "Closed pull request"
        );
        report.closed.push(pr.number);
    }

    Ok(report)
}

/// Runs [`close_fork_pull_requests`], logs the summary and records the
/// `closed-count` output.
pub async fn run_and_report<F>(
    spec: &CloseSpec,
    forge: &F,
    outputs: &OutputSink,
) -> Result<CloseReport>
where
    F: Forge + Sync,
{
    let report = close_fork_pull_requests(spec, forge).await?;
    info!("{}", report.summary());
    outputs.set_output(CLOSED_COUNT, report.closed_count())?;
    Ok(report)
}
