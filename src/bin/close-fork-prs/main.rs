use std::process::ExitCode;

use close_fork_prs::{Error, GitHub, OutputSink, logging, parse_args, resolve_token, run_and_report};
use tracing::{debug, error};

async fn run() -> close_fork_prs::Result<()> {
    let config = parse_args(std::env::args_os())?;
    let token = resolve_token(config.token).map_err(Error::Authentication)?;
    let github = GitHub::new(&token, &config.api_url)?;

    run_and_report(&config.spec, &github, &OutputSink::from_env()).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_tracing(logging::running_in_github_actions());

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        // Prints help/version with exit code 0, usage errors with 2.
        Err(Error::Cli(err)) => err.exit(),
        Err(err) => {
            debug!("{err:?}");
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
