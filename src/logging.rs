//! Tracing setup.
//!
//! Inside GitHub Actions, events are rendered as workflow commands on stdout
//! so the runner can surface them: debug lines are only shown with step
//! debugging enabled, warnings and errors become annotations. Elsewhere a
//! plain `fmt` layer writes to stderr.

use std::fmt::{self, Write as _};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{FmtContext, FormatEvent, FormatFields, format::Writer},
    prelude::*,
    registry::LookupSpan,
};

pub fn running_in_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Escapes command data so multi-line messages stay a single command.
pub fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn workflow_command(level: &Level) -> Option<&'static str> {
    match *level {
        Level::TRACE | Level::DEBUG => Some("debug"),
        Level::INFO => None,
        Level::WARN => Some("warning"),
        Level::ERROR => Some("error"),
    }
}

/// Formats each event as a GitHub Actions workflow command.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkflowCommands;

impl<S, N> FormatEvent<S, N> for WorkflowCommands
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        match workflow_command(event.metadata().level()) {
            Some(command) => writeln!(writer, "::{command}::{}", escape_data(&message)),
            None => writeln!(writer, "{message}"),
        }
    }
}

pub fn init_tracing(github_actions: bool) {
    let default_directive = if github_actions {
        "close_fork_prs=debug"
    } else {
        "close_fork_prs=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    if github_actions {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .event_format(WorkflowCommands)
                    .with_writer(std::io::stdout),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    }
}
