use std::{
    fmt::Display,
    fs::OpenOptions,
    io::{self, Write},
    path::PathBuf,
};

use tracing::debug;

use crate::error::{Error, Result};

pub const CLOSED_COUNT: &str = "closed-count";

/// Where step outputs are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// The file named by `GITHUB_OUTPUT`, appended to as `name=value` lines.
    File(PathBuf),
    /// Standard output, in the same `name=value` form.
    Stdout,
}

impl OutputSink {
    /// Picks the file named by `GITHUB_OUTPUT` when it is set.
    pub fn from_env() -> Self {
        match std::env::var_os("GITHUB_OUTPUT") {
            Some(path) if !path.is_empty() => OutputSink::File(path.into()),
            _ => OutputSink::Stdout,
        }
    }

    /// Records a single-line output value.
    pub fn set_output(&self, name: &str, value: impl Display) -> Result<()> {
        let line = format!("{name}={value}\n");
        let written = match self {
            OutputSink::File(path) => {
                debug!("Writing output {name} to {}", path.display());
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .and_then(|mut file| file.write_all(line.as_bytes()))
            }
            OutputSink::Stdout => io::stdout().lock().write_all(line.as_bytes()),
        };

        written.map_err(|source| Error::Output {
            name: name.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "previous=1\n").unwrap();

        let sink = OutputSink::File(path.clone());
        sink.set_output(CLOSED_COUNT, 3).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "previous=1\nclosed-count=3\n");
    }

    #[test]
    fn creates_missing_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh");

        OutputSink::File(path.clone()).set_output(CLOSED_COUNT, 0).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "closed-count=0\n");
    }

    #[test]
    fn unwritable_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::File(dir.path().join("missing").join("output"));

        let err = sink.set_output(CLOSED_COUNT, 1).unwrap_err();
        assert!(err.to_string().starts_with("Failed to write step output 'closed-count'"));
    }
}
