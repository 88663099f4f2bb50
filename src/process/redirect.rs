use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;

use super::ProcessError;
use crate::shell::pipeline::Redirections;

/// Redirection targets opened by the shell. Each `File` is closed when this
/// value is dropped, so the parent releases its copies on every path.
#[derive(Debug, Default)]
pub struct OpenedRedirections {
    pub input: Option<File>,
    pub output: Option<File>,
}

impl OpenedRedirections {
    pub fn open(redirects: &Redirections) -> Result<Self, ProcessError> {
        let input = redirects.input.as_deref().map(open_input).transpose()?;
        let output = redirects.output.as_deref().map(open_output).transpose()?;
        Ok(Self { input, output })
    }

    pub fn input_fd(&self) -> Option<RawFd> {
        self.input.as_ref().map(AsRawFd::as_raw_fd)
    }

    pub fn output_fd(&self) -> Option<RawFd> {
        self.output.as_ref().map(AsRawFd::as_raw_fd)
    }
}

fn open_input(path: &Path) -> Result<File, ProcessError> {
    File::open(path).map_err(|source| redirect_error(path, source))
}

fn open_output(path: &Path) -> Result<File, ProcessError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o644)
        .open(path)
        .map_err(|source| redirect_error(path, source))
}

fn redirect_error(path: &Path, source: std::io::Error) -> ProcessError {
    ProcessError::Redirect {
        path: path.display().to_string(),
        source,
    }
}
