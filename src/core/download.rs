use crate::core::http::Fetcher;
use crate::core::progress::{ProgressReporter, ProgressState};
use crate::error::{Result, VpmError};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;
use tracing::debug;

/// Size of each read from the response body
pub const CHUNK_SIZE: usize = 8 * 1024;

/// State of a single transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSession {
    pub source_url: String,
    pub destination: PathBuf,
    pub total_bytes: Option<u64>,
    pub transferred: u64,
}

impl DownloadSession {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(source_url: S, destination: P) -> Self {
        Self {
            source_url: source_url.into(),
            destination: destination.into(),
            total_bytes: None,
            transferred: 0,
        }
    }

    pub fn progress(&self) -> ProgressState {
        match self.total_bytes {
            Some(total) if total > 0 => ProgressState::Bounded {
                percent: self.transferred as f64 / total as f64 * 100.0,
                transferred: self.transferred,
                total,
            },
            _ => ProgressState::Indeterminate {
                transferred: self.transferred,
            },
        }
    }
}

pub struct Downloader<'a> {
    fetcher: &'a dyn Fetcher,
}

impl<'a> Downloader<'a> {
    pub fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch `session.source_url` into `session.destination`, returning the
    /// number of bytes written.
    ///
    /// The destination is only opened once the server has answered with a
    /// success status. A transfer that fails midway leaves the partial file
    /// in place.
    pub fn download(
        &self,
        session: &mut DownloadSession,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<u64> {
        let response = self.fetcher.get(&session.source_url)?;

        if !response.is_success() {
            return Err(VpmError::DownloadError {
                url: session.source_url.clone(),
                status: response.status,
            });
        }

        session.total_bytes = response.content_length;
        let mut file = File::create(&session.destination)?;
        debug!("Writing to {}", session.destination.display());

        reporter.start(session.total_bytes);
        let result = stream_body(response.body, &mut file, session, reporter);
        reporter.finish();
        result?;

        file.flush()?;
        Ok(session.transferred)
    }
}

fn stream_body<R: Read, W: Write>(
    mut body: R,
    out: &mut W,
    session: &mut DownloadSession,
    reporter: &mut dyn ProgressReporter,
) -> Result<()> {
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let read = match body.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        out.write_all(&buffer[..read])?;
        session.transferred += read as u64;
        reporter.update(&session.progress());
    }

    debug!(bytes = session.transferred, "response body exhausted");
    Ok(())
}
