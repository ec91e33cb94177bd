use crate::core::config::Config;
use crate::core::download::{DownloadSession, Downloader};
use crate::core::http::{Fetcher, HttpFetcher};
use crate::core::package::{FileNaming, Repository};
use crate::core::progress::{ProgressReporter, TerminalReporter};
use crate::error::{Result, VpmError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How an install attempt ended
#[derive(Debug)]
pub enum InstallOutcome {
    Success {
        bytes_written: u64,
        destination: PathBuf,
    },
    /// No library directory is configured; nothing was requested
    ConfigMissing,
    /// The server answered with a non-success status; nothing was written
    HttpFailure { url: String, status: u16 },
    /// Transport or file error, possibly after a partial write
    IoFailure(VpmError),
}

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub repository: Repository,
    pub naming: FileNaming,
}

pub fn install_package(
    config: Option<&Config>,
    identifier: &str,
    options: &InstallOptions,
    fetcher: &dyn Fetcher,
    reporter: &mut dyn ProgressReporter,
) -> InstallOutcome {
    let Some(config) = config else {
        return InstallOutcome::ConfigMissing;
    };

    let package = options
        .repository
        .resolve(identifier, &config.libs_dir, options.naming);
    debug!(
        "Resolved '{identifier}' to {} -> {}",
        package.url,
        package.destination.display()
    );

    let mut session = DownloadSession::new(package.url, package.destination);
    match Downloader::new(fetcher).download(&mut session, reporter) {
        Ok(bytes_written) => InstallOutcome::Success {
            bytes_written,
            destination: session.destination,
        },
        Err(VpmError::DownloadError { url, status }) => {
            InstallOutcome::HttpFailure { url, status }
        }
        Err(e) => InstallOutcome::IoFailure(e),
    }
}

/// Line printed for an install outcome.
pub fn outcome_message(outcome: &InstallOutcome, config_path: &Path) -> String {
    match outcome {
        InstallOutcome::Success { .. } => "Download complete.".to_string(),
        InstallOutcome::ConfigMissing => format!(
            "{}!",
            VpmError::LibsPathNotFound {
                path: config_path.to_path_buf()
            }
        ),
        InstallOutcome::HttpFailure { url, .. } => format!("Error downloading file from: {url}"),
        InstallOutcome::IoFailure(e) => format!("Error during download: {}", failure_cause(e)),
    }
}

// Transport and file errors are shown without the enum's prefix
fn failure_cause(error: &VpmError) -> String {
    match error {
        VpmError::Io(e) => e.to_string(),
        VpmError::Http(e) => e.to_string(),
        other => other.to_string(),
    }
}

pub fn install(
    config: Option<&Config>,
    config_path: &Path,
    identifier: &str,
    options: &InstallOptions,
) -> Result<()> {
    let outcome = match HttpFetcher::new() {
        Ok(fetcher) => {
            let mut reporter = TerminalReporter::stdout();
            install_package(config, identifier, options, &fetcher, &mut reporter)
        }
        Err(e) => InstallOutcome::IoFailure(e),
    };

    match &outcome {
        InstallOutcome::Success {
            bytes_written,
            destination,
        } => info!("Saved {bytes_written} bytes to {}", destination.display()),
        InstallOutcome::HttpFailure { status, .. } => debug!(status, "server refused download"),
        _ => {}
    }
    println!("{}", outcome_message(&outcome, config_path));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::http::FetchResponse;
    use crate::core::progress::RecordingReporter;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct FakeFetcher {
        status: u16,
        body: Vec<u8>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(status: u16, body: &[u8]) -> Self {
            Self {
                status,
                body: body.to_vec(),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetcher for FakeFetcher {
        fn get(&self, url: &str) -> Result<FetchResponse> {
            self.requests.borrow_mut().push(url.to_string());
            Ok(FetchResponse {
                status: self.status,
                content_length: Some(self.body.len() as u64),
                body: Box::new(Cursor::new(self.body.clone())),
            })
        }
    }

    #[test]
    fn test_install_without_config_makes_no_request() {
        let fetcher = FakeFetcher::new(200, b"payload");
        let mut reporter = RecordingReporter::new();

        let outcome = install_package(
            None,
            "mylib",
            &InstallOptions::default(),
            &fetcher,
            &mut reporter,
        );

        assert!(matches!(outcome, InstallOutcome::ConfigMissing));
        assert!(fetcher.requests.borrow().is_empty());
        assert!(reporter.events.is_empty());
    }

    #[test]
    fn test_install_by_name() {
        let temp = TempDir::new().unwrap();
        let config = Config::new(temp.path());
        let fetcher = FakeFetcher::new(200, b"MZ library bytes");
        let mut reporter = RecordingReporter::new();

        let outcome = install_package(
            Some(&config),
            "mylib",
            &InstallOptions::default(),
            &fetcher,
            &mut reporter,
        );

        assert_eq!(
            *fetcher.requests.borrow(),
            vec![
                "https://raw.githubusercontent.com/funcieqDEV/VSharpLibs/main/libs/mylib.dll"
                    .to_string()
            ]
        );
        match outcome {
            InstallOutcome::Success {
                bytes_written,
                destination,
            } => {
                assert_eq!(bytes_written, 16);
                assert_eq!(destination, temp.path().join("mylib.dll"));
                assert_eq!(std::fs::read(&destination).unwrap(), b"MZ library bytes");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_install_http_failure() {
        let temp = TempDir::new().unwrap();
        let config = Config::new(temp.path());
        let fetcher = FakeFetcher::new(404, b"404: Not Found");
        let mut reporter = RecordingReporter::new();

        let outcome = install_package(
            Some(&config),
            "missing",
            &InstallOptions::default(),
            &fetcher,
            &mut reporter,
        );

        match outcome {
            InstallOutcome::HttpFailure { url, status } => {
                assert_eq!(
                    url,
                    "https://raw.githubusercontent.com/funcieqDEV/VSharpLibs/main/libs/missing.dll"
                );
                assert_eq!(status, 404);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!temp.path().join("missing.dll").exists());
    }

    #[test]
    fn test_install_url_identifier_keeps_verbatim_name() {
        let temp = TempDir::new().unwrap();
        let config = Config::new(temp.path());
        let fetcher = FakeFetcher::new(200, b"bytes");
        let mut reporter = RecordingReporter::new();

        let outcome = install_package(
            Some(&config),
            "https://example.com/x.dll",
            &InstallOptions::default(),
            &fetcher,
            &mut reporter,
        );

        assert_eq!(*fetcher.requests.borrow(), vec!["https://example.com/x.dll".to_string()]);
        // `<libs>/https:/example.com/` does not exist, so the write fails
        assert!(matches!(outcome, InstallOutcome::IoFailure(VpmError::Io(_))));
    }

    #[test]
    fn test_install_url_identifier_with_segment_naming() {
        let temp = TempDir::new().unwrap();
        let config = Config::new(temp.path());
        let fetcher = FakeFetcher::new(200, b"bytes");
        let mut reporter = RecordingReporter::new();
        let options = InstallOptions {
            naming: FileNaming::UrlSegment,
            ..Default::default()
        };

        let outcome = install_package(
            Some(&config),
            "https://example.com/x.dll",
            &options,
            &fetcher,
            &mut reporter,
        );

        match outcome {
            InstallOutcome::Success { destination, .. } => {
                assert_eq!(destination, temp.path().join("x.dll"));
                assert_eq!(std::fs::read(&destination).unwrap(), b"bytes");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_install_custom_repository() {
        let temp = TempDir::new().unwrap();
        let config = Config::new(temp.path());
        let fetcher = FakeFetcher::new(200, b"bytes");
        let mut reporter = RecordingReporter::new();
        let options = InstallOptions {
            repository: Repository::new("http://localhost:9000/libs"),
            ..Default::default()
        };

        install_package(Some(&config), "core", &options, &fetcher, &mut reporter);

        assert_eq!(
            *fetcher.requests.borrow(),
            vec!["http://localhost:9000/libs/core.dll".to_string()]
        );
    }

    #[test]
    fn test_install_missing_libs_dir_is_io_failure() {
        let temp = TempDir::new().unwrap();
        let config = Config::new(temp.path().join("not-created"));
        let fetcher = FakeFetcher::new(200, b"bytes");
        let mut reporter = RecordingReporter::new();

        let outcome = install_package(
            Some(&config),
            "mylib",
            &InstallOptions::default(),
            &fetcher,
            &mut reporter,
        );

        assert!(matches!(outcome, InstallOutcome::IoFailure(_)));
    }

    #[test]
    fn test_outcome_messages() {
        let config_path = Path::new("config.txt");

        let success = InstallOutcome::Success {
            bytes_written: 3,
            destination: PathBuf::from("/opt/libs/a.dll"),
        };
        assert_eq!(outcome_message(&success, config_path), "Download complete.");
        assert_eq!(
            outcome_message(&InstallOutcome::ConfigMissing, config_path),
            "Cannot find \"libs\" path in config.txt!"
        );

        let http = InstallOutcome::HttpFailure {
            url: "https://example.com/a.dll".to_string(),
            status: 404,
        };
        assert_eq!(
            outcome_message(&http, config_path),
            "Error downloading file from: https://example.com/a.dll"
        );
    }

    #[test]
    fn test_io_failure_message_shows_bare_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let outcome = InstallOutcome::IoFailure(VpmError::Io(io));

        assert_eq!(
            outcome_message(&outcome, Path::new("config.txt")),
            "Error during download: access denied"
        );
    }
}
