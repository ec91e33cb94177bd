use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;

/// Remote repository that serves V# libraries by name
pub const REMOTE_BASE_URL: &str =
    "https://raw.githubusercontent.com/funcieqDEV/VSharpLibs/main/libs/";

const PACKAGE_SUFFIX: &str = ".dll";

/// How the local file name is derived from a package identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileNaming {
    /// `<identifier>.dll`, even when the identifier is a full URL
    #[default]
    Identifier,
    /// Last path segment of the URL for URL identifiers
    UrlSegment,
}

/// Where a package comes from and where it lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub url: String,
    pub destination: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Repository {
    base_url: String,
}

impl Default for Repository {
    fn default() -> Self {
        Self::new(REMOTE_BASE_URL)
    }
}

impl Repository {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Download URL for an identifier. Anything starting with `http` is
    /// taken as a literal URL.
    pub fn source_url(&self, identifier: &str) -> String {
        if is_url(identifier) {
            identifier.to_string()
        } else {
            format!(
                "{}/{identifier}{PACKAGE_SUFFIX}",
                self.base_url.trim_end_matches('/')
            )
        }
    }

    pub fn resolve(
        &self,
        identifier: &str,
        libs_dir: &Path,
        naming: FileNaming,
    ) -> ResolvedPackage {
        ResolvedPackage {
            url: self.source_url(identifier),
            destination: libs_dir.join(file_name(identifier, naming)),
        }
    }
}

pub fn is_url(identifier: &str) -> bool {
    identifier.starts_with("http")
}

/// Local file name for an identifier under the given naming rule.
pub fn file_name(identifier: &str, naming: FileNaming) -> String {
    if naming == FileNaming::UrlSegment && is_url(identifier) {
        match last_segment(identifier) {
            Some(segment) if segment.ends_with(PACKAGE_SUFFIX) => return segment,
            Some(segment) => return format!("{segment}{PACKAGE_SUFFIX}"),
            None => warn!("No file name in '{identifier}', using it verbatim"),
        }
    }

    format!("{identifier}{PACKAGE_SUFFIX}")
}

fn last_segment(identifier: &str) -> Option<String> {
    let url = Url::parse(identifier).ok()?;
    url.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}
