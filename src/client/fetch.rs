//! Article body retrieval.
//!
//! The session never performs I/O itself: it hands out [`FetchRequest`]s and
//! the host answers them. [`Fetcher`] is the synchronous form of that answer,
//! used by the CLI preview and tests.
//!
//! [`FetchRequest`]: super::session::FetchRequest

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// What came back for a request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
}

pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Serves root-relative URLs from a site directory, like a static file server.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let rel = Path::new(path.trim_start_matches('/'));
        rel.components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            .then(|| self.root.join(rel))
    }
}

impl Fetcher for FsFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let Some(path) = self.resolve(url) else {
            return Ok(FetchResponse {
                status: 403,
                body: String::new(),
            });
        };
        match fs::read_to_string(&path) {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(FetchResponse {
                status: 404,
                body: String::new(),
            }),
            Err(err) => Err(FetchError::Network(format!("{}: {err}", path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn serves_files_under_root() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path(), "articles/a/x/en/x.md", "# X\n");
        let response = FsFetcher::new(tmp.path())
            .fetch("/articles/a/x/en/x.md")
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.body, "# X\n");
    }

    #[test]
    fn missing_file_is_404() {
        let tmp = TempDir::new().unwrap();
        let response = FsFetcher::new(tmp.path()).fetch("/nope.md").unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[test]
    fn parent_segments_are_forbidden() {
        let tmp = TempDir::new().unwrap();
        let response = FsFetcher::new(tmp.path()).fetch("/../etc/passwd").unwrap();
        assert_eq!(response.status, 403);
    }

    #[test]
    fn query_suffix_is_ignored() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path(), "a.md", "body");
        let response = FsFetcher::new(tmp.path()).fetch("/a.md?v=2").unwrap();
        assert_eq!(response.body, "body");
    }

    #[test]
    fn invalid_utf8_is_network_error() {
        let tmp = TempDir::new().unwrap();
        write_bytes(tmp.path(), "bad.md", &[0xff, 0xfe, 0x00]);
        let result = FsFetcher::new(tmp.path()).fetch("/bad.md");
        assert!(matches!(result, Err(FetchError::Network(_))));
    }
}
