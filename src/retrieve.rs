//! Fetching sidecar text from URLs or local paths.
//!
//! Retrieval is the only blocking step in the pipeline. Every failure,
//! including a timeout, surfaces as [`AuxGcpError::Retrieval`]; nothing is
//! retried here.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::AuxGcpError;

/// Suffix GDAL appends to an image name for its PAM sidecar.
pub const SIDECAR_SUFFIX: &str = ".aux.xml";

/// Default timeout for remote retrieval.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can produce the text found at a location.
///
/// Implemented by [`Retriever`] for real I/O and by any
/// `Fn(&str) -> Result<String, AuxGcpError>` closure, which keeps callers
/// free to plug in their own transport.
pub trait Retrieve {
    fn retrieve(&self, location: &str) -> Result<String, AuxGcpError>;
}

impl<F> Retrieve for F
where
    F: Fn(&str) -> Result<String, AuxGcpError>,
{
    fn retrieve(&self, location: &str) -> Result<String, AuxGcpError> {
        self(location)
    }
}

/// Options for [`Retriever`].
#[derive(Clone, Debug)]
pub struct RetrieveOptions {
    /// Upper bound on a whole remote request, connect through body.
    pub timeout: Duration,
}

impl Default for RetrieveOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Reads `http(s)://` URLs over the network and everything else from disk.
#[derive(Clone)]
pub struct Retriever {
    agent: ureq::Agent,
}

impl Retriever {
    pub fn new(options: &RetrieveOptions) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(options.timeout))
            .build();
        Self {
            agent: config.into(),
        }
    }

    fn fetch_remote(&self, url: &Url) -> Result<String, AuxGcpError> {
        let retrieval_error = |message: String| AuxGcpError::Retrieval {
            location: url.to_string(),
            message,
        };

        let mut response = self
            .agent
            .get(url.as_str())
            .header(
                "User-Agent",
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )
            .call()
            .map_err(|source| retrieval_error(source.to_string()))?;

        response
            .body_mut()
            .read_to_string()
            .map_err(|source| retrieval_error(source.to_string()))
    }
}

impl Default for Retriever {
    fn default() -> Self {
        Self::new(&RetrieveOptions::default())
    }
}

impl Retrieve for Retriever {
    fn retrieve(&self, location: &str) -> Result<String, AuxGcpError> {
        match classify(location)? {
            Location::Remote(url) => {
                tracing::info!(url = %url, "fetching sidecar");
                self.fetch_remote(&url)
            }
            Location::Local(path) => {
                tracing::info!(path = %path.display(), "reading sidecar");
                fs::read_to_string(&path).map_err(|source| AuxGcpError::Retrieval {
                    location: location.to_string(),
                    message: source.to_string(),
                })
            }
        }
    }
}

/// Where a location string points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    Remote(Url),
    Local(PathBuf),
}

/// Classifies a location as a remote URL or a local path.
///
/// Only `http`, `https` and `file` URLs are treated as URLs; anything else
/// (including Windows drive paths, which parse as a one-letter scheme) is a
/// plain path.
pub fn classify(location: &str) -> Result<Location, AuxGcpError> {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Location::Remote(url)),
        Ok(url) if url.scheme() == "file" => {
            let path = url.to_file_path().map_err(|()| AuxGcpError::Retrieval {
                location: location.to_string(),
                message: "file URL does not name a local path".to_string(),
            })?;
            Ok(Location::Local(path))
        }
        _ => Ok(Location::Local(PathBuf::from(location))),
    }
}

/// Derives the sidecar location for an image location.
///
/// The suffix goes on the URL path, so query strings and fragments stay
/// where they were.
pub fn sidecar_location(image_location: &str) -> String {
    match Url::parse(image_location) {
        Ok(mut url) if matches!(url.scheme(), "http" | "https" | "file") => {
            let path = format!("{}{SIDECAR_SUFFIX}", url.path());
            url.set_path(&path);
            url.to_string()
        }
        _ => format!("{image_location}{SIDECAR_SUFFIX}"),
    }
}
