//! Page files: the document that triggers are scanned from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::settings::Settings;

/// One element of a page, with its attributes.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PageElement {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl PageElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub elements: Vec<PageElement>,
    /// Directory relative sources are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Page {
    /// Read and parse a page file.
    pub fn load(path: &Path) -> Result<Page> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut page: Page = serde_json::from_str(&content).map_err(|source| Error::Page {
            path: path.to_path_buf(),
            source,
        })?;
        page.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(page)
    }

    /// Resolve a source string to a local path.
    pub fn resolve_path(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Resolve a source string to a URL the video backend can open.
    ///
    /// Sources that already carry a scheme are passed through untouched.
    pub fn resolve_url(&self, src: &str) -> Result<url::Url> {
        if let Ok(url) = url::Url::parse(src) {
            // A single-letter scheme is a Windows drive, not a URL.
            if url.scheme().len() > 1 {
                return Ok(url);
            }
        }

        let path = self.resolve_path(src);
        let absolute = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()
                .map_err(|_| Error::InvalidUrl(src.to_string()))?
                .join(path)
        };
        url::Url::from_file_path(&absolute).map_err(|_| Error::InvalidUrl(src.to_string()))
    }

    pub fn display_title(&self) -> String {
        self.title.clone().unwrap_or_else(|| "Gallery".to_string())
    }
}
