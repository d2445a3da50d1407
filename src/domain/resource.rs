//! Icon, sound and attachment resources
//!
//! A resource is either a local file (by path or URI) or, for icons and sounds, the
//! name of a resource the platform already knows about. Backends only ever need one
//! of three renderings, so conversions are limited to `as_uri`, `as_path` and
//! `as_name`.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;

use crate::domain::error::ResourceError;

/// Name of the platform default notification sound
pub const DEFAULT_SOUND_NAME: &str = "default";

/// A file referenced by a local path or a URI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileResource {
    Path(PathBuf),
    Uri(String),
}

/// A file resource or a named system resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Path(PathBuf),
    Uri(String),
    Name(String),
}

/// An icon: theme name, path or URI
pub type Icon = Resource;

/// A sound: system sound name, path or URI
pub type Sound = Resource;

/// A file attached to a notification and shown as a preview
pub type Attachment = FileResource;

impl FileResource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    /// Render as a URI string. Paths become `file://` URIs.
    pub fn as_uri(&self) -> String {
        match self {
            Self::Uri(uri) => uri.clone(),
            Self::Path(path) => path_to_uri(path),
        }
    }

    /// Render as a local path. Scheme information of URIs is lost.
    pub fn as_path(&self) -> PathBuf {
        match self {
            Self::Path(path) => path.clone(),
            Self::Uri(uri) => uri_to_path(uri),
        }
    }
}

impl Resource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// The platform default notification sound
    pub fn default_sound() -> Self {
        Self::Name(DEFAULT_SOUND_NAME.to_string())
    }

    pub fn is_default_sound(&self) -> bool {
        matches!(self, Self::Name(name) if name == DEFAULT_SOUND_NAME)
    }

    /// Whether the resource was given as a name
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Name(_))
    }

    /// Whether the resource was given as a path or URI
    pub fn is_file(&self) -> bool {
        !self.is_named()
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }

    /// The file part of this resource, if any
    pub fn as_file(&self) -> Option<FileResource> {
        match self {
            Self::Path(path) => Some(FileResource::Path(path.clone())),
            Self::Uri(uri) => Some(FileResource::Uri(uri.clone())),
            Self::Name(_) => None,
        }
    }

    pub fn as_uri(&self) -> Option<String> {
        self.as_file().map(|file| file.as_uri())
    }

    pub fn as_path(&self) -> Option<PathBuf> {
        self.as_file().map(|file| file.as_path())
    }

    /// Name for named resources, URI otherwise.
    /// This is what most native APIs accept in a single string slot.
    pub fn as_name_or_uri(&self) -> String {
        match self {
            Self::Name(name) => name.clone(),
            other => other.as_uri().unwrap_or_default(),
        }
    }
}

impl From<FileResource> for Resource {
    fn from(file: FileResource) -> Self {
        match file {
            FileResource::Path(path) => Self::Path(path),
            FileResource::Uri(uri) => Self::Uri(uri),
        }
    }
}

impl From<PathBuf> for Resource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Resource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for FileResource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl FromStr for Resource {
    type Err = ResourceError;

    /// Interpret a free-form string.
    ///
    /// Strings with a URI scheme become `Uri`, anything that looks like a path
    /// becomes `Path`, and the rest is taken as a resource name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ResourceError::Empty);
        }

        if has_uri_scheme(s) {
            return Ok(Self::Uri(s.to_string()));
        }

        let path = Path::new(s);
        if path.is_absolute() || s.contains('/') || s.contains(std::path::MAIN_SEPARATOR) {
            return Ok(Self::Path(path.to_path_buf()));
        }

        Ok(Self::Name(s.to_string()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Uri(uri) => write!(f, "{}", uri),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}

/// `scheme:` prefix with at least two characters, so Windows drive letters
/// (`C:\...`) are not mistaken for URIs.
fn has_uri_scheme(s: &str) -> bool {
    match s.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

fn path_to_uri(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    Url::from_file_path(&absolute)
        .map(String::from)
        .unwrap_or_else(|()| format!("file://{}", absolute.display()))
}

fn uri_to_path(uri: &str) -> PathBuf {
    match Url::parse(uri) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .unwrap_or_else(|()| PathBuf::from(url.path())),
        Ok(url) => PathBuf::from(url.path()),
        Err(_) => PathBuf::from(uri),
    }
}
