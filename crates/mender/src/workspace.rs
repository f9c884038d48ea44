//! Resolution of repository-relative paths.

use std::io;
use std::sync::Arc;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Failures resolving a caller-supplied path.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceError {
    /// No path was supplied.
    #[error("No file path was given, please provide a path relative to the repository root")]
    EmptyPath,

    /// The path is absolute.
    #[error("Path {path} must be relative to the repository root")]
    Absolute {
        /// The rejected path.
        path: Utf8PathBuf,
    },

    /// The path leaves the repository through `..`.
    #[error("Path {path} points outside the repository, please use a path inside it")]
    EscapesRoot {
        /// The rejected path.
        path: Utf8PathBuf,
    },

    /// Nothing exists at the path.
    #[error("File not found, please check the path again")]
    NotFound {
        /// The missing path.
        path: Utf8PathBuf,
    },

    /// The path names a directory or other non-file.
    #[error("{path} is not a regular file, please pass the path of a file")]
    NotAFile {
        /// The rejected path.
        path: Utf8PathBuf,
    },

    /// Metadata lookup failed for another reason.
    #[error("could not inspect {path}: {source}")]
    Io {
        /// The path being inspected.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
}

impl WorkspaceError {
    /// Returns whether the error means the file does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns whether the error is an infrastructure failure rather than a
    /// problem with the caller's input.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Root directory of the repository being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: Utf8PathBuf,
}

impl Workspace {
    /// Creates a workspace rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Repository root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Normalises `relative` without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Rejects empty, absolute and root-escaping paths.
    pub fn normalise(&self, relative: &Utf8Path) -> Result<Utf8PathBuf, WorkspaceError> {
        if relative.as_str().trim().is_empty() {
            return Err(WorkspaceError::EmptyPath);
        }
        let mut normalised = Utf8PathBuf::new();
        let mut depth = 0usize;
        for component in relative.components() {
            match component {
                Utf8Component::Prefix(_) | Utf8Component::RootDir => {
                    return Err(WorkspaceError::Absolute {
                        path: relative.to_path_buf(),
                    });
                }
                Utf8Component::CurDir => {}
                Utf8Component::ParentDir => {
                    if depth == 0 {
                        return Err(WorkspaceError::EscapesRoot {
                            path: relative.to_path_buf(),
                        });
                    }
                    depth -= 1;
                    normalised.pop();
                }
                Utf8Component::Normal(part) => {
                    depth += 1;
                    normalised.push(part);
                }
            }
        }
        if normalised.as_str().is_empty() {
            return Err(WorkspaceError::NotAFile {
                path: relative.to_path_buf(),
            });
        }
        Ok(normalised)
    }

    /// Resolves `relative` to an existing file under the root.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when the path is malformed, missing, or
    /// does not name a regular file.
    pub fn resolve(&self, relative: &Utf8Path) -> Result<Utf8PathBuf, WorkspaceError> {
        let absolute = self.root.join(self.normalise(relative)?);
        match absolute.metadata() {
            Ok(metadata) if metadata.is_file() => Ok(absolute),
            Ok(_) => Err(WorkspaceError::NotAFile {
                path: relative.to_path_buf(),
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                Err(WorkspaceError::NotFound {
                    path: relative.to_path_buf(),
                })
            }
            Err(error) => Err(WorkspaceError::Io {
                path: relative.to_path_buf(),
                source: Arc::new(error),
            }),
        }
    }
}
