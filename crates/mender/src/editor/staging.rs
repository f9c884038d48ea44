//! Staging files and atomic promotion.

use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::warn;

use super::EDITOR_TARGET;

/// Suffix appended to the file stem of a staging copy.
pub(super) const STAGING_SUFFIX: &str = "_patched";

/// Staging path for `target`: `<stem>_patched.<ext>` in the same directory.
#[must_use]
pub fn staging_path(target: &Utf8Path) -> Utf8PathBuf {
    let stem = target.file_stem().unwrap_or_default();
    let name = match target.extension() {
        Some(ext) => format!("{stem}{STAGING_SUFFIX}.{ext}"),
        None => format!("{stem}{STAGING_SUFFIX}"),
    };
    target.with_file_name(name)
}

/// A staged copy of a file, removed when dropped.
#[derive(Debug)]
pub struct StagedFile {
    path: Utf8PathBuf,
}

impl StagedFile {
    /// Creates `path` with `content`.
    ///
    /// The `_patched` name is reserved for staging, so a copy left behind by
    /// an interrupted edit is overwritten rather than treated as a conflict.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from opening or writing the file.
    pub fn create(path: Utf8PathBuf, content: &str) -> io::Result<Self> {
        if path.is_file() {
            warn!(
                target: EDITOR_TARGET,
                path = %path,
                "replacing stale staging file"
            );
        }
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        // From here on the guard owns the file and cleans it up on error.
        let staged = Self { path };
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        Ok(staged)
    }

    /// Location of the staged copy.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Reads the staged content back, including any formatter changes.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from reading the file.
    pub fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(error) = fs::remove_file(&self.path)
            && error.kind() != io::ErrorKind::NotFound
        {
            warn!(
                target: EDITOR_TARGET,
                path = %self.path,
                %error,
                "failed to remove staging file"
            );
        }
    }
}

/// Replaces `path` with `content` via a temporary sibling and a rename.
///
/// The original file's permissions carry over to the replacement.
///
/// # Errors
///
/// Returns the I/O error from creating, writing or renaming the temporary
/// file. The original file is untouched on failure.
pub fn write_atomic(path: &Utf8Path, content: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        temp_file.as_file().set_permissions(metadata.permissions())?;
    }
    temp_file.persist(path).map_err(|error| error.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8")
    }

    #[rstest]
    #[case("pkg/app.py", "pkg/app_patched.py")]
    #[case("Makefile", "Makefile_patched")]
    #[case("src/archive.tar.gz", "src/archive.tar_patched.gz")]
    fn staging_names_are_deterministic(#[case] target: &str, #[case] expected: &str) {
        assert_eq!(staging_path(Utf8Path::new(target)), Utf8PathBuf::from(expected));
    }

    #[test]
    fn staged_file_is_removed_on_drop() {
        let dir = TempDir::new().expect("temp dir");
        let path = utf8(&dir).join("app_patched.py");
        {
            let staged = StagedFile::create(path.clone(), "x = 1\n").expect("stage");
            assert_eq!(staged.read().expect("read"), "x = 1\n");
        }
        assert!(!path.exists());
    }

    #[test]
    fn stale_staging_copies_are_reclaimed() {
        let dir = TempDir::new().expect("temp dir");
        let path = utf8(&dir).join("app_patched.py");
        fs::write(&path, "left over from a killed run\n").expect("write");

        {
            let staged = StagedFile::create(path.clone(), "x = 1\n").expect("stage");
            assert_eq!(staged.read().expect("read"), "x = 1\n");
        }
        assert!(!path.exists());
    }

    #[test]
    fn atomic_write_replaces_content() {
        let dir = TempDir::new().expect("temp dir");
        let path = utf8(&dir).join("app.py");
        fs::write(&path, "old\n").expect("write");

        write_atomic(&path, "new\n").expect("write atomic");
        assert_eq!(fs::read_to_string(&path).expect("read"), "new\n");
        let leftovers = fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(leftovers, 1);
    }
}
