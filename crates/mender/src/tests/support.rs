//! Fixture sources and a scratch repository shared by the test suites.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Python module whose `connect` function spans lines 30-45.
///
/// `connect` appears nowhere else; `socket` also appears on line 1.
pub fn service_module() -> String {
    let mut lines: Vec<String> = vec!["import socket".to_owned()];
    lines.extend((2..=28).map(|n| format!("SETTING_{n} = {n}")));
    lines.push(String::new());
    lines.push("def connect(host, port):".to_owned());
    lines.push("    sock = socket.socket()".to_owned());
    lines.extend((32..=44).map(|n| format!("    step_{n} = {n}")));
    lines.push("    return sock".to_owned());
    lines.extend((46..=60).map(|n| format!("TRAILER_{n} = {n}")));
    terminated(&lines)
}

/// Twenty-line Python module; line 5 is the body of `lookup`.
pub fn handlers_module() -> String {
    let mut lines = vec![
        "import json".to_owned(),
        String::new(),
        String::new(),
        "def lookup(key):".to_owned(),
        "    return CACHE.get(key)".to_owned(),
        String::new(),
        String::new(),
    ];
    lines.extend((8..=20).map(|n| format!("VALUE_{n} = {n}")));
    terminated(&lines)
}

fn terminated(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Temporary repository with UTF-8 paths.
pub struct ScratchRepo {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl ScratchRepo {
    /// Creates an empty repository.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 root");
        Self { _dir: dir, root }
    }

    /// Repository root.
    pub fn root(&self) -> &Utf8PathBuf {
        &self.root
    }

    /// Writes `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, content).expect("write fixture");
    }

    /// Reads `relative` back.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative)).expect("read fixture")
    }

    /// Names of files in the directory of `relative` that look like staging
    /// copies.
    pub fn staging_leftovers(&self, relative: &str) -> Vec<String> {
        let directory = self
            .root
            .join(relative)
            .parent()
            .map_or_else(|| self.root.clone(), Utf8Path::to_path_buf);
        fs::read_dir(directory)
            .expect("list directory")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.contains("_patched"))
            .collect()
    }
}
