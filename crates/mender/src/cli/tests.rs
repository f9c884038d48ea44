//! Unit tests for the CLI runtime.

use std::ffi::OsString;
use std::fs;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

/// Loader returning a fixed configuration without touching the
/// environment.
struct FixedConfig(Config);

impl ConfigLoader for FixedConfig {
    fn load(&self, _args: &[OsString]) -> Result<Config, CliError> {
        Ok(self.0.clone())
    }
}

/// Configuration that never spawns external tools for `.rs` files.
fn offline_config() -> Config {
    Config {
        checked_extensions: "py".to_owned(),
        formatter_program: String::new(),
        ..Config::default()
    }
}

struct Run {
    code: ExitCode,
    stdout: String,
    stderr: String,
}

struct Repo {
    dir: TempDir,
}

impl Repo {
    fn root(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    fn run(&self, args: &[&str], stdin: &str) -> Run {
        let mut argv: Vec<OsString> =
            vec!["mender".into(), "--workspace".into(), self.root().into()];
        argv.extend(args.iter().map(OsString::from));
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run_with_loader(
            argv,
            stdin.as_bytes(),
            &mut stdout,
            &mut stderr,
            &FixedConfig(offline_config()),
        );
        Run {
            code,
            stdout: String::from_utf8(stdout).expect("utf8 stdout"),
            stderr: String::from_utf8(stderr).expect("utf8 stderr"),
        }
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).expect("read")
    }
}

#[fixture]
fn repo() -> Repo {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join("lib.rs"),
        "pub fn answer() -> u32 {\n    42\n}\n",
    )
    .expect("write fixture");
    Repo { dir }
}

#[rstest]
fn open_prints_the_requested_range(repo: Repo) {
    let run = repo.run(&["open", "lib.rs", "--start", "1", "--end", "2"], "");
    assert_eq!(run.code, ExitCode::SUCCESS);
    assert_eq!(
        run.stdout,
        "The content of lib.rs from line 1 to 2 is:\n1 pub fn answer() -> u32 {\n2     42\n"
    );
}

#[rstest]
fn open_with_a_keyword_shows_the_enclosing_function(repo: Repo) {
    let run = repo.run(&["open", "lib.rs", "-k", "42"], "");
    assert_eq!(run.code, ExitCode::SUCCESS);
    assert!(run.stdout.contains("Results for keyword: 42\n...\n1 pub fn answer() -> u32 {\n"));
}

#[rstest]
fn edit_applies_valid_rust(repo: Repo) {
    let run = repo.run(
        &["edit", "lib.rs", "--start", "2", "--end", "2", "--patch", "    7"],
        "",
    );
    assert_eq!(run.code, ExitCode::SUCCESS, "stderr: {}", run.stderr);
    assert!(run.stdout.starts_with("Successfully edited the file lib.rs"));
    assert_eq!(repo.read("lib.rs"), "pub fn answer() -> u32 {\n    7\n}\n");
}

#[rstest]
fn edit_refuses_broken_rust(repo: Repo) {
    let run = repo.run(
        &["edit", "lib.rs", "--start", "2", "--end", "2", "--patch", "    let = ;"],
        "",
    );
    assert_eq!(run.code, ExitCode::from(1));
    assert!(run.stdout.contains("did not pass validation"));
    assert_eq!(repo.read("lib.rs"), "pub fn answer() -> u32 {\n    42\n}\n");
    assert!(!repo.dir.path().join("lib_patched.rs").exists());
}

#[rstest]
fn edit_reads_the_patch_from_a_file(repo: Repo) {
    let patch = repo.dir.path().join("patch.txt");
    fs::write(&patch, "    0\n").expect("write patch");
    let patch = patch.to_string_lossy().into_owned();

    let run = repo.run(
        &["edit", "lib.rs", "--start", "2", "--end", "2", "--patch-file", &patch],
        "",
    );

    assert_eq!(run.code, ExitCode::SUCCESS, "stderr: {}", run.stderr);
    assert_eq!(repo.read("lib.rs"), "pub fn answer() -> u32 {\n    0\n}\n");
}

#[rstest]
fn missing_patch_is_a_usage_error(repo: Repo) {
    let run = repo.run(&["edit", "lib.rs", "--start", "2", "--end", "2"], "");
    assert_eq!(run.code, ExitCode::from(1));
    assert!(run.stderr.contains("--patch"));
}

#[rstest]
fn request_mode_answers_each_line(repo: Repo) {
    let stdin = concat!(
        r#"{"tool":"open_file","relative_file_path":"lib.rs","start_line":2,"end_line":2}"#,
        "\n",
        r#"{"tool":"open_file","relative_file_path":"lib.rs"}"#,
        "\n",
    );
    let run = repo.run(&["request"], stdin);

    assert_eq!(run.code, ExitCode::from(1));
    let lines: Vec<&str> = run.stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.first().is_some_and(|line| line.contains(r#""status":"success""#)));
    assert!(lines.get(1).is_some_and(|line| line.contains(r#""status":"usage_error""#)));
}

#[test]
fn help_goes_to_stdout() {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run_with_loader(
        ["mender", "--help"].map(OsString::from),
        b"".as_slice(),
        &mut stdout,
        &mut stderr,
        &FixedConfig(offline_config()),
    );
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(String::from_utf8_lossy(&stdout).contains("Usage: mender"));
    assert!(stderr.is_empty());
}
