//! Behaviour-driven step definitions for structural ranges and syntax checks.

use std::cell::RefCell;
use std::path::PathBuf;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::{CodeStructureIndex, StructureKind, SyntaxChecker, SyntaxFailure};

/// State shared across BDD steps.
#[derive(Default)]
struct TestWorld {
    path: PathBuf,
    content: String,
    index: Option<CodeStructureIndex>,
    failures: Vec<SyntaxFailure>,
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

/// Strips surrounding quotes and expands escaped newlines.
fn unquote(s: &str) -> String {
    s.trim_matches('"').replace("\\n", "\n")
}

#[given("a file {name} with content {content}")]
fn given_file(world: &RefCell<TestWorld>, name: String, content: String) {
    let mut w = world.borrow_mut();
    w.path = PathBuf::from(unquote(&name));
    w.content = unquote(&content);
}

#[when("the structure index is built")]
fn when_index_built(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let index = CodeStructureIndex::for_path(&w.path, &w.content);
    w.index = Some(index);
}

#[when("the file is syntax checked")]
fn when_syntax_checked(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let failures = SyntaxChecker::new()
        .check(&w.path, &w.content)
        .expect("check");
    w.failures = failures;
}

fn assert_resolves(
    world: &RefCell<TestWorld>,
    line: usize,
    kind: StructureKind,
    start: usize,
    end: usize,
) {
    let w = world.borrow();
    let index = w.index.as_ref().expect("index built");
    let range = index.innermost_containing(line).expect("containing range");
    assert_eq!(range.kind, kind);
    assert_eq!((range.start_line, range.end_line), (start, end));
}

#[then("line {line} resolves to a function spanning lines {start} to {end}")]
fn then_function(world: &RefCell<TestWorld>, line: usize, start: usize, end: usize) {
    assert_resolves(world, line, StructureKind::Function, start, end);
}

#[then("line {line} resolves to a class spanning lines {start} to {end}")]
fn then_class(world: &RefCell<TestWorld>, line: usize, start: usize, end: usize) {
    assert_resolves(world, line, StructureKind::Class, start, end);
}

#[then("the index is empty")]
fn then_index_empty(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(w.index.as_ref().expect("index built").is_empty());
}

#[then("no syntax failures are reported")]
fn then_no_failures(world: &RefCell<TestWorld>) {
    assert!(world.borrow().failures.is_empty());
}

#[then("a syntax failure is reported for {name}")]
fn then_failure_for(world: &RefCell<TestWorld>, name: String) {
    let w = world.borrow();
    let expected = unquote(&name);
    assert!(!w.failures.is_empty(), "expected failures");
    assert!(
        w.failures
            .iter()
            .all(|failure| failure.path.to_string_lossy() == expected),
        "unexpected paths: {:?}",
        w.failures
    );
}

// =============================================================================
// Scenario Bindings
// =============================================================================

#[scenario(
    path = "tests/features/structure.feature",
    name = "A method anchors to its own definition inside a class"
)]
fn method_anchor(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/structure.feature",
    name = "A class body line outside any method anchors to the class"
)]
fn class_anchor(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/structure.feature",
    name = "Malformed source degrades to an empty index"
)]
fn malformed_source(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/structure.feature",
    name = "Unsupported files pass the syntax check"
)]
fn unsupported_files(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/structure.feature",
    name = "Broken Rust fails the syntax check"
)]
fn broken_rust(world: RefCell<TestWorld>) {
    drop(world);
}
