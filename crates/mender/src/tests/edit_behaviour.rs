//! Behavioural tests for the gated edit loop.

use std::cell::RefCell;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::support::{ScratchRepo, handlers_module};
use crate::editor::{EditOutcome, EditRequest, Editor};
use crate::gate::ConfigurableGate;
use crate::summarizer::CannedSummarizer;
use crate::workspace::Workspace;

const SUMMARY: &str = "name 'sock' is not defined";

struct EditWorld {
    repo: ScratchRepo,
    target: String,
    before: Option<String>,
    gate: Arc<ConfigurableGate>,
    request: Option<EditRequest>,
    outcome: Option<EditOutcome>,
}

impl EditWorld {
    fn new() -> Self {
        Self {
            repo: ScratchRepo::new(),
            target: String::new(),
            before: None,
            gate: Arc::new(ConfigurableGate::passing()),
            request: None,
            outcome: None,
        }
    }

    fn edit(&mut self, start: usize, end: usize, patch: &str) {
        self.before = Some(self.repo.read(&self.target));
        let request = EditRequest::new(self.target.as_str(), start, end, patch)
            .with_context("behaviour test");
        let mut editor = Editor::new(
            Workspace::new(self.repo.root().clone()),
            self.gate.clone(),
            Arc::new(CannedSummarizer::new(SUMMARY)),
        );
        self.outcome = Some(editor.edit(&request).expect("edit"));
        self.request = Some(request);
    }

    fn outcome(&self) -> &EditOutcome {
        self.outcome.as_ref().expect("edit attempted")
    }

    fn description(&self) -> String {
        self.outcome()
            .describe(self.request.as_ref().expect("edit attempted"))
    }
}

#[fixture]
fn world() -> RefCell<EditWorld> {
    RefCell::new(EditWorld::new())
}

fn unquote(value: &str) -> String {
    value.trim_matches('"').replace("\\n", "\n")
}

#[given("a twenty-line Python module {path}")]
fn given_module(world: &RefCell<EditWorld>, path: String) {
    let mut w = world.borrow_mut();
    w.target = unquote(&path);
    w.repo.write(&w.target, &handlers_module());
}

#[given("a validation gate that passes")]
fn given_passing_gate(world: &RefCell<EditWorld>) {
    world.borrow_mut().gate = Arc::new(ConfigurableGate::passing());
}

#[given("a validation gate that reports {diagnostic}")]
fn given_failing_gate(world: &RefCell<EditWorld>, diagnostic: String) {
    world.borrow_mut().gate = Arc::new(ConfigurableGate::failing(unquote(&diagnostic)));
}

#[given("a validation gate that times out")]
fn given_timing_out_gate(world: &RefCell<EditWorld>) {
    world.borrow_mut().gate = Arc::new(ConfigurableGate::timing_out());
}

#[when("lines {start} to {end} are replaced with {patch}")]
fn when_replaced(world: &RefCell<EditWorld>, start: usize, end: usize, patch: String) {
    world.borrow_mut().edit(start, end, &unquote(&patch));
}

#[then("the edit is applied")]
fn then_applied(world: &RefCell<EditWorld>) {
    let w = world.borrow();
    assert!(w.outcome().is_applied(), "expected applied: {:?}", w.outcome());
}

#[then("the edit is rejected")]
fn then_rejected(world: &RefCell<EditWorld>) {
    let w = world.borrow();
    assert!(
        matches!(w.outcome(), EditOutcome::Rejected { .. }),
        "expected rejection: {:?}",
        w.outcome()
    );
}

#[then("the edit fails validation")]
fn then_failed(world: &RefCell<EditWorld>) {
    let w = world.borrow();
    assert!(
        matches!(w.outcome(), EditOutcome::Failed { .. }),
        "expected failure: {:?}",
        w.outcome()
    );
}

#[then("the file has {count} lines")]
fn then_line_count(world: &RefCell<EditWorld>, count: usize) {
    let w = world.borrow();
    assert_eq!(w.repo.read(&w.target).lines().count(), count);
}

#[then("line {line} reads {text}")]
fn then_line_reads(world: &RefCell<EditWorld>, line: usize, text: String) {
    let w = world.borrow();
    let content = w.repo.read(&w.target);
    assert_eq!(content.lines().nth(line - 1), Some(unquote(&text).as_str()));
}

#[then("the file is unchanged")]
fn then_unchanged(world: &RefCell<EditWorld>) {
    let w = world.borrow();
    assert_eq!(Some(w.repo.read(&w.target)), w.before);
}

#[then("no staging file remains")]
fn then_no_staging(world: &RefCell<EditWorld>) {
    let w = world.borrow();
    assert!(w.repo.staging_leftovers(&w.target).is_empty());
}

#[then("the response mentions {snippet}")]
fn then_response_mentions(world: &RefCell<EditWorld>, snippet: String) {
    let w = world.borrow();
    let description = w.description();
    let snippet = unquote(&snippet);
    assert!(
        description.contains(&snippet),
        "expected {snippet:?} in {description:?}"
    );
}

#[then("the gate was not consulted")]
fn then_gate_skipped(world: &RefCell<EditWorld>) {
    assert!(world.borrow().gate.calls().is_empty());
}

// =============================================================================
// Scenario Bindings
// =============================================================================

#[scenario(
    path = "tests/features/edit.feature",
    name = "A valid single-line edit is applied"
)]
fn valid_edit(world: RefCell<EditWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/edit.feature",
    name = "An inverted range is rejected"
)]
fn inverted_range(world: RefCell<EditWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/edit.feature",
    name = "A failing gate returns a summary and keeps the file"
)]
fn failing_gate(world: RefCell<EditWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/edit.feature",
    name = "A checker timeout is reported without touching the file"
)]
fn gate_timeout(world: RefCell<EditWorld>) {
    drop(world);
}
