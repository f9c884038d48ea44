//! Behavioural tests for keyword and range location.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::support::{ScratchRepo, service_module};
use crate::locator::{
    Excerpt, LocateError, LocateRequest, Located, Locator, LocatorSettings, RangeOrigin,
};
use crate::workspace::Workspace;

#[derive(Default)]
struct LocateWorld {
    repo: Option<ScratchRepo>,
    path: String,
    results: Vec<Result<Located, LocateError>>,
}

impl LocateWorld {
    fn locate(&mut self, request: &LocateRequest) {
        let repo = self.repo.as_ref().expect("repository prepared");
        let locator = Locator::new(
            Workspace::new(repo.root().clone()),
            LocatorSettings::default(),
        );
        self.results.push(locator.locate(request));
    }

    fn last(&self) -> &Result<Located, LocateError> {
        self.results.last().expect("locate attempted")
    }
}

#[fixture]
fn world() -> RefCell<LocateWorld> {
    RefCell::new(LocateWorld::default())
}

fn unquote(value: &str) -> String {
    value.trim_matches('"').to_owned()
}

#[given("the service module {path}")]
fn given_service_module(world: &RefCell<LocateWorld>, path: String) {
    let mut w = world.borrow_mut();
    let repo = ScratchRepo::new();
    w.path = unquote(&path);
    repo.write(&w.path, &service_module());
    w.repo = Some(repo);
}

#[when("the keyword {keyword} is searched")]
fn when_keyword(world: &RefCell<LocateWorld>, keyword: String) {
    let mut w = world.borrow_mut();
    let request = LocateRequest::new(w.path.as_str()).with_keywords([unquote(&keyword)]);
    w.locate(&request);
}

#[when("the search for {keyword} is run twice")]
fn when_keyword_twice(world: &RefCell<LocateWorld>, keyword: String) {
    let mut w = world.borrow_mut();
    let request = LocateRequest::new(w.path.as_str()).with_keywords([unquote(&keyword)]);
    w.locate(&request);
    w.locate(&request);
}

#[when("lines {start} to {end} are requested")]
fn when_range(world: &RefCell<LocateWorld>, start: usize, end: usize) {
    let mut w = world.borrow_mut();
    let request = LocateRequest::new(w.path.as_str()).with_range(start, end);
    w.locate(&request);
}

#[then("the excerpt covers lines {start} to {end} of a function")]
fn then_function_excerpt(world: &RefCell<LocateWorld>, start: usize, end: usize) {
    let w = world.borrow();
    let Ok(Located::Excerpt(Excerpt::Keywords(result))) = w.last() else {
        panic!("expected keyword excerpt, got {:?}", w.last());
    };
    let hits = &result.matches.first().expect("one keyword").hits;
    assert_eq!(hits.len(), 1, "expected a single hit: {hits:?}");
    let hit = hits.first().expect("hit");
    assert_eq!((hit.range.start_line, hit.range.end_line), (start, end));
    assert!(matches!(hit.range.origin, RangeOrigin::Structure(_)));
    let first_numbered = hit.excerpt.lines().next().unwrap_or_default();
    let last_numbered = hit.excerpt.lines().last().unwrap_or_default();
    assert!(first_numbered.starts_with(&format!("{start} ")));
    assert!(last_numbered.starts_with(&format!("{end} ")));
}

#[then("the request is rejected as too wide")]
fn then_too_wide(world: &RefCell<LocateWorld>) {
    let w = world.borrow();
    let Err(error) = w.last() else {
        panic!("expected rejection, got {:?}", w.last());
    };
    assert!(matches!(error, LocateError::WindowTooWide { .. }));
    assert!(error.to_string().contains("exceeds the limit of 150 lines"));
}

#[then("nothing is found")]
fn then_nothing_found(world: &RefCell<LocateWorld>) {
    let w = world.borrow();
    let Ok(located) = w.last() else {
        panic!("expected a result, got {:?}", w.last());
    };
    assert!(located.is_nothing_found());
    assert!(located.to_string().starts_with("No keyword found in the file"));
}

#[then("both excerpts are identical")]
fn then_identical(world: &RefCell<LocateWorld>) {
    let w = world.borrow();
    let rendered: Vec<String> = w
        .results
        .iter()
        .map(|result| result.as_ref().expect("located").to_string())
        .collect();
    assert_eq!(rendered.len(), 2);
    assert_eq!(rendered.first(), rendered.last());
}

// =============================================================================
// Scenario Bindings
// =============================================================================

#[scenario(
    path = "tests/features/locate.feature",
    name = "A keyword inside a function expands to the whole function"
)]
fn keyword_expands(world: RefCell<LocateWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/locate.feature",
    name = "An over-wide range is rejected"
)]
fn over_wide_range(world: RefCell<LocateWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/locate.feature",
    name = "An absent keyword finds nothing"
)]
fn absent_keyword(world: RefCell<LocateWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/locate.feature",
    name = "Repeated searches return identical excerpts"
)]
fn repeated_search(world: RefCell<LocateWorld>) {
    drop(world);
}
