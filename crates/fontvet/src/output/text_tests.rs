// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use termcolor::NoColor;

use super::*;
use crate::aggregator::Aggregator;
use crate::event::ResultEvent;
use crate::render;

fn rendered(aggregator: &Aggregator, options: FormatOptions) -> String {
    let report = render::project(&aggregator.snapshot());
    let mut formatter = TextFormatter::new(NoColor::new(Vec::new()), options);
    formatter.write_report(&report).unwrap();
    String::from_utf8(formatter.into_inner().into_inner()).unwrap()
}

#[test]
fn rows_render_with_status_id_and_description() {
    let mut aggregator = Aggregator::new();
    aggregator.start("universal").unwrap();
    aggregator
        .ingest(
            ResultEvent::for_file("com.example/check/a", ResultStatus::Fail, "Foo-Regular.ttf")
                .with_description("Checks something important.")
                .with_log(ResultStatus::Fail, "it broke"),
        )
        .unwrap();
    aggregator.finish().unwrap();

    let text = rendered(&aggregator, FormatOptions::default());
    assert!(text.contains("FAIL com.example/check/a: Checks something important."));
    assert!(text.contains("  Foo-Regular.ttf"));
    assert!(text.contains("    FAIL: it broke"));
}

#[test]
fn family_lines_render_without_a_file_header() {
    let mut aggregator = Aggregator::new();
    aggregator.start("universal").unwrap();
    aggregator
        .ingest(
            ResultEvent::family("com.example/check/family", ResultStatus::Warn)
                .with_log(ResultStatus::Warn, "family-wide issue"),
        )
        .unwrap();

    let text = rendered(&aggregator, FormatOptions::default());
    assert!(text.contains("  WARN: family-wide issue"));
}

#[test]
fn summary_counts_appear_in_severity_order() {
    let mut aggregator = Aggregator::new();
    aggregator.start("universal").unwrap();
    aggregator
        .ingest(ResultEvent::family("a", ResultStatus::Pass))
        .unwrap();
    aggregator
        .ingest(ResultEvent::family("b", ResultStatus::Fail))
        .unwrap();
    aggregator.update_percent(100.0).unwrap();
    aggregator.finish().unwrap();

    let text = rendered(&aggregator, FormatOptions::default());
    let summary = text.lines().last().unwrap();
    assert_eq!(summary, "FAIL 1  PASS 1");
}

#[test]
fn incomplete_run_shows_percentage() {
    let mut aggregator = Aggregator::new();
    aggregator.start("universal").unwrap();
    aggregator
        .ingest(ResultEvent::family("a", ResultStatus::Pass))
        .unwrap();
    aggregator.update_percent(40.0).unwrap();

    let text = rendered(&aggregator, FormatOptions::default());
    assert!(text.contains("(40% complete)"));
}

#[test]
fn empty_report_says_so() {
    let mut aggregator = Aggregator::new();
    aggregator.start("universal").unwrap();
    let text = rendered(&aggregator, FormatOptions::default());
    assert!(text.contains("no results"));
}

#[test]
fn log_lines_truncate_at_the_limit() {
    let mut aggregator = Aggregator::new();
    aggregator.start("universal").unwrap();
    let mut event = ResultEvent::for_file("chk", ResultStatus::Warn, "A.ttf");
    for i in 0..5 {
        event = event.with_log(ResultStatus::Warn, format!("line {i}"));
    }
    aggregator.ingest(event).unwrap();

    let text = rendered(&aggregator, FormatOptions::with_limit(2));
    assert!(text.contains("line 0"));
    assert!(text.contains("line 1"));
    assert!(!text.contains("line 2"));
    assert!(text.contains("..."));
}

#[test]
fn full_report_output_is_stable() {
    let mut aggregator = Aggregator::new();
    aggregator.start("universal").unwrap();
    aggregator
        .ingest(
            ResultEvent::for_file("com.example/check/b", ResultStatus::Fail, "Foo-Regular.ttf")
                .with_description("Fails loudly.")
                .with_log(ResultStatus::Fail, "broken"),
        )
        .unwrap();
    aggregator
        .ingest(
            ResultEvent::family("com.example/check/a", ResultStatus::Skip)
                .with_log(ResultStatus::Skip, "not applicable"),
        )
        .unwrap();
    aggregator.update_percent(100.0).unwrap();
    aggregator.finish().unwrap();

    let text = rendered(&aggregator, FormatOptions::default());
    let expected = "\
FAIL com.example/check/b: Fails loudly.
  Foo-Regular.ttf
    FAIL: broken
SKIP com.example/check/a
  SKIP: not applicable
FAIL 1  SKIP 1
";
    similar_asserts::assert_eq!(text, expected);
}

#[test]
fn warnings_are_printed() {
    let mut aggregator =
        Aggregator::new().with_registry(std::sync::Arc::new(crate::test_utils::small_registry()));
    aggregator.start("universal").unwrap();
    aggregator
        .ingest(ResultEvent::family("com.example/check/mystery", ResultStatus::Pass))
        .unwrap();

    let text = rendered(&aggregator, FormatOptions::default());
    assert!(text.contains("warning: unknown check id 'com.example/check/mystery'"));
}
