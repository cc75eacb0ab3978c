// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Mutex;

use proptest::prelude::*;

use super::*;
use crate::test_utils::small_registry;

fn started() -> Aggregator {
    let mut aggregator = Aggregator::new();
    aggregator.start("universal").unwrap();
    aggregator
}

#[test]
fn start_transitions_to_in_progress() {
    let aggregator = started();
    assert_eq!(aggregator.state(), RunState::InProgress);
}

#[test]
fn start_while_active_is_invalid() {
    let mut aggregator = started();
    let err = aggregator.start("universal").unwrap_err();
    assert!(matches!(err, Error::InvalidState { operation: "start", .. }));
}

#[test]
fn reset_clears_an_abandoned_run() {
    let mut aggregator = started();
    aggregator
        .ingest(ResultEvent::family("chk", ResultStatus::Fail))
        .unwrap();
    aggregator.reset();
    assert_eq!(aggregator.state(), RunState::NotStarted);

    // The next run starts from a clean slate.
    aggregator.start("opentype").unwrap();
    assert!(aggregator.check("chk").is_none());
    assert_eq!(aggregator.progress().total(), 0);
}

#[test]
fn ingest_before_start_is_invalid_state() {
    let mut aggregator = Aggregator::new();
    let err = aggregator
        .ingest(ResultEvent::family("chk", ResultStatus::Pass))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState { operation: "ingest", .. }));
}

#[test]
fn ingest_after_finish_is_a_protocol_violation_and_does_not_mutate() {
    let mut aggregator = started();
    aggregator
        .ingest(ResultEvent::family("chk", ResultStatus::Warn))
        .unwrap();
    aggregator.finish().unwrap();

    let err = aggregator
        .ingest(ResultEvent::family("late", ResultStatus::Fail))
        .unwrap_err();
    assert!(matches!(err, Error::ProtocolViolation(_)));
    assert!(aggregator.check("late").is_none());
    assert_eq!(aggregator.progress().count(ResultStatus::Fail), 0);
}

#[test]
fn ingest_after_fail_is_a_protocol_violation() {
    let mut aggregator = started();
    aggregator.fail("engine exploded").unwrap();
    let err = aggregator
        .ingest(ResultEvent::family("chk", ResultStatus::Pass))
        .unwrap_err();
    assert!(matches!(err, Error::ProtocolViolation(_)));
    assert_eq!(aggregator.error(), Some("engine exploded"));
}

#[test]
fn worst_status_ignores_arrival_order() {
    for (first, second) in [
        (ResultStatus::Fail, ResultStatus::Pass),
        (ResultStatus::Pass, ResultStatus::Fail),
    ] {
        let mut aggregator = started();
        aggregator
            .ingest(ResultEvent::for_file("chk", first, "A.ttf"))
            .unwrap();
        aggregator
            .ingest(ResultEvent::for_file("chk", second, "B.ttf"))
            .unwrap();
        assert_eq!(
            aggregator.check("chk").unwrap().worst_status,
            ResultStatus::Fail
        );
    }
}

#[test]
fn skip_alone_stays_skip() {
    let mut aggregator = started();
    aggregator
        .ingest(ResultEvent::family("chk", ResultStatus::Skip))
        .unwrap();
    assert_eq!(
        aggregator.check("chk").unwrap().worst_status,
        ResultStatus::Skip
    );
}

#[test]
fn pass_overrides_skip() {
    // PASS is more severe than SKIP under the ranking.
    let mut aggregator = started();
    aggregator
        .ingest(ResultEvent::for_file("chk", ResultStatus::Skip, "A.ttf"))
        .unwrap();
    aggregator
        .ingest(ResultEvent::for_file("chk", ResultStatus::Pass, "B.ttf"))
        .unwrap();
    assert_eq!(
        aggregator.check("chk").unwrap().worst_status,
        ResultStatus::Pass
    );
}

#[test]
fn log_lines_per_file_preserve_arrival_order() {
    let mut aggregator = started();
    aggregator
        .ingest(
            ResultEvent::for_file("chk", ResultStatus::Warn, "Foo-Regular.ttf")
                .with_log(ResultStatus::Warn, "A")
                .with_log(ResultStatus::Warn, "B"),
        )
        .unwrap();
    aggregator
        .ingest(
            ResultEvent::for_file("chk", ResultStatus::Info, "Foo-Regular.ttf")
                .with_log(ResultStatus::Info, "C"),
        )
        .unwrap();

    let check = aggregator.check("chk").unwrap();
    let bucket = &check.logs[&LogBucket::File("Foo-Regular.ttf".to_string())];
    let messages: Vec<&str> = bucket.iter().map(|l| l.message.as_str()).collect();
    assert_eq!(messages, ["A", "B", "C"]);
}

#[test]
fn duplicate_event_does_not_duplicate_logs_or_counts() {
    let mut aggregator = started();
    let event = ResultEvent::for_file("chk", ResultStatus::Warn, "A.ttf")
        .with_log(ResultStatus::Warn, "m1");
    aggregator.ingest(event.clone()).unwrap();
    aggregator.ingest(event).unwrap();

    let check = aggregator.check("chk").unwrap();
    assert_eq!(check.logs[&LogBucket::File("A.ttf".to_string())].len(), 1);
    assert_eq!(aggregator.progress().count(ResultStatus::Warn), 1);
}

#[test]
fn duplicate_event_still_notifies_the_sink() {
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    let mut aggregator = Aggregator::new().with_update_sink(Arc::new(move |id: &str| {
        sink_seen.lock().unwrap().push(id.to_string());
    }));
    aggregator.start("universal").unwrap();

    let event = ResultEvent::family("chk", ResultStatus::Pass);
    aggregator.ingest(event.clone()).unwrap();
    aggregator.ingest(event).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["chk", "chk"]);
}

#[test]
fn end_to_end_scenario() {
    let mut aggregator = started();
    aggregator
        .ingest(
            ResultEvent::for_file("x", ResultStatus::Warn, "A.ttf")
                .with_log(ResultStatus::Warn, "m1"),
        )
        .unwrap();
    aggregator
        .ingest(
            ResultEvent::for_file("x", ResultStatus::Fail, "B.ttf")
                .with_log(ResultStatus::Fail, "m2"),
        )
        .unwrap();
    aggregator.finish().unwrap();

    let check = aggregator.check("x").unwrap();
    assert_eq!(check.worst_status, ResultStatus::Fail);
    assert_eq!(
        check.logs[&LogBucket::File("A.ttf".to_string())][0].message,
        "m1"
    );
    assert_eq!(
        check.logs[&LogBucket::File("B.ttf".to_string())][0].message,
        "m2"
    );
    let progress = aggregator.progress();
    assert_eq!(progress.count(ResultStatus::Warn), 1);
    assert_eq!(progress.count(ResultStatus::Fail), 1);
    assert_eq!(aggregator.state(), RunState::Done);
}

#[test]
fn family_bucket_is_used_when_filename_is_absent() {
    let mut aggregator = started();
    aggregator
        .ingest(
            ResultEvent::family("chk", ResultStatus::Info).with_log(ResultStatus::Info, "family"),
        )
        .unwrap();
    let check = aggregator.check("chk").unwrap();
    assert!(check.logs.contains_key(&LogBucket::Family));
}

#[test]
fn unknown_check_id_is_warned_but_aggregated() {
    let mut aggregator = Aggregator::new().with_registry(Arc::new(small_registry()));
    aggregator.start("universal").unwrap();
    aggregator
        .ingest(
            ResultEvent::family("com.example/check/mystery", ResultStatus::Pass)
                .with_description("A mystery check"),
        )
        .unwrap();

    assert!(aggregator.check("com.example/check/mystery").is_some());
    assert_eq!(aggregator.warnings().len(), 1);
    assert!(aggregator.warnings()[0].contains("com.example/check/mystery"));
}

#[test]
fn known_check_id_produces_no_warning() {
    let mut aggregator = Aggregator::new().with_registry(Arc::new(small_registry()));
    aggregator.start("universal").unwrap();
    aggregator
        .ingest(ResultEvent::family(
            "com.google.fonts/check/unitsperem",
            ResultStatus::Pass,
        ))
        .unwrap();
    assert!(aggregator.warnings().is_empty());
}

#[test]
fn environment_limited_error_gets_the_fixed_excuse() {
    let mut aggregator = started();
    aggregator
        .ingest(
            ResultEvent::for_file("com.google.fonts/check/ots", ResultStatus::Error, "A.ttf")
                .with_log(ResultStatus::Error, "Traceback (most recent call last): ..."),
        )
        .unwrap();

    let check = aggregator.check("com.google.fonts/check/ots").unwrap();
    let bucket = &check.logs[&LogBucket::File("A.ttf".to_string())];
    assert_eq!(bucket.len(), 1);
    assert!(bucket[0].message.contains("OpenType Sanitizer"));
    assert!(!bucket[0].message.contains("Traceback"));
}

#[test]
fn unlisted_error_keeps_raw_logs() {
    let mut aggregator = started();
    aggregator
        .ingest(
            ResultEvent::family("com.example/check/odd", ResultStatus::Error)
                .with_log(ResultStatus::Error, "KeyError: 'glyf'"),
        )
        .unwrap();
    let check = aggregator.check("com.example/check/odd").unwrap();
    assert_eq!(check.logs[&LogBucket::Family][0].message, "KeyError: 'glyf'");
}

#[test]
fn percent_is_monotonically_non_decreasing() {
    let mut aggregator = started();
    aggregator.update_percent(30.0).unwrap();
    aggregator.update_percent(10.0).unwrap();
    assert_eq!(aggregator.progress().percent, 30.0);
    aggregator.update_percent(75.0).unwrap();
    assert_eq!(aggregator.progress().percent, 75.0);
}

#[test]
fn percent_after_done_is_a_protocol_violation() {
    let mut aggregator = started();
    aggregator.finish().unwrap();
    assert!(matches!(
        aggregator.update_percent(50.0).unwrap_err(),
        Error::ProtocolViolation(_)
    ));
}

#[test]
fn finish_without_start_is_invalid() {
    let mut aggregator = Aggregator::new();
    assert!(matches!(
        aggregator.finish().unwrap_err(),
        Error::InvalidState { .. }
    ));
}

#[test]
fn snapshot_reflects_profile_and_state() {
    let mut aggregator = started();
    aggregator
        .ingest(ResultEvent::family("chk", ResultStatus::Pass))
        .unwrap();
    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.state, RunState::InProgress);
    assert_eq!(snapshot.profile.as_deref(), Some("universal"));
    assert_eq!(snapshot.checks.len(), 1);
}

proptest! {
    /// The worst status is the minimum severity rank over all events,
    /// in any arrival order.
    #[test]
    fn worst_status_is_order_insensitive(statuses in prop::collection::vec(0u8..6, 1..12)) {
        let statuses: Vec<ResultStatus> =
            statuses.into_iter().map(|i| ResultStatus::ALL[i as usize]).collect();

        let mut aggregator = Aggregator::new();
        aggregator.start("universal").unwrap();
        for (index, status) in statuses.iter().enumerate() {
            // Distinct file per event so no event is taken as a duplicate.
            aggregator
                .ingest(ResultEvent::for_file("chk", *status, format!("f{index}.ttf")))
                .unwrap();
        }

        let expected = statuses.iter().copied().reduce(ResultStatus::worst).unwrap();
        prop_assert_eq!(aggregator.check("chk").unwrap().worst_status, expected);
    }
}
