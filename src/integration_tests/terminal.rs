//! Runs that end through `fail` or `success`.

use super::state::Expected;
use super::util;
use crate::report::line::{MessageType, StatusLine};

/// Report failure halfway.
/// The process must exit with 0, and the last line must say FAIL.
#[test]
fn fail_exits_zero() {
    if util::is_child() {
        let r = util::child_reporter();
        r.start(4).unwrap();
        r.progress(2).unwrap();
        r.fail();
    }
    let run = util::run_child(&util::test_name(module_path!(), "fail_exits_zero"));
    run.assert(Expected::fails(&[50]));

    let last = run.stderr.lines().last().expect("no output from child");
    assert_eq!(last, "{{itest_run} FAIL}");
}

/// Run all the steps, then report success.
#[test]
fn success_exits_zero() {
    if util::is_child() {
        let r = util::child_reporter();
        r.start(3).unwrap();
        for done in 1..=3 {
            crate::judge_debug!(r, "case {} passed", done).unwrap();
            r.progress(done).unwrap();
        }
        r.success();
    }
    let run = util::run_child(&util::test_name(module_path!(), "success_exits_zero"));
    run.assert(Expected::succeeds(&[33, 66, 100]));

    let (report, _) = run.judge();
    assert_eq!(report.debug_text, "case 1 passed\ncase 2 passed\ncase 3 passed\n");
    let last = StatusLine::parse(run.stderr.lines().last().expect("no output from child"))
        .expect("last line is a status line");
    assert_eq!(last.kind, MessageType::Success);
    let elapsed: u64 = last.payload.expect("elapsed time").parse().expect("numeric time");
    assert!(elapsed < 60_000, "implausible elapsed time {}", elapsed);
}

/// Fail without ever starting: no session is needed to fail.
#[test]
fn fail_without_start() {
    if util::is_child() {
        util::child_reporter().fail();
    }
    let run = util::run_child(&util::test_name(module_path!(), "fail_without_start"));
    run.assert(Expected::fails(&[]));
    assert_eq!(run.stderr, "{{itest_run} FAIL}\n");
}

/// Success with no start time cannot be measured, and must not look like
/// a success to the judge.
#[test]
fn success_without_start_panics() {
    if util::is_child() {
        util::child_reporter().success();
    }
    let run = util::run_child(&util::test_name(module_path!(), "success_without_start_panics"));
    run.assert(Expected::panics());
    assert!(!run.stderr.contains("SUCCESS"));
}
