//! Tests for the diagnostic line logged on every foreground resume.

use chrono::Duration;

use integration_tests::{logs::LogCapture, setup::TestContext};
use session_core::{EventPlugin, Lifecycle};

const RESUME_MESSAGE: &str = "Amplitude Session ID:";

/// Resume with a live session logs its id
#[test]
fn test_resume_logs_current_id() {
    let mut ctx = TestContext::new();
    let logs = LogCapture::new();

    let id = logs.capture("info", || {
        ctx.manager.on_foreground_resume();
        ctx.manager.session_id().unwrap()
    });

    let lines = logs.lines_containing(RESUME_MESSAGE);
    assert_eq!(lines.len(), 1, "expected one resume line, got {:?}", lines);
    assert!(lines[0].contains(&format!("session_id={}", id)), "line: {}", lines[0]);
}

/// Resume after rotation logs the new id, one line per resume
#[test]
fn test_resume_logs_rotated_id() {
    let mut ctx = TestContext::new();
    let logs = LogCapture::new();

    logs.capture("info", || {
        ctx.manager.on_foreground_resume();
        ctx.clock.advance(Duration::minutes(10));
        ctx.manager.on_foreground_resume();
    });

    let lines = logs.lines_containing(RESUME_MESSAGE);
    assert_eq!(lines.len(), 2);
    let rotated = ctx.manager.session_id().unwrap();
    assert!(lines[1].contains(&format!("session_id={}", rotated)), "line: {}", lines[1]);
}

/// Provider with no id logs the -1 sentinel
#[test]
fn test_resume_logs_sentinel_when_provider_has_no_id() {
    let mut ctx = TestContext::with_provider(|| None::<i64>);
    let logs = LogCapture::new();

    logs.capture("info", || ctx.manager.on_foreground_resume());

    let lines = logs.lines_containing(RESUME_MESSAGE);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("session_id=-1"), "line: {}", lines[0]);
}

/// Reset followed by a resume inside the gap logs the -1 sentinel
#[test]
fn test_resume_logs_sentinel_after_reset_within_gap() {
    let mut ctx = TestContext::new();
    let logs = LogCapture::new();

    logs.capture("info", || {
        ctx.manager.reset();
        ctx.clock.advance(Duration::seconds(30));
        ctx.manager.on_foreground_resume();
    });

    assert_eq!(ctx.manager.session_id(), None);
    let lines = logs.lines_containing(RESUME_MESSAGE);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("session_id=-1"), "line: {}", lines[0]);
}

/// Filter above info suppresses the resume line
#[test]
fn test_resume_line_respects_filter() {
    let mut ctx = TestContext::new();
    let logs = LogCapture::new();

    logs.capture("warn", || ctx.manager.on_foreground_resume());

    assert!(logs.lines_containing(RESUME_MESSAGE).is_empty());
}
