//! Command Queue Tests

use sqclient::protocol::{Command, Record};
use sqclient::session::{CommandQueue, QueuedCommand};

fn queued(name: &str) -> QueuedCommand {
    QueuedCommand::new(Command::new(name, vec![], vec![]), None)
}

fn names(commands: &[Command]) -> Vec<&str> {
    commands.iter().map(Command::name).collect()
}

#[test]
fn test_new_queue_is_idle() {
    let mut queue = CommandQueue::new();
    assert!(!queue.is_executing());
    assert_eq!(queue.pending_len(), 0);
    assert!(queue.begin_next().is_none());
}

#[test]
fn test_begin_next_takes_head() {
    let mut queue = CommandQueue::new();
    queue.push(queued("first"));
    queue.push(queued("second"));

    let started = queue.begin_next().map(|q| q.command().name().to_string());
    assert_eq!(started.as_deref(), Some("first"));
    assert_eq!(names(&queue.pending()), vec!["second"]);
    assert_eq!(queue.executing().map(|q| q.command().name()), Some("first"));
}

#[test]
fn test_only_one_executing() {
    let mut queue = CommandQueue::new();
    queue.push(queued("first"));
    queue.push(queued("second"));

    assert!(queue.begin_next().is_some());
    assert!(queue.begin_next().is_none());
    assert_eq!(queue.pending_len(), 1);

    let finished = queue.finish().expect("executing command");
    assert_eq!(finished.command().name(), "first");
    assert_eq!(
        queue.begin_next().map(|q| q.command().name().to_string()).as_deref(),
        Some("second")
    );
}

#[test]
fn test_pending_is_a_snapshot() {
    let mut queue = CommandQueue::new();
    queue.push(queued("a"));
    let snapshot = queue.pending();
    queue.push(queued("b"));
    assert_eq!(names(&snapshot), vec!["a"]);
    assert_eq!(names(&queue.pending()), vec!["a", "b"]);
}

#[test]
fn test_clear_pending_leaves_executing() {
    let mut queue = CommandQueue::new();
    queue.push(queued("a"));
    queue.push(queued("b"));
    queue.push(queued("c"));
    queue.begin_next();

    let cleared = queue.clear_pending();
    assert_eq!(names(&cleared), vec!["b", "c"]);
    assert_eq!(queue.pending_len(), 0);
    assert!(queue.is_executing());
}

#[test]
fn test_resolve_success_and_failure() {
    let ok: Record = [("id", 0i64)].into_iter().collect();
    let resolved = queued("a").resolve(ok);
    assert!(resolved.completion().is_ok());

    let zero_string: Record = [("id", "0")].into_iter().collect();
    assert!(queued("a").resolve(zero_string).completion().is_ok());

    let failed: Record = [("id", 512i64)].into_iter().collect();
    let resolved = queued("a").resolve(failed);
    assert_eq!(
        resolved.completion().error.as_ref().and_then(|e| e.get_int("id")),
        Some(512)
    );
}

#[test]
fn test_resolve_without_callback_runs_nothing() {
    let ok: Record = [("id", 0i64)].into_iter().collect();
    assert!(!queued("a").resolve(ok).run());
}
