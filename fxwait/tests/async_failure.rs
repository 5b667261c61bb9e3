use fxwait::{AsyncRunner, FailureOrigin, WaitError};
use std::error::Error;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
#[error("operation not supported")]
struct Unsupported;

fn quiet_runner() -> AsyncRunner {
    AsyncRunner::builder().print_exceptions(false).build()
}

#[test]
fn test_failure_checked_then_rewaited() {
    let runner = quiet_runner();
    runner.clear_exceptions();

    let handle = runner.submit(|| Err::<(), _>(Unsupported));

    // Resolution implies the failure already reached the slot.
    while !handle.is_done() {
        std::thread::yield_now();
    }

    let failure = runner
        .check_last_exception()
        .expect_err("check should report the task failure");
    assert!(failure.is::<Unsupported>(), "cause should be the task error");
    assert!(failure.source().is_some_and(|s| s.is::<Unsupported>()));

    assert!(
        runner.check_last_exception().is_ok(),
        "second check should find an empty slot"
    );

    let err = handle.wait(WAIT).expect_err("handle should still report the failure");
    assert!(matches!(&err, WaitError::Failed(f) if f.is::<Unsupported>()));
}

#[test]
fn test_wait_and_check_surface_independently() {
    let runner = quiet_runner();

    let handle = runner.submit(|| Err::<u32, _>(Unsupported));

    let first = handle.wait(WAIT).unwrap_err();
    let second = handle.wait(WAIT).unwrap_err();
    assert!(first.failure().is_some_and(|f| f.is::<Unsupported>()));
    assert!(second.failure().is_some_and(|f| f.is::<Unsupported>()));

    assert!(runner.check_last_exception().is_err());
    assert!(runner.check_last_exception().is_ok());

    assert!(handle.wait(WAIT).is_err(), "checking must not clear the handle");
}

#[test]
fn test_clear_then_check_is_ok() {
    let runner = quiet_runner();

    let handle = runner.submit(|| Err::<(), _>(Unsupported));
    let _ = handle.wait(WAIT);
    assert!(runner.has_unchecked_failure());

    runner.clear_exceptions();
    assert!(runner.check_last_exception().is_ok());

    runner.clear_exceptions();
    assert!(runner.check_last_exception().is_ok());
}

#[test]
fn test_panic_is_captured() {
    let runner = quiet_runner();

    let handle = runner.execute(|| -> u32 { unimplemented!("not yet") });
    let err = handle.wait(WAIT).unwrap_err();

    let failure = err.failure().unwrap();
    assert_eq!(failure.origin(), FailureOrigin::Panic);
    assert!(
        failure.panic_message().is_some_and(|m| m.contains("not yet")),
        "panic message should be kept"
    );

    let checked = runner.check_last_exception().unwrap_err();
    assert_eq!(checked.origin(), FailureOrigin::Panic);
}

#[test]
fn test_success_leaves_slot_empty() {
    let runner = quiet_runner();

    let handle = runner.submit(|| Ok::<_, Unsupported>(7));

    assert_eq!(handle.wait(WAIT).unwrap(), 7);
    assert_eq!(handle.wait(WAIT).unwrap(), 7);
    assert!(runner.check_last_exception().is_ok());
}

#[test]
fn test_newer_failure_overwrites_unchecked_one() {
    let runner = quiet_runner();

    let first = runner.submit(|| Err::<(), _>("first"));
    let second = runner.submit(|| Err::<(), _>("second"));
    let _ = first.wait(WAIT);
    let _ = second.wait(WAIT);

    let failure = runner.check_last_exception().unwrap_err();
    assert_eq!(failure.cause().to_string(), "second");
    assert!(runner.check_last_exception().is_ok(), "only one failure is kept");

    assert_eq!(
        first.wait(WAIT).unwrap_err().failure().unwrap().cause().to_string(),
        "first"
    );
}

#[test]
fn test_failure_names_worker_thread() {
    let runner = AsyncRunner::builder()
        .print_exceptions(false)
        .thread_name("ui-thread")
        .build();

    let handle = runner.submit(|| Err::<(), _>(Unsupported));
    let err = handle.wait(WAIT).unwrap_err();

    assert_eq!(err.failure().unwrap().thread(), "ui-thread");
    assert!(err.to_string().contains("ui-thread"));
}

#[test]
fn test_join_returns_failure() {
    let runner = quiet_runner();

    let ok = runner.execute(|| String::from("value"));
    assert_eq!(ok.join().unwrap(), "value");

    let failed = runner.submit(|| Err::<String, _>(Unsupported));
    assert!(failed.join().unwrap_err().is::<Unsupported>());
}
