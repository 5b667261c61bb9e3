use fxwait::{AsyncRunner, on_worker_thread};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn test_tasks_run_in_submission_order() {
    let runner = AsyncRunner::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let observed = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let counter = counter.clone();
            let observed = observed.clone();
            runner.execute(move || {
                let seen = counter.fetch_add(1, Ordering::SeqCst);
                observed.lock().unwrap().push((i, seen));
            })
        })
        .collect();

    for handle in &handles {
        handle.wait(WAIT).unwrap();
    }

    let observed = observed.lock().unwrap();
    assert_eq!(observed.len(), 100);
    for (i, seen) in observed.iter() {
        assert_eq!(i, seen, "task {} ran out of order", i);
    }
}

#[test]
fn test_tasks_never_overlap() {
    let runner = AsyncRunner::new();
    let active = Arc::new(AtomicUsize::new(0));
    let overlaps = Arc::new(AtomicUsize::new(0));

    for _ in 0..20 {
        let active = active.clone();
        let overlaps = overlaps.clone();
        runner.execute(move || {
            if active.fetch_add(1, Ordering::SeqCst) != 0 {
                overlaps.fetch_add(1, Ordering::SeqCst);
            }
            thread::sleep(Duration::from_millis(1));
            active.fetch_sub(1, Ordering::SeqCst);
        });
    }

    runner.flush(WAIT).unwrap();
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
}

#[test]
fn test_concurrent_submitters_keep_their_order() {
    let runner = Arc::new(AsyncRunner::new());
    let log = Arc::new(Mutex::new(Vec::new()));

    let submitters: Vec<_> = (0..4)
        .map(|caller| {
            let runner = runner.clone();
            let log = log.clone();
            thread::spawn(move || {
                for seq in 0..25 {
                    let log = log.clone();
                    runner.execute(move || log.lock().unwrap().push((caller, seq)));
                }
            })
        })
        .collect();

    for submitter in submitters {
        submitter.join().unwrap();
    }
    runner.flush(WAIT).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 100);
    for caller in 0..4 {
        let seqs: Vec<_> = log.iter().filter(|(c, _)| *c == caller).map(|(_, s)| *s).collect();
        assert_eq!(seqs, (0..25).collect::<Vec<_>>(), "caller {} reordered", caller);
    }
}

#[test]
fn test_tasks_run_on_worker_thread() {
    let runner = AsyncRunner::new();

    let on_worker = runner.execute(on_worker_thread).wait(WAIT).unwrap();
    let name = runner
        .execute(|| thread::current().name().map(str::to_owned))
        .wait(WAIT)
        .unwrap();

    assert!(on_worker);
    assert!(!on_worker_thread(), "test thread is not the worker");
    assert_eq!(name.as_deref(), Some("fxwait-worker"));
}

#[test]
fn test_flush_waits_for_earlier_tasks() {
    let runner = AsyncRunner::new();
    let done = Arc::new(AtomicUsize::new(0));

    for _ in 0..5 {
        let done = done.clone();
        runner.execute(move || {
            thread::sleep(Duration::from_millis(2));
            done.fetch_add(1, Ordering::SeqCst);
        });
    }

    runner.flush(WAIT).unwrap();
    assert_eq!(done.load(Ordering::SeqCst), 5);
}

#[test]
fn test_drop_runs_queued_tasks() {
    let runner = AsyncRunner::new();
    let done = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let done = done.clone();
            runner.execute(move || {
                done.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    drop(runner);

    assert_eq!(done.load(Ordering::SeqCst), 10);
    assert!(handles.iter().all(|h| h.is_done()));
}

#[test]
fn test_sequential_runners() {
    for n in 1..=4 {
        let runner = AsyncRunner::new();
        let result = runner.execute(move || n * 10).wait(WAIT).unwrap();
        assert_eq!(result, n * 10);
        drop(runner);
    }
}
