use std::sync::{Arc, Mutex};
use std::time::Duration;

use blackbook_engine::Debouncer;

fn recorder() -> Arc<Mutex<Vec<usize>>> {
    Arc::new(Mutex::new(Vec::new()))
}

#[tokio::test(start_paused = true)]
async fn only_the_last_rapid_schedule_runs() {
    let debouncer = Debouncer::new(Duration::from_millis(300));
    let ran = recorder();

    let mut handles = Vec::new();
    for n in 0..5 {
        let ran = ran.clone();
        handles.push(debouncer.schedule(move || async move {
            ran.lock().unwrap().push(n);
        }));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }
    assert_eq!(outcomes, vec![false, false, false, false, true]);
    assert_eq!(*ran.lock().unwrap(), vec![4]);
}

#[tokio::test(start_paused = true)]
async fn schedules_separated_by_the_quiet_period_all_run() {
    let debouncer = Debouncer::new(Duration::from_millis(300));
    let ran = recorder();

    for n in 0..3 {
        let ran = ran.clone();
        let handle = debouncer.schedule(move || async move {
            ran.lock().unwrap().push(n);
        });
        assert!(handle.await.unwrap());
    }
    assert_eq!(*ran.lock().unwrap(), vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn job_does_not_run_before_the_quiet_period() {
    let debouncer = Debouncer::new(Duration::from_millis(1000));
    let ran = recorder();

    let job_ran = ran.clone();
    let handle = debouncer.schedule(move || async move {
        job_ran.lock().unwrap().push(1);
    });
    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(ran.lock().unwrap().is_empty());

    assert!(handle.await.unwrap());
    assert_eq!(*ran.lock().unwrap(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn running_job_is_not_interrupted_by_a_new_schedule() {
    let debouncer = Debouncer::new(Duration::from_millis(100));
    let ran = recorder();

    let first = ran.clone();
    let slow = debouncer.schedule(move || async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        first.lock().unwrap().push(1);
    });
    tokio::time::sleep(Duration::from_millis(150)).await;

    let second = ran.clone();
    let next = debouncer.schedule(move || async move {
        second.lock().unwrap().push(2);
    });

    assert!(slow.await.unwrap());
    assert!(next.await.unwrap());
    let mut seen = ran.lock().unwrap().clone();
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn shutdown_drops_pending_jobs() {
    let debouncer = Debouncer::new(Duration::from_millis(300));
    let ran = recorder();

    let job_ran = ran.clone();
    let handle = debouncer.schedule(move || async move {
        job_ran.lock().unwrap().push(1);
    });
    debouncer.shutdown();

    assert!(!handle.await.unwrap());
    assert!(ran.lock().unwrap().is_empty());
}
