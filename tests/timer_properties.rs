//! End-to-end behavior of timers driven through virtual time

use std::sync::Arc;

use menubar_timer::timer::{clock::offset, Clock, CompletionDate, Kind, ManualClock, Seconds, Timer, Value};

const EPSILON: Seconds = 1e-6;

fn approx(a: Seconds, b: Seconds) -> bool {
    (a - b).abs() < EPSILON
}

fn timer(kind: Kind) -> (Arc<ManualClock>, Timer) {
    let clock = Arc::new(ManualClock::starting_now());
    let timer = Timer::with_clock(kind, None, clock.clone());
    (clock, timer)
}

#[test]
fn test_new_timers_report_starting_amount() {
    let (_, up) = timer(Kind::count_up());
    assert_eq!(up.current_value(), Value::NotStarted(0.0));

    let (_, bounded) = timer(Kind::count_up_to(30.0));
    assert_eq!(bounded.current_value(), Value::NotStarted(0.0));

    let (_, down) = timer(Kind::count_down(250.0));
    assert_eq!(down.current_value(), Value::NotStarted(250.0));
}

#[test]
fn test_start_reports_initial_amount() {
    let (_, up) = timer(Kind::count_up());
    up.start();
    match up.current_value() {
        Value::Running(amount) => assert!(approx(amount, 0.0)),
        other => panic!("expected running, got {:?}", other),
    }

    let (_, down) = timer(Kind::count_down(250.0));
    down.start();
    match down.current_value() {
        Value::Running(amount) => assert!(approx(amount, 250.0)),
        other => panic!("expected running, got {:?}", other),
    }
}

#[test]
fn test_long_pause_preserves_remaining_time() {
    let (clock, timer) = timer(Kind::count_down(100.0));
    timer.start();
    clock.advance(30.0);
    timer.pause();
    clock.advance(1000.0);
    timer.start();
    clock.advance(10.0);

    match timer.current_value() {
        Value::Running(amount) => assert!(approx(amount, 60.0), "got {}", amount),
        other => panic!("expected running, got {:?}", other),
    }
}

#[test]
fn test_pause_cycles_accumulate() {
    let (clock, timer) = timer(Kind::count_up());
    let runs = [4.0, 7.5, 0.25, 12.0];
    let pauses = [100.0, 3.0, 42.125];

    timer.start();
    let mut paused_total = 0.0;
    for (i, run) in runs.iter().enumerate() {
        clock.advance(*run);
        if let Some(pause) = pauses.get(i) {
            timer.pause();
            clock.advance(*pause);
            paused_total += pause;
            timer.start();
        }
    }

    let wall: Seconds = runs.iter().sum::<Seconds>() + paused_total;
    match timer.current_value() {
        Value::Running(amount) => {
            assert!(approx(amount, runs.iter().sum()), "got {}", amount);
            assert!(approx(wall - amount, pauses.iter().sum()));
        }
        other => panic!("expected running, got {:?}", other),
    }
}

#[test]
fn test_countdown_never_negative() {
    let (clock, timer) = timer(Kind::count_down(20.0));
    timer.start();
    for _ in 0..10 {
        clock.advance(7.0);
        assert!(timer.current_value().amount() >= 0.0);
    }
    assert_eq!(timer.current_value(), Value::Running(0.0));

    timer.pause();
    assert_eq!(timer.current_value(), Value::Paused(0.0));
}

#[test]
fn test_bounded_count_up_completes_once() {
    let (clock, timer) = timer(Kind::count_up_to(60.0));
    timer.start();

    clock.advance(59.0);
    assert_eq!(timer.current_value(), Value::Running(59.0));

    clock.advance(5.0);
    assert_eq!(timer.current_value(), Value::Running(60.0));
    assert_eq!(timer.current_value(), Value::Completed(60.0));

    clock.advance(100.0);
    assert_eq!(timer.current_value(), Value::Completed(60.0));
}

#[test]
fn test_bounded_count_up_completes_exactly_at_limit() {
    let (clock, timer) = timer(Kind::count_up_to(60.0));
    let started = clock.now();
    timer.start();
    clock.advance(20.0);
    timer.pause();
    clock.advance(15.0);
    timer.start();

    // 40 more seconds of running brings elapsed to exactly the limit
    clock.advance(39.5);
    assert_eq!(timer.current_value(), Value::Running(59.5));
    clock.advance(0.5);
    assert_eq!(timer.current_value(), Value::Running(60.0));
    assert_eq!(timer.current_value(), Value::Completed(60.0));
    assert_eq!(
        timer.completion_date(),
        Some(CompletionDate::Exactly(offset(started, 60.0 + 15.0).unwrap()))
    );
}

#[test]
fn test_huge_countdown_has_no_completion_date() {
    let (_, timer) = timer(Kind::count_down(1e300));
    assert_eq!(timer.completion_date(), None);
    timer.start();
    assert_eq!(timer.completion_date(), None);
    assert!(!timer.reconcile());
}

#[test]
fn test_stop_is_idempotent() {
    let (clock, timer) = timer(Kind::count_down(50.0));
    timer.start();
    clock.advance(12.0);
    timer.stop();
    let first = timer.current_value();
    let completed_at = timer.completion_date().map(|date| date.instant());

    clock.advance(30.0);
    timer.stop();
    assert_eq!(timer.current_value(), first);
    assert_eq!(first, Value::Completed(12.0));
    assert_eq!(timer.completion_date().map(|date| date.instant()), completed_at);
}

#[test]
fn test_pause_is_noop_when_not_running() {
    let (clock, timer) = timer(Kind::count_down(50.0));
    let before = timer.current_value();
    timer.pause();
    assert_eq!(timer.current_value(), before);

    timer.start();
    clock.advance(5.0);
    timer.stop();
    let before = timer.current_value();
    clock.advance(5.0);
    timer.pause();
    assert_eq!(timer.current_value(), before);
}

#[test]
fn test_start_is_noop_when_running_or_completed() {
    let (clock, timer) = timer(Kind::count_up());
    timer.start();
    clock.advance(8.0);
    timer.start();
    assert_eq!(timer.current_value(), Value::Running(8.0));

    timer.stop();
    clock.advance(8.0);
    timer.start();
    assert_eq!(timer.current_value(), Value::Completed(8.0));
}

#[test]
fn test_invalid_countdown_totals_behave_like_zero() {
    for total in [0.0, Seconds::NAN, -5.0, Seconds::INFINITY] {
        let (clock, timer) = timer(Kind::count_down(total));
        assert_eq!(timer.current_value(), Value::NotStarted(0.0));

        timer.start();
        assert_eq!(timer.current_value(), Value::Running(0.0));
        assert!(timer.reconcile());
        assert_eq!(timer.current_value(), Value::Completed(0.0));

        // Resuming a paused empty countdown completes it on the spot
        let paused = Timer::with_clock(Kind::count_down(total), None, clock);
        paused.start().pause().start();
        assert_eq!(paused.current_value(), Value::Completed(0.0));
    }
}

#[test]
fn test_reconcile_completes_countdown_at_zero() {
    let (clock, timer) = timer(Kind::count_down(10.0));
    timer.start();
    clock.advance(4.0);
    assert!(!timer.reconcile());

    clock.advance(6.5);
    assert_eq!(timer.current_value(), Value::Running(0.0));
    assert!(timer.reconcile());
    assert_eq!(timer.current_value(), Value::Completed(10.0));
    assert!(!timer.reconcile());
}

#[test]
fn test_separate_timers_are_independent() {
    let clock = Arc::new(ManualClock::starting_now());
    let a = Timer::with_clock(Kind::count_down(60.0), None, clock.clone());
    let b = Timer::with_clock(Kind::count_down(60.0), None, clock.clone());

    a.start();
    clock.advance(10.0);
    b.start();
    clock.advance(10.0);
    a.pause();

    assert_eq!(a.current_value(), Value::Paused(40.0));
    assert_eq!(b.current_value(), Value::Running(50.0));
}

#[test]
fn test_concurrent_commands_are_serialized() {
    let (clock, timer) = timer(Kind::count_up());
    let timer = Arc::new(timer);
    timer.start();
    clock.advance(1.0);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let timer = Arc::clone(&timer);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    if i % 2 == 0 {
                        timer.pause();
                    } else {
                        timer.start();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // The clock never moved, so no interleaving may change elapsed time
    assert!(approx(timer.current_value().amount(), 1.0));
}
