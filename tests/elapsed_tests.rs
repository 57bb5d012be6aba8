use chrono::Duration;
use hivetime::core::calculator::elapsed::{LiveTimer, Snapshot, Transition, elapsed_at};

mod common;
use common::{at, running};

#[test]
fn stopped_snapshot_is_constant() {
    for total in [0, 1, 59, 3600, 86_400 * 3] {
        let snap = Snapshot::stopped(total);
        for now in [at(0), at(17), at(100_000)] {
            assert_eq!(elapsed_at(&snap, now), total);
        }
    }
}

#[test]
fn running_snapshot_counts_from_start() {
    let snap = Snapshot::running(500, at(0));
    assert_eq!(elapsed_at(&snap, at(0)), 500);
    assert_eq!(elapsed_at(&snap, at(10)), 510);
}

#[test]
fn start_in_the_future_is_clamped() {
    let snap = Snapshot::running(42, at(60));
    assert_eq!(elapsed_at(&snap, at(0)), 42);

    let timer = LiveTimer::from_snapshot(&snap, at(0));
    assert_eq!(timer.elapsed(at(0)), 42);
    assert_eq!(timer.elapsed(at(0) - Duration::seconds(5)), 42);
}

#[test]
fn negative_total_never_displays_negative() {
    let snap = Snapshot::stopped(-30);
    assert_eq!(elapsed_at(&snap, at(0)), 0);
    assert_eq!(LiveTimer::from_snapshot(&snap, at(0)).elapsed(at(0)), 0);
}

#[test]
fn running_without_start_shows_as_stopped() {
    let snap = Snapshot {
        total_seconds: 75,
        is_running: true,
        started_at: None,
    };
    assert_eq!(elapsed_at(&snap, at(1000)), 75);

    let timer = LiveTimer::from_snapshot(&snap, at(0));
    assert!(!timer.is_running());
    assert_eq!(timer.elapsed(at(1000)), 75);
}

#[test]
fn record_started_45s_ago_shows_165() {
    let rec = running("T-1", "alice", 120, at(0));
    let now = at(45);

    assert_eq!(elapsed_at(&Snapshot::from(&rec), now), 165);

    let timer = LiveTimer::from_snapshot(&Snapshot::from(&rec), now);
    assert_eq!(timer.anchor(), Some(now));
    assert_eq!(timer.elapsed(now), 165);
    assert_eq!(timer.elapsed(at(46)), 166);
}

#[test]
fn same_snapshot_twice_changes_nothing() {
    let snap = Snapshot::running(10, at(0));
    let mut timer = LiveTimer::from_snapshot(&snap, at(5));
    let before = timer.clone();

    assert_eq!(timer.apply(&snap, at(8)), Transition::Unchanged);
    assert_eq!(timer, before);
    assert_eq!(timer.elapsed(at(9)), 19);
}

#[test]
fn redelivered_start_time_does_not_move_the_anchor() {
    let mut timer = LiveTimer::from_snapshot(&Snapshot::running(0, at(0)), at(0));

    // upstream re-sends the record with a start skewed by 3s
    let skewed = Snapshot::running(0, at(3));
    assert_eq!(timer.apply(&skewed, at(20)), Transition::Unchanged);
    assert_eq!(timer.anchor(), Some(at(0)));
    assert_eq!(timer.elapsed(at(20)), 20);
}

#[test]
fn stop_shows_the_folded_total() {
    let mut timer = LiveTimer::from_snapshot(&Snapshot::running(100, at(0)), at(0));
    assert_eq!(timer.elapsed(at(30)), 130);

    assert_eq!(timer.apply(&Snapshot::stopped(129), at(30)), Transition::Stopped);
    assert!(!timer.is_running());
    assert_eq!(timer.elapsed(at(30)), 129);
    assert_eq!(timer.elapsed(at(500)), 129);

    assert_eq!(timer.apply(&Snapshot::stopped(129), at(31)), Transition::Unchanged);
}

#[test]
fn sub_second_run_stops_on_the_stored_total() {
    // anchored 200ms into the interval, stopped 2s later with nothing folded
    let mut timer = LiveTimer::from_snapshot(
        &Snapshot::running(100, at(0)),
        at(0) + Duration::milliseconds(200),
    );
    assert_eq!(timer.elapsed(at(2) + Duration::milliseconds(200)), 102);

    let t = timer.apply(&Snapshot::stopped(100), at(2) + Duration::milliseconds(200));
    assert_eq!(t, Transition::Stopped);
    assert_eq!(timer.elapsed(at(10)), 100);
}

#[test]
fn start_stop_cycle_adds_the_interval() {
    let delta = 37;
    let mut timer = LiveTimer::from_snapshot(&Snapshot::stopped(200), at(0));

    assert_eq!(timer.apply(&Snapshot::running(200, at(0)), at(0)), Transition::Started);
    assert_eq!(timer.apply(&Snapshot::stopped(200 + delta), at(delta)), Transition::Stopped);

    let shown = timer.elapsed(at(delta + 10));
    assert!((shown - (200 + delta)).abs() <= 1, "shown {shown}");
}

#[test]
fn restart_takes_a_new_anchor() {
    let mut timer = LiveTimer::from_snapshot(&Snapshot::running(0, at(0)), at(0));
    timer.apply(&Snapshot::stopped(10), at(10));
    assert_eq!(timer.apply(&Snapshot::running(10, at(50)), at(50)), Transition::Started);
    assert_eq!(timer.anchor(), Some(at(50)));
    assert_eq!(timer.elapsed(at(55)), 15);
}

#[test]
fn independent_views_converge() {
    let snap = Snapshot::running(60, at(0));

    // views created at different moments, with sub-second offsets
    let a = LiveTimer::from_snapshot(&snap, at(3) + Duration::milliseconds(250));
    let b = LiveTimer::from_snapshot(&snap, at(7) + Duration::milliseconds(900));
    let c = LiveTimer::from_snapshot(&snap, at(12));

    for offset_ms in [12_000, 12_400, 13_999, 60_001, 3_600_500] {
        let now = at(0) + Duration::milliseconds(offset_ms);
        let va = a.elapsed(now);
        assert_eq!(va, b.elapsed(now), "at +{offset_ms}ms");
        assert_eq!(va, c.elapsed(now), "at +{offset_ms}ms");
        assert_eq!(va, elapsed_at(&snap, now));
    }
}

#[test]
fn new_total_while_running_reanchors() {
    // stopped at +100 with 100s folded, restarted at +100, seen at +101
    let mut timer = LiveTimer::from_snapshot(&Snapshot::running(0, at(0)), at(1));
    assert_eq!(timer.apply(&Snapshot::running(100, at(100)), at(101)), Transition::Refreshed);
    assert_eq!(timer.anchor(), Some(at(101)));
    assert_eq!(timer.elapsed(at(101)), 101);
    assert_eq!(timer.elapsed(at(110)), 110);
}
