//! Unit and concurrency tests for lz-crossing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use lz_core::{CatId, CrossingPolicy, Direction, LizardId};

use crate::{
    AbortSignal, CapacityGate, CrossingCounters, DirectionArbiter, DirectionChange,
    OccupancyMirror, OccupancySource, SharedState, Violation,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// No recorded change may jump straight between the two directions.
fn assert_drains_through_none(log: &[DirectionChange]) {
    for pair in log.windows(2) {
        assert_eq!(pair[0].to, pair[1].from, "log is not a chain: {pair:?}");
    }
    for change in log {
        assert!(
            change.from.is_none() || change.to.is_none(),
            "direct direction flip: {change:?}"
        );
    }
}

// ── CrossingCounters ──────────────────────────────────────────────────────────

#[cfg(test)]
mod counters_tests {
    use super::*;

    const UNI: CrossingPolicy = CrossingPolicy::Unidirectional;
    const BI: CrossingPolicy = CrossingPolicy::Bidirectional;

    #[test]
    fn idle_driveway_admits_either_direction() {
        let c = CrossingCounters::new();
        assert!(c.may_enter(Direction::Forward, UNI));
        assert!(c.may_enter(Direction::Backward, UNI));
        assert_eq!(c.current, None);
    }

    #[test]
    fn first_entry_claims_direction() {
        let mut c = CrossingCounters::new();
        let change = c.enter(Direction::Forward, UNI);
        assert_eq!(change, Some(DirectionChange { from: None, to: Some(Direction::Forward) }));
        assert_eq!(c.current, Some(Direction::Forward));
        assert_eq!(c.forward, 1);
    }

    #[test]
    fn same_direction_joins_opposite_waits() {
        let mut c = CrossingCounters::new();
        c.enter(Direction::Forward, UNI);
        assert!(c.may_enter(Direction::Forward, UNI));
        assert!(!c.may_enter(Direction::Backward, UNI));
        assert_eq!(c.enter(Direction::Forward, UNI), None, "Forward → Forward is not a change");
        assert_eq!(c.forward, 2);
    }

    #[test]
    fn last_exit_releases_direction() {
        let mut c = CrossingCounters::new();
        c.enter(Direction::Backward, UNI);
        c.enter(Direction::Backward, UNI);
        assert_eq!(c.exit(Direction::Backward), None);
        assert_eq!(c.current, Some(Direction::Backward));
        assert_eq!(
            c.exit(Direction::Backward),
            Some(DirectionChange { from: Some(Direction::Backward), to: None })
        );
        assert_eq!(c.current, None);
        assert!(c.may_enter(Direction::Forward, UNI));
    }

    #[test]
    fn bidirectional_never_claims() {
        let mut c = CrossingCounters::new();
        assert_eq!(c.enter(Direction::Forward, BI), None);
        assert!(c.may_enter(Direction::Backward, BI));
        assert_eq!(c.enter(Direction::Backward, BI), None);
        assert!(c.is_conflicted());
        assert_eq!(c.total(), 2);
        assert_eq!(c.current, None);
        assert_eq!(c.exit(Direction::Forward), None);
        assert_eq!(c.exit(Direction::Backward), None);
        assert_eq!(c.total(), 0);
    }

    #[test]
    fn sequential_alternation_logs_through_none() {
        let mut c = CrossingCounters::new();
        let mut log = Vec::new();
        for dir in [Direction::Forward, Direction::Backward, Direction::Forward] {
            log.extend(c.enter(dir, UNI));
            log.extend(c.exit(dir));
        }
        assert_eq!(log.len(), 6);
        assert_drains_through_none(&log);
    }

    #[test]
    fn mirror_publishes_both_counts_in_one_word() {
        let mirror = OccupancyMirror::default();
        assert_eq!(mirror.load(), (0, 0));
        let mut c = CrossingCounters::new();
        c.enter(Direction::Forward, BI);
        c.enter(Direction::Forward, BI);
        c.enter(Direction::Backward, BI);
        mirror.publish(&c);
        assert_eq!(mirror.load(), (2, 1));
        assert_eq!(mirror.occupancy(), 3);
    }
}

// ── CapacityGate ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod gate_tests {
    use super::*;

    #[test]
    fn permits_return_on_drop() {
        let gate = CapacityGate::new(2);
        let a = gate.acquire();
        let b = gate.acquire();
        assert_eq!(gate.in_use(), 2);
        assert_eq!(gate.available(), 0);
        assert!(gate.try_acquire().is_none());
        drop(a);
        assert_eq!(gate.in_use(), 1);
        let c = gate.try_acquire();
        assert!(c.is_some());
        drop((b, c));
        assert_eq!(gate.in_use(), 0);
        assert_eq!(gate.peak(), 2);
    }

    #[test]
    fn full_gate_blocks_until_release() {
        let gate = CapacityGate::new(1);
        let entered = AtomicBool::new(false);
        let held = gate.acquire();

        thread::scope(|s| {
            s.spawn(|| {
                let _p = gate.acquire();
                entered.store(true, Ordering::SeqCst);
            });
            thread::sleep(Duration::from_millis(50));
            assert!(!entered.load(Ordering::SeqCst), "second acquire must block");
            drop(held);
        });

        assert!(entered.load(Ordering::SeqCst));
        assert_eq!(gate.in_use(), 0);
    }

    #[test]
    fn in_use_never_exceeds_capacity_under_load() {
        const K: usize = 4;
        let gate = CapacityGate::new(K);
        let inside = AtomicUsize::new(0);
        let overflow = AtomicBool::new(false);

        thread::scope(|s| {
            for _ in 0..20 {
                s.spawn(|| {
                    for _ in 0..25 {
                        let _p = gate.acquire();
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        if now > K {
                            overflow.store(true, Ordering::SeqCst);
                        }
                        thread::sleep(Duration::from_micros(200));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert!(!overflow.load(Ordering::SeqCst));
        assert!(gate.peak() <= K);
        assert_eq!(gate.in_use(), 0);
    }
}

// ── DirectionArbiter ──────────────────────────────────────────────────────────

#[cfg(test)]
mod arbiter_tests {
    use super::*;

    #[test]
    fn opposite_direction_waits_for_drain() {
        let arbiter = DirectionArbiter::with_transition_log(CrossingPolicy::Unidirectional);
        let entered = AtomicBool::new(false);
        let f1 = arbiter.request_entry(Direction::Forward);
        let f2 = arbiter.request_entry(Direction::Forward);

        thread::scope(|s| {
            s.spawn(|| {
                let claim = arbiter.request_entry(Direction::Backward);
                entered.store(true, Ordering::SeqCst);
                claim.complete();
            });

            thread::sleep(Duration::from_millis(40));
            assert!(!entered.load(Ordering::SeqCst));
            f1.complete();
            thread::sleep(Duration::from_millis(40));
            assert!(!entered.load(Ordering::SeqCst), "one forward lizard is still crossing");
            f2.complete();
        });

        assert!(entered.load(Ordering::SeqCst));
        assert_eq!(arbiter.snapshot(), CrossingCounters::new());
        let log = arbiter.transitions();
        assert_eq!(
            log,
            vec![
                DirectionChange { from: None, to: Some(Direction::Forward) },
                DirectionChange { from: Some(Direction::Forward), to: None },
                DirectionChange { from: None, to: Some(Direction::Backward) },
                DirectionChange { from: Some(Direction::Backward), to: None },
            ]
        );
        assert_eq!(arbiter.transition_count(), 4);
    }

    #[test]
    fn bidirectional_admits_both_at_once() {
        let arbiter = DirectionArbiter::new(CrossingPolicy::Bidirectional);
        let f = arbiter.request_entry(Direction::Forward);
        let b = arbiter.request_entry(Direction::Backward);
        let snap = arbiter.snapshot();
        assert!(snap.is_conflicted());
        assert_eq!(arbiter.occupancy_relaxed(), 2);
        drop((f, b));
        assert_eq!(arbiter.occupancy(), 0);
        assert_eq!(arbiter.transition_count(), 0);
    }

    #[test]
    fn relaxed_mirror_tracks_counts() {
        let arbiter = DirectionArbiter::new(CrossingPolicy::Unidirectional);
        let claims: Vec<_> = (0..3).map(|_| arbiter.request_entry(Direction::Backward)).collect();
        assert_eq!(arbiter.occupancy_relaxed(), 3);
        drop(claims);
        assert_eq!(arbiter.occupancy_relaxed(), 0);
    }

    #[test]
    fn transitions_empty_without_log() {
        let arbiter = DirectionArbiter::new(CrossingPolicy::Unidirectional);
        arbiter.request_entry(Direction::Forward).complete();
        assert!(arbiter.transitions().is_empty());
        assert_eq!(arbiter.transition_count(), 2);
    }
}

// ── AbortSignal ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod abort_tests {
    use std::time::Instant;

    use super::*;

    fn crowd(occupancy: usize) -> Violation {
        Violation::Overcrowded { cat: CatId(0), occupancy, limit: 4 }
    }

    #[test]
    fn first_violation_wins() {
        let signal = AbortSignal::new();
        assert!(!signal.is_raised());
        assert!(signal.raise(crowd(5)));
        assert!(!signal.raise(crowd(9)));
        assert!(signal.is_raised());
        assert_eq!(signal.violation(), Some(crowd(5)));
    }

    #[test]
    fn wait_times_out_when_quiet() {
        let signal = AbortSignal::new();
        let t0 = Instant::now();
        assert_eq!(signal.wait_timeout(Duration::from_millis(30)), None);
        assert!(t0.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn wait_wakes_early_on_raise() {
        let signal = AbortSignal::new();
        let t0 = Instant::now();
        let got = thread::scope(|s| {
            s.spawn(|| {
                thread::sleep(Duration::from_millis(20));
                signal.raise(crowd(6));
            });
            signal.wait_timeout(Duration::from_secs(10))
        });
        assert_eq!(got, Some(crowd(6)));
        assert!(t0.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn messages_name_counts_and_direction() {
        let fwd = Violation::DirectionConflict {
            lizard:    LizardId(3),
            direction: Direction::Forward,
            forward:   2,
            backward:  1,
        };
        let msg = fwd.to_string();
        assert!(msg.starts_with("Crash!  We have a pile-up on the concrete."), "{msg}");
        assert!(msg.contains("2 crossing sago -> monkey grass"));
        assert!(msg.contains("1 crossing monkey grass -> sago"));

        let bwd = Violation::DirectionConflict {
            lizard:    LizardId(3),
            direction: Direction::Backward,
            forward:   1,
            backward:  1,
        };
        assert!(bwd.to_string().starts_with("Oh No!, the lizards have cats all over them."));

        assert!(crowd(5).to_string().starts_with("The cats are happy - they have toys."));
    }
}

// ── SharedState ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod shared_tests {
    use super::*;

    #[test]
    fn enter_holds_permit_and_claim_until_finish() {
        let shared = SharedState::new(2, CrossingPolicy::Unidirectional);
        let crossing = shared.enter(Direction::Forward);
        assert_eq!(crossing.direction(), Direction::Forward);
        assert_eq!(shared.gate.in_use(), 1);
        assert_eq!(shared.arbiter.snapshot().forward, 1);
        crossing.finish();
        assert_eq!(shared.gate.in_use(), 0);
        assert_eq!(shared.arbiter.snapshot(), CrossingCounters::new());
    }

    #[test]
    fn run_flag_clears_once() {
        let shared = SharedState::new(1, CrossingPolicy::Bidirectional);
        assert!(shared.is_running());
        shared.stop();
        assert!(!shared.is_running());
    }
}

// ── Property tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    /// Run `trips` (direction, hold-µs) crossings per lizard through `shared`
    /// and report whether any lizard ever saw oncoming traffic mid-crossing.
    fn hammer(shared: &SharedState, trips: &[Vec<(bool, u64)>]) -> bool {
        let conflict = AtomicBool::new(false);
        thread::scope(|s| {
            for lizard in trips {
                let conflict = &conflict;
                s.spawn(move || {
                    for &(forward, hold_us) in lizard {
                        let dir = if forward { Direction::Forward } else { Direction::Backward };
                        let crossing = shared.enter(dir);
                        if shared.arbiter.snapshot().count(dir.opposite()) > 0 {
                            conflict.store(true, Ordering::SeqCst);
                        }
                        thread::sleep(Duration::from_micros(hold_us));
                        crossing.finish();
                    }
                });
            }
        });
        conflict.load(Ordering::SeqCst)
    }

    fn trips_strategy() -> impl Strategy<Value = Vec<Vec<(bool, u64)>>> {
        prop::collection::vec(prop::collection::vec((any::<bool>(), 0u64..400), 1..8), 2..16)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Opposing traffic never overlaps under the unidirectional policy,
        /// the gate never overfills, and everything drains to idle.
        #[test]
        fn prop_unidirectional_exclusive(trips in trips_strategy(), capacity in 1usize..6) {
            let shared = SharedState::from_parts(
                CapacityGate::new(capacity),
                DirectionArbiter::with_transition_log(CrossingPolicy::Unidirectional),
            );

            prop_assert!(!hammer(&shared, &trips));
            prop_assert!(shared.gate.peak() <= capacity);
            prop_assert_eq!(shared.gate.in_use(), 0);
            prop_assert_eq!(shared.arbiter.snapshot(), CrossingCounters::new());

            let log = shared.arbiter.transitions();
            assert_drains_through_none(&log);
            prop_assert!(log.len() % 2 == 0, "every claim must be followed by a drain");
        }

        /// The bidirectional policy still respects capacity.
        #[test]
        fn prop_bidirectional_respects_capacity(trips in trips_strategy(), capacity in 1usize..6) {
            let shared = SharedState::new(capacity, CrossingPolicy::Bidirectional);
            hammer(&shared, &trips);
            prop_assert!(shared.gate.peak() <= capacity);
            prop_assert_eq!(shared.arbiter.occupancy(), 0);
        }
    }
}
