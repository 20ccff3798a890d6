use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use vizij_scroll_core::{
    clock::{Clock, ManualClock},
    scroll::{ScrollMetrics, ScrollPublisher, ScrollState},
};

#[derive(Deserialize)]
struct Burst {
    throttle_ms: f64,
    quiet_ms: f64,
    samples: Vec<Sample>,
}

#[derive(Clone, Deserialize)]
struct Sample {
    at: f64,
    offset: f32,
}

/// Drive the publisher at 1ms resolution, sampling whenever the burst has a
/// raw event due, and return (time, state) of every notification.
fn replay_states(
    burst: &Burst,
    until: f64,
) -> (Vec<(f64, ScrollState)>, ScrollPublisher, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new(0.0));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut publisher = ScrollPublisher::with_intervals(burst.throttle_ms, burst.quiet_ms);
    {
        let clock = clock.clone();
        let seen = seen.clone();
        publisher.subscribe(Box::new(move |s| seen.borrow_mut().push((clock.now_ms(), *s))));
    }

    let mut t = 0.0;
    while t <= until {
        clock.set(t);
        for sample in burst.samples.iter().filter(|s| s.at == t) {
            publisher.sample(t, &ScrollMetrics::at(sample.offset));
        }
        publisher.poll(t);
        t += 1.0;
    }
    let out = seen.borrow().clone();
    (out, publisher, clock)
}

/// (time, offset) of every active recomputation.
fn replay(burst: &Burst, until: f64) -> (Vec<(f64, f32)>, ScrollPublisher, Rc<ManualClock>) {
    let (states, publisher, clock) = replay_states(burst, until);
    let active = states
        .into_iter()
        .filter(|(_, s)| s.is_active)
        .map(|(t, s)| (t, s.offset))
        .collect();
    (active, publisher, clock)
}

#[test]
fn burst_is_throttled_to_one_recompute_per_interval() {
    let burst: Burst =
        vizij_test_fixtures::scenarios::load("scroll-burst").expect("load scroll-burst");
    let (computed, publisher, _) = replay(&burst, 60.0);

    assert_eq!(computed.len() as u64, publisher.recomputations());
    for pair in computed.windows(2) {
        assert!(
            pair[1].0 - pair[0].0 >= burst.throttle_ms,
            "recomputations at {} and {} are closer than the throttle",
            pair[0].0,
            pair[1].0
        );
    }
    // Leading edge at the first raw event, trailing edge carries the last one.
    assert_eq!(computed.first(), Some(&(0.0, 0.0)));
    assert_eq!(computed.last().map(|c| c.1), Some(150.0));
    assert_eq!(computed.len(), 4);
}

#[test]
fn quiet_period_follows_the_last_raw_event() {
    let burst: Burst =
        vizij_test_fixtures::scenarios::load("scroll-burst").expect("load scroll-burst");
    let last_raw = burst.samples.last().map(|s| s.at).unwrap();

    let (_, mut publisher, clock) = replay(&burst, last_raw + burst.quiet_ms - 1.0);
    assert!(publisher.state().is_active);

    let idle_at = clock.advance(1.0);
    let emitted = publisher.poll(idle_at);
    assert_eq!(emitted.len(), 1);
    assert!(!emitted[0].is_active);
    assert!(!publisher.state().is_active);
    assert_eq!(publisher.state().velocity, 0.0);
    assert_eq!(publisher.state().offset, 150.0);
    assert_eq!(publisher.next_deadline(), None);
}

#[test]
fn no_notifications_after_shutdown() {
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    let mut publisher = ScrollPublisher::with_intervals(16.0, 150.0);
    publisher.subscribe(Box::new(move |_| *sink.borrow_mut() += 1));
    publisher.sample(0.0, &ScrollMetrics::at(10.0));
    publisher.sample(5.0, &ScrollMetrics::at(20.0));
    publisher.shutdown();
    assert!(publisher.poll(1_000.0).is_empty());
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn throttle_and_idle_hold_across_intervals() {
    let quiet_ms = 150.0;
    let samples: Vec<Sample> = (0..=25)
        .map(|i| Sample {
            at: i as f64 * 4.0,
            offset: i as f32 * 10.0,
        })
        .collect();
    let last_raw = 100.0;

    for throttle_ms in [1.0, 16.0, 50.0, 200.0, 400.0] {
        let burst = Burst {
            throttle_ms,
            quiet_ms,
            samples: samples.clone(),
        };
        let (states, mut publisher, _) = replay_states(&burst, 1_000.0);

        let active: Vec<(f64, f32)> = states
            .iter()
            .filter(|(_, s)| s.is_active)
            .map(|(t, s)| (*t, s.offset))
            .collect();
        for pair in active.windows(2) {
            assert!(
                pair[1].0 - pair[0].0 >= throttle_ms,
                "throttle {throttle_ms}: recomputations at {} and {}",
                pair[0].0,
                pair[1].0
            );
        }
        let (last_compute, last_offset) = *active.last().unwrap();
        assert_eq!(last_offset, 250.0, "throttle {throttle_ms}");

        let idle: Vec<f64> = states
            .iter()
            .filter(|(_, s)| !s.is_active)
            .map(|(t, _)| *t)
            .collect();
        assert_eq!(idle.len(), 1, "throttle {throttle_ms}: idle at {idle:?}");
        let earliest = last_raw + quiet_ms;
        let latest = earliest.max(last_compute) + 1.0;
        assert!(
            idle[0] >= earliest && idle[0] <= latest,
            "throttle {throttle_ms}: idle at {} outside {earliest}..={latest}",
            idle[0]
        );
        assert!(!publisher.state().is_active);
        assert_eq!(publisher.state().velocity, 0.0);
        assert_eq!(publisher.next_deadline(), None);
    }
}
