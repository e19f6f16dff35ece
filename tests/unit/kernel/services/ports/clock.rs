use super::*;

#[test]
fn successive_reads_strictly_increase() {
    let clock = MonotonicClock::new();
    let mut prev = clock.now_ms();
    for _ in 0..1000 {
        let next = clock.now_ms();
        assert!(next > prev);
        prev = next;
    }
}

#[test]
fn stays_ahead_of_a_future_reading() {
    let clock = MonotonicClock::new();
    let ahead = clock.next_after(u64::MAX / 2);
    assert!(clock.now_ms() > ahead);
}

#[test]
fn tracks_wall_time() {
    let clock = MonotonicClock::new();
    let wall = MonotonicClock::wall_ms();
    let now = clock.now_ms();
    assert!(now >= wall);
    assert!(now - wall < 60_000);
}
