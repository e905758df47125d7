use super::*;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn fires_by_due_time_then_schedule_order() {
    let mut lp = EventLoop::new();
    lp.schedule(LoopSource::AnimationTick, ms(100));
    lp.schedule(LoopSource::Frame, ms(16));
    lp.schedule(LoopSource::Frame, ms(100));

    assert_eq!(lp.pop_due(), None);
    lp.advance(ms(16));
    assert_eq!(lp.pop_due(), Some(LoopSource::Frame));
    assert_eq!(lp.pop_due(), None);

    lp.advance(ms(200));
    assert_eq!(lp.pop_due(), Some(LoopSource::AnimationTick));
    assert_eq!(lp.pop_due(), Some(LoopSource::Frame));
    assert!(lp.is_empty());
}

#[test]
fn cancel_removes_only_that_source() {
    let mut lp = EventLoop::new();
    lp.schedule(LoopSource::AnimationTick, ms(0));
    lp.schedule(LoopSource::Frame, ms(0));
    lp.cancel(LoopSource::AnimationTick);
    assert!(!lp.is_pending(LoopSource::AnimationTick));
    assert!(lp.is_pending(LoopSource::Frame));
    assert_eq!(lp.pop_due(), Some(LoopSource::Frame));
}

#[test]
fn zero_delay_is_due_immediately() {
    let mut lp = EventLoop::new();
    lp.advance(ms(50));
    lp.schedule(LoopSource::Frame, Duration::ZERO);
    assert_eq!(lp.pop_due(), Some(LoopSource::Frame));
    assert_eq!(lp.now_ms(), 50);
}
