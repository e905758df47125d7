use super::*;
use crate::render::log::{CallLogRenderer, RendererCall};

#[derive(Debug, Default)]
struct ManualClock {
    now: f64,
    paused: bool,
}

impl AudioClock for ManualClock {
    fn current_time(&self) -> f64 {
        self.now
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn ended(&self) -> bool {
        false
    }
}

fn scenario_queue() -> VisemeQueue {
    VisemeQueue::from_events([
        VisemeEvent::new(1, 0),
        VisemeEvent::new(5, 120),
        VisemeEvent::new(0, 400),
    ])
    .unwrap()
}

#[test]
fn queue_rejects_out_of_order_events() {
    let mut queue = VisemeQueue::new();
    queue.push(VisemeEvent::new(3, 50)).unwrap();
    queue.push(VisemeEvent::new(4, 50)).unwrap();
    assert!(queue.push(VisemeEvent::new(5, 10)).is_err());
    assert_eq!(queue.len(), 2);
    queue.clear();
    assert!(queue.is_empty());
}

#[test]
fn event_serializes_camel_case() {
    let json = serde_json::to_string(&VisemeEvent::new(7, 250)).unwrap();
    assert_eq!(json, r#"{"visemeId":7,"timestampMs":250}"#);
}

#[test]
fn dispatches_each_event_once_in_order() {
    let queue = scenario_queue();
    let mut sync = VisemeSynchronizer::new();
    let mut renderer = CallLogRenderer::new();
    let mut clock = ManualClock::default();
    let token = sync.start(&queue);

    let mut seen = Vec::new();
    let mut ms = 0;
    loop {
        clock.now = f64::from(ms) / 1000.0;
        let outcome = sync.on_frame(token, &clock, &mut renderer);
        for call in renderer.take_calls() {
            seen.push((ms, call.call));
        }
        if outcome == FrameOutcome::Done {
            break;
        }
        assert_eq!(outcome, FrameOutcome::Reschedule);
        ms += 16;
        assert!(ms <= 500, "loop did not finish");
    }

    assert_eq!(
        seen,
        vec![
            (0, RendererCall::UpdateViseme(1)),
            (128, RendererCall::UpdateViseme(5)),
            (400, RendererCall::UpdateViseme(0)),
        ]
    );
    assert_eq!(sync.dispatched(), 3);
    assert!(!sync.is_running());
}

#[test]
fn stops_when_audio_pauses() {
    let queue = scenario_queue();
    let mut sync = VisemeSynchronizer::new();
    let mut renderer = CallLogRenderer::new();
    let token = sync.start(&queue);

    let clock = ManualClock {
        now: 0.05,
        paused: true,
    };
    assert_eq!(sync.on_frame(token, &clock, &mut renderer), FrameOutcome::Done);
    assert_eq!(renderer.calls(), vec![RendererCall::UpdateViseme(1)]);
    assert_eq!(sync.on_frame(token, &clock, &mut renderer), FrameOutcome::Stale);
}

#[test]
fn restart_drops_previous_utterance() {
    let mut sync = VisemeSynchronizer::new();
    let mut renderer = CallLogRenderer::new();
    let old = sync.start(&scenario_queue());

    let fresh = VisemeQueue::from_events([VisemeEvent::new(9, 0)]).unwrap();
    let token = sync.start(&fresh);

    let clock = ManualClock {
        now: 1.0,
        paused: false,
    };
    assert_eq!(sync.on_frame(old, &clock, &mut renderer), FrameOutcome::Stale);
    assert_eq!(sync.on_frame(token, &clock, &mut renderer), FrameOutcome::Done);
    assert_eq!(renderer.calls(), vec![RendererCall::UpdateViseme(9)]);
}

#[test]
fn failed_viseme_does_not_stall_the_cursor() {
    let mut sync = VisemeSynchronizer::new();
    let mut renderer = CallLogRenderer::new();
    renderer.fail_on_viseme(5);
    let token = sync.start(&scenario_queue());

    let clock = ManualClock {
        now: 0.5,
        paused: false,
    };
    assert_eq!(sync.on_frame(token, &clock, &mut renderer), FrameOutcome::Done);
    assert_eq!(
        renderer.calls(),
        vec![RendererCall::UpdateViseme(1), RendererCall::UpdateViseme(0)]
    );
    assert_eq!(sync.failed(), 1);
}

#[test]
fn empty_queue_finishes_on_first_frame() {
    let mut sync = VisemeSynchronizer::new();
    let mut renderer = CallLogRenderer::new();
    let token = sync.start(&VisemeQueue::new());
    let clock = ManualClock::default();
    assert_eq!(sync.on_frame(token, &clock, &mut renderer), FrameOutcome::Done);
    assert!(renderer.calls().is_empty());
}
