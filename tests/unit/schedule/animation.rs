use super::*;
use crate::registry::catalog::builtin_animation_set;
use crate::render::log::{CallLogRenderer, RendererCall};

#[derive(Debug, Default)]
struct ManualClock {
    now: f64,
    paused: bool,
    ended: bool,
}

impl AudioClock for ManualClock {
    fn current_time(&self) -> f64 {
        self.now
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn ended(&self) -> bool {
        self.ended
    }
}

fn play(name: &str) -> RendererCall {
    RendererCall::PlayAnimation(name.to_owned())
}

fn emote(name: &str) -> RendererCall {
    RendererCall::UpdateEmotion(name.to_owned())
}

fn scenario_timeline() -> Timeline {
    let reg = builtin_animation_set();
    let mut tl = Timeline::default();
    tl.add_with_value(TrackKind::Action, 0.0, "Idle", &reg).unwrap();
    tl.add_with_value(TrackKind::Action, 5.0, "Wave", &reg).unwrap();
    tl.add_with_value(TrackKind::Emotion, 2.0, "Sad", &reg).unwrap();
    tl
}

#[test]
fn plays_scenario_in_time_order_and_returns_to_idle() {
    let tl = scenario_timeline();
    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    let mut clock = ManualClock::default();

    let token = sched.start(&tl, &mut renderer);
    let primed: Vec<_> = renderer.take_calls().into_iter().map(|c| c.call).collect();
    assert_eq!(primed, vec![play("Idle"), emote("Sad")]);
    assert!(sched.state().is_playing);

    let mut fired = Vec::new();
    for step in 1..=100 {
        clock.now = f64::from(step) / 10.0;
        clock.ended = step == 100;
        let outcome = sched.tick(token, &clock, &mut renderer);
        for call in renderer.take_calls() {
            fired.push((clock.now, call.call));
        }
        if step < 100 {
            assert_eq!(outcome, TickOutcome::Pending);
        } else {
            assert_eq!(outcome, TickOutcome::Finished);
        }
    }

    assert_eq!(
        fired,
        vec![
            (5.0, play("Wave")),
            (10.0, play("Idle")),
            (10.0, emote("")),
        ]
    );
    assert_eq!(sched.phase(), SchedulerPhase::Idle);
    assert_eq!(sched.state(), &AnimationRuntimeState::idle("Idle"));
}

#[test]
fn start_primes_first_keyframe_of_each_track() {
    let reg = builtin_animation_set();
    let mut tl = Timeline::default();
    tl.add_with_value(TrackKind::Action, 0.05, "Dance", &reg).unwrap();
    tl.add_with_value(TrackKind::Action, 3.0, "Jump", &reg).unwrap();
    tl.add_with_value(TrackKind::Emotion, 0.0, "Angry", &reg).unwrap();

    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    sched.start(&tl, &mut renderer);

    assert_eq!(renderer.calls(), vec![play("Dance"), emote("Angry")]);
    assert_eq!(sched.state().current_action, "Dance");
    assert_eq!(sched.state().current_emotion, "Angry");
    assert_eq!(sched.pending(), (1, 0));
}

#[test]
fn start_without_early_keyframes_shows_earliest_and_keeps_it_pending() {
    let reg = builtin_animation_set();
    let mut tl = Timeline::default();
    tl.add_with_value(TrackKind::Action, 4.0, "Wave", &reg).unwrap();
    tl.add_with_value(TrackKind::Action, 6.0, "Jump", &reg).unwrap();

    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    let token = sched.start(&tl, &mut renderer);
    assert_eq!(renderer.take_calls().len(), 1);
    assert_eq!(sched.state().current_action, "Wave");
    assert_eq!(sched.pending(), (2, 0));

    // Reaching the primed keyframe does not replay it.
    let clock = ManualClock {
        now: 6.0,
        ..ManualClock::default()
    };
    sched.tick(token, &clock, &mut renderer);
    assert_eq!(renderer.calls(), vec![play("Jump")]);
    assert_eq!(sched.pending(), (0, 0));
}

#[test]
fn start_with_empty_tracks_shows_idle_and_leaves_emotion_alone() {
    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    sched.start(&Timeline::default(), &mut renderer);
    assert_eq!(renderer.calls(), vec![play("Idle")]);
}

#[test]
fn keyframes_sharing_the_primed_time_all_fire_in_insertion_order() {
    let reg = builtin_animation_set();
    let mut tl = Timeline::default();
    tl.add_with_value(TrackKind::Action, 0.0, "Wave", &reg).unwrap();
    tl.add_with_value(TrackKind::Action, 0.0, "Jump", &reg).unwrap();

    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    let token = sched.start(&tl, &mut renderer);
    let clock = ManualClock {
        now: 1.0,
        ..ManualClock::default()
    };
    sched.tick(token, &clock, &mut renderer);
    assert_eq!(renderer.calls(), vec![play("Wave"), play("Jump")]);
    assert_eq!(sched.state().current_action, "Jump");
}

#[test]
fn late_tick_drains_every_due_keyframe_once() {
    let reg = builtin_animation_set();
    let mut tl = Timeline::default();
    for (t, name) in [(0.0, "Idle"), (1.0, "Wave"), (2.0, "Jump"), (3.0, "Dance")] {
        tl.add_with_value(TrackKind::Action, t, name, &reg).unwrap();
    }

    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    let token = sched.start(&tl, &mut renderer);
    renderer.take_calls();

    let clock = ManualClock {
        now: 3.5,
        ..ManualClock::default()
    };
    assert_eq!(sched.tick(token, &clock, &mut renderer), TickOutcome::Pending);
    assert_eq!(
        renderer.calls(),
        vec![play("Wave"), play("Jump"), play("Dance")]
    );

    renderer.take_calls();
    sched.tick(token, &clock, &mut renderer);
    assert!(renderer.calls().is_empty());
    assert_eq!(sched.pending(), (0, 0));
}

#[test]
fn equal_times_fire_in_insertion_order() {
    let reg = builtin_animation_set();
    let mut tl = Timeline::default();
    tl.add_with_value(TrackKind::Action, 0.0, "Idle", &reg).unwrap();
    tl.add_with_value(TrackKind::Action, 3.0, "Jump", &reg).unwrap();
    tl.add_with_value(TrackKind::Action, 3.0, "Wave", &reg).unwrap();

    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    let token = sched.start(&tl, &mut renderer);
    renderer.take_calls();

    let clock = ManualClock {
        now: 3.0,
        ..ManualClock::default()
    };
    sched.tick(token, &clock, &mut renderer);
    assert_eq!(renderer.calls(), vec![play("Jump"), play("Wave")]);
    assert_eq!(sched.state().current_action, "Wave");
}

#[test]
fn repeated_value_does_not_call_renderer_again() {
    let reg = builtin_animation_set();
    let mut tl = Timeline::default();
    tl.add_with_value(TrackKind::Emotion, 0.0, "Angry", &reg).unwrap();
    tl.add_with_value(TrackKind::Emotion, 1.0, "Sad", &reg).unwrap();
    tl.add_with_value(TrackKind::Emotion, 2.0, "Sad", &reg).unwrap();

    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    let token = sched.start(&tl, &mut renderer);
    renderer.take_calls();

    let clock = ManualClock {
        now: 2.5,
        ..ManualClock::default()
    };
    sched.tick(token, &clock, &mut renderer);
    assert_eq!(renderer.calls(), vec![emote("Sad")]);
}

#[test]
fn failed_transition_is_skipped_and_playback_continues() {
    let reg = builtin_animation_set();
    let mut tl = Timeline::default();
    tl.add_with_value(TrackKind::Action, 0.0, "Idle", &reg).unwrap();
    tl.add_with_value(TrackKind::Action, 1.0, "Punch", &reg).unwrap();
    tl.add_with_value(TrackKind::Action, 2.0, "Wave", &reg).unwrap();

    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    renderer.fail_on("Punch");
    let token = sched.start(&tl, &mut renderer);
    renderer.take_calls();

    let mut clock = ManualClock {
        now: 1.0,
        ..ManualClock::default()
    };
    sched.tick(token, &clock, &mut renderer);
    assert!(renderer.calls().is_empty());
    assert_eq!(sched.state().current_action, "Idle");
    assert_eq!(sched.failed_transitions(), 1);

    clock.now = 2.0;
    sched.tick(token, &clock, &mut renderer);
    assert_eq!(renderer.calls(), vec![play("Wave")]);
}

#[test]
fn restart_cancels_previous_pass() {
    let tl = scenario_timeline();
    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();

    let first = sched.start(&tl, &mut renderer);
    let second = sched.start(&tl, &mut renderer);
    assert_ne!(first, second);
    renderer.take_calls();

    let clock = ManualClock {
        now: 6.0,
        ..ManualClock::default()
    };
    assert_eq!(sched.tick(first, &clock, &mut renderer), TickOutcome::Stale);
    assert!(renderer.calls().is_empty());
    assert_eq!(sched.tick(second, &clock, &mut renderer), TickOutcome::Pending);
    assert_eq!(renderer.calls(), vec![play("Wave")]);
}

#[test]
fn late_tick_merges_tracks_by_time() {
    let reg = builtin_animation_set();
    let mut tl = Timeline::default();
    tl.add_with_value(TrackKind::Action, 0.0, "Idle", &reg).unwrap();
    tl.add_with_value(TrackKind::Emotion, 0.0, "Angry", &reg).unwrap();
    tl.add_with_value(TrackKind::Action, 2.0, "Wave", &reg).unwrap();
    tl.add_with_value(TrackKind::Emotion, 1.0, "Sad", &reg).unwrap();
    tl.add_with_value(TrackKind::Action, 3.0, "Jump", &reg).unwrap();

    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    let token = sched.start(&tl, &mut renderer);
    renderer.take_calls();

    let clock = ManualClock {
        now: 3.5,
        ..ManualClock::default()
    };
    sched.tick(token, &clock, &mut renderer);
    assert_eq!(
        renderer.calls(),
        vec![emote("Sad"), play("Wave"), play("Jump")]
    );
}

#[test]
fn stop_is_idempotent() {
    let tl = scenario_timeline();
    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();

    sched.stop(&mut renderer);
    assert!(renderer.calls().is_empty());

    let token = sched.start(&tl, &mut renderer);
    renderer.take_calls();
    sched.stop(&mut renderer);
    assert_eq!(renderer.take_calls().len(), 2);
    sched.stop(&mut renderer);
    assert!(renderer.calls().is_empty());

    let clock = ManualClock {
        now: 6.0,
        ..ManualClock::default()
    };
    assert_eq!(sched.tick(token, &clock, &mut renderer), TickOutcome::Stale);
    assert!(!sched.state().is_playing);
}

#[test]
fn resync_adopts_edits_without_replaying() {
    let reg = builtin_animation_set();
    let mut tl = scenario_timeline();
    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    let token = sched.start(&tl, &mut renderer);

    let mut clock = ManualClock {
        now: 3.0,
        ..ManualClock::default()
    };
    sched.tick(token, &clock, &mut renderer);
    renderer.take_calls();

    // Already-due keyframe added in the past becomes the visible value.
    tl.add_with_value(TrackKind::Action, 2.5, "Dance", &reg).unwrap();
    sched.resync(&tl, clock.now, &mut renderer).unwrap();
    assert_eq!(renderer.take_calls().len(), 1);
    assert_eq!(sched.state().current_action, "Dance");

    clock.now = 5.0;
    sched.tick(token, &clock, &mut renderer);
    assert_eq!(renderer.calls(), vec![play("Wave")]);
}

#[test]
fn resync_requires_running_pass() {
    let tl = scenario_timeline();
    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    let err = sched.resync(&tl, 1.0, &mut renderer).unwrap_err();
    assert!(matches!(err, AvatarError::Precondition(_)));
}

#[test]
fn reset_forces_idle_even_without_a_pass() {
    let mut sched = AnimationScheduler::new(&AvatarConfig::default());
    let mut renderer = CallLogRenderer::new();
    sched.reset(&mut renderer);
    assert_eq!(renderer.calls(), vec![play("Idle"), emote("")]);
    assert_eq!(sched.phase(), SchedulerPhase::Idle);
}
