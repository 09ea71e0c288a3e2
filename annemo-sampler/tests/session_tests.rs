//! Session timing tests on a paused tokio clock
//!
//! The clock only moves when every task is idle, so each 100 ms tick is
//! observed exactly once and sample counts are deterministic.

use annemo_common::{Dimension, EmotionSample, Submission};
use annemo_sampler::{
    AnnotationContext, AnnotationSession, MediaPlayer, PlaybackRate, SamplerState,
    SimulatedPlayer,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

type Samples = mpsc::UnboundedReceiver<Submission<EmotionSample>>;

fn context(video: &str) -> AnnotationContext {
    AnnotationContext {
        subject: "alice".into(),
        video: video.into(),
        dimension: Dimension::Valence,
    }
}

fn start(duration: f64) -> (AnnotationSession, SimulatedPlayer, Samples) {
    let player = SimulatedPlayer::new(duration);
    let (tx, rx) = mpsc::unbounded_channel();
    let session = AnnotationSession::spawn(context("clip01.mp4"), player.clone(), tx);
    (session, player, rx)
}

fn drain(rx: &mut Samples) -> Vec<EmotionSample> {
    let mut samples = Vec::new();
    while let Ok(submission) = rx.try_recv() {
        samples.push(submission.data);
    }
    samples
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[tokio::test(start_paused = true)]
async fn test_held_slider_samples_every_tick() {
    let (session, player, mut rx) = start(60.0);
    session.slider_moved(0.4);
    session.pointer_down();

    sleep(Duration::from_millis(350)).await;

    let samples = drain(&mut rx);
    assert_eq!(samples.len(), 4, "initial sample plus three ticks");
    assert!(!samples[0].playing);
    assert_close(samples[0].media_time, 0.0);
    for (i, sample) in samples[1..].iter().enumerate() {
        assert!(sample.playing);
        assert_close(sample.media_time, 0.1 * (i + 1) as f64);
        assert_eq!(sample.value, 0.4);
        assert_eq!(sample.dimension, Dimension::Valence);
        assert_eq!(sample.subject.as_deref(), Some("alice"));
        assert_eq!(sample.video.as_deref(), Some("clip01.mp4"));
    }
    assert!(player.is_playing());

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SamplerState::Playing);
    assert!(snapshot.timer_armed);
}

#[tokio::test(start_paused = true)]
async fn test_slider_changes_show_up_in_next_tick() {
    let (session, _player, mut rx) = start(60.0);
    session.pointer_down();
    sleep(Duration::from_millis(150)).await;
    session.slider_moved(-0.6);
    sleep(Duration::from_millis(100)).await;

    let values: Vec<f64> = drain(&mut rx).iter().map(|s| s.value).collect();
    assert_eq!(values, vec![0.0, 0.0, -0.6]);
}

#[tokio::test(start_paused = true)]
async fn test_paused_playback_emits_nothing_but_keeps_timer() {
    let (session, mut player, mut rx) = start(60.0);
    session.pointer_down();
    sleep(Duration::from_millis(250)).await;
    assert_eq!(drain(&mut rx).len(), 3);

    player.pause();
    session.playback_changed();
    sleep(Duration::from_millis(500)).await;

    assert!(drain(&mut rx).is_empty());
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.state, SamplerState::Armed);
    assert!(snapshot.timer_armed);

    player.play();
    session.playback_changed();
    sleep(Duration::from_millis(230)).await;

    let resumed = drain(&mut rx);
    assert_eq!(resumed.len(), 2);
    assert!(resumed.iter().all(|s| s.playing));
}

#[tokio::test(start_paused = true)]
async fn test_release_emits_one_final_sample_and_stops() {
    let (session, player, mut rx) = start(60.0);
    session.pointer_down();
    sleep(Duration::from_millis(250)).await;
    drain(&mut rx);

    session.pointer_up();
    let snapshot = session.snapshot().await.unwrap();
    let released = drain(&mut rx);

    assert_eq!(released.len(), 1);
    assert!(!released[0].playing);
    assert_close(released[0].media_time, 0.25);
    assert_eq!(snapshot.state, SamplerState::Idle);
    assert!(!snapshot.timer_armed);
    assert!(!player.is_playing());

    sleep(Duration::from_secs(1)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_content_end_emits_terminal_sample() {
    let (session, _player, mut rx) = start(0.25);
    session.pointer_down();
    sleep(Duration::from_millis(450)).await;

    // Ticks at 100 and 200 ms; from 300 ms the player sits at the end
    assert_eq!(drain(&mut rx).len(), 3);

    session.content_ended();
    let snapshot = session.snapshot().await.unwrap();
    let terminal = drain(&mut rx);

    assert_eq!(terminal.len(), 1);
    assert_close(terminal[0].media_time, 0.25);
    assert!(!terminal[0].playing);
    assert_eq!(snapshot.state, SamplerState::Armed);
    assert!(snapshot.timer_armed);
}

#[tokio::test(start_paused = true)]
async fn test_context_change_resets_session() {
    let (session, player, mut rx) = start(60.0);
    session.set_playback_rate(PlaybackRate::Double);
    session.slider_moved(0.7);
    session.pointer_down();
    sleep(Duration::from_millis(150)).await;

    let samples = drain(&mut rx);
    assert_eq!(samples.len(), 2);
    assert_close(samples[1].media_time, 0.2);

    session.change_context(context("clip02.mp4"));
    let snapshot = session.snapshot().await.unwrap();

    assert_eq!(snapshot.state, SamplerState::Idle);
    assert!(!snapshot.timer_armed);
    assert_eq!(snapshot.value, 0.0);
    assert_eq!(snapshot.playback_rate, PlaybackRate::Normal);
    assert_eq!(snapshot.context.video, "clip02.mp4");
    assert_eq!(player.playback_rate(), PlaybackRate::Normal);
    assert!(!player.is_playing());

    sleep(Duration::from_secs(1)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_cancels_timer() {
    let (session, player, mut rx) = start(60.0);
    session.pointer_down();
    sleep(Duration::from_millis(50)).await;

    drop(session);
    sleep(Duration::from_secs(1)).await;

    assert_eq!(drain(&mut rx).len(), 1);
    // The sink went away with the session task
    assert!(rx.recv().await.is_none());
    assert!(!player.is_playing());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_waits_for_task() {
    let (session, player, mut rx) = start(60.0);
    session.pointer_down();
    session.shutdown().await;

    assert!(!player.is_playing());
    assert_eq!(drain(&mut rx).len(), 1);
    assert!(rx.recv().await.is_none());
}
