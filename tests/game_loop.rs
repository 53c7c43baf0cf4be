//! Drive the game loop with a presenter which doesn't actually interface with any OS functionality.

use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use imgref::ImgRef;
use pixel_skeleton::{
    canvas::Canvas,
    presenter::{Presenter, SurfaceError},
    state::StateError,
    Config, GameStateId, Host, State, StateManager, RGBA8,
};
use web_time::Instant;

/// Test presenter, counts the frames and checks their size.
#[derive(Default)]
struct TestPresenter {
    frames: u32,
}

impl Presenter for TestPresenter {
    fn acquire_surface(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn present(
        &mut self,
        buffer: ImgRef<'_, RGBA8>,
        target_width: u32,
        target_height: u32,
    ) -> Result<(), SurfaceError> {
        assert_eq!((buffer.width(), buffer.height()), (320, 180));
        assert_eq!((target_width, target_height), (1280, 720));
        self.frames += 1;

        Ok(())
    }
}

/// Calls received by a [`Recording`] state.
#[derive(Default)]
struct Calls {
    updates: AtomicU32,
    renders: AtomicU32,
}

/// State that only counts its calls.
struct Recording(Arc<Calls>);

impl State for Recording {
    fn update(&mut self) -> Result<(), StateError> {
        // Every update is followed by a render before the next update
        assert_eq!(
            self.0.updates.load(Ordering::SeqCst),
            self.0.renders.load(Ordering::SeqCst)
        );
        self.0.updates.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }

    fn render(&mut self, _canvas: &mut Canvas<'_>) -> Result<(), StateError> {
        self.0.renders.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}

/// Host with recording states for both slots.
fn recording_host(start: Instant) -> (Host<TestPresenter>, Arc<Calls>, Arc<Calls>) {
    recording_host_with_config(start, &Config::default())
}

/// Host with recording states for both slots and a custom config.
fn recording_host_with_config(
    start: Instant,
    config: &Config,
) -> (Host<TestPresenter>, Arc<Calls>, Arc<Calls>) {
    let menu = Arc::new(Calls::default());
    let level1 = Arc::new(Calls::default());
    let states = StateManager::with_states(
        GameStateId::Menu,
        Box::new(Recording(Arc::clone(&menu))),
        Box::new(Recording(Arc::clone(&level1))),
    );
    let host = Host::with_start(config, states, TestPresenter::default(), start);

    (host, menu, level1)
}

#[test]
fn one_second_of_frames_reports_sixty_ticks() {
    let start = Instant::now();
    let (mut host, menu, level1) = recording_host(start);

    // Frames a little faster than the tick rate
    let frame = Duration::from_micros(16_600);
    let mut reports = Vec::new();
    for step in 1..=61 {
        let report = host.iterate(start + frame * step).unwrap();
        if let Some(fps) = report.fps {
            reports.push(fps);
        }
    }

    assert_eq!(menu.updates.load(Ordering::SeqCst), 60);
    assert_eq!(menu.renders.load(Ordering::SeqCst), 60);
    assert_eq!(level1.updates.load(Ordering::SeqCst), 0);
    assert_eq!(level1.renders.load(Ordering::SeqCst), 0);
    assert_eq!(host.presenter().frames, 60);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].ticks, 60);
}

#[test]
fn owed_ticks_are_drained_in_a_single_iteration() {
    let start = Instant::now();
    let (mut host, menu, _level1) = recording_host(start);
    let tick = Config::default().tick_duration();

    let report = host.iterate(start + tick * 5).unwrap();

    assert_eq!(report.ticks, 5);
    assert_eq!(menu.updates.load(Ordering::SeqCst), 5);
    assert_eq!(menu.renders.load(Ordering::SeqCst), 5);
    assert!(host.clock().accumulator() < 1.0);
}

#[test]
fn long_stall_is_caught_up_by_default() {
    let start = Instant::now();
    let (mut host, menu, _level1) = recording_host(start);

    let report = host.iterate(start + Duration::from_secs(10)).unwrap();

    assert_eq!(report.ticks, 600);
    assert_eq!(menu.updates.load(Ordering::SeqCst), 600);
    assert_eq!(menu.renders.load(Ordering::SeqCst), 600);
    assert!(host.clock().accumulator() < 1.0);
}

#[test]
fn long_stall_is_clamped_when_configured() {
    let start = Instant::now();
    let config = Config::default().with_max_frame_time_secs(0.25);
    let (mut host, menu, _level1) = recording_host_with_config(start, &config);

    // Ten seconds without an iteration only catch up a quarter second
    let report = host.iterate(start + Duration::from_secs(10)).unwrap();

    assert_eq!(report.ticks, 15);
    assert_eq!(menu.updates.load(Ordering::SeqCst), 15);
}

#[test]
fn transition_moves_ticks_to_the_other_state() {
    let start = Instant::now();
    let (mut host, menu, level1) = recording_host(start);
    let tick = Config::default().tick_duration();

    host.iterate(start + tick * 2).unwrap();
    assert!(host.states_mut().transition_to(GameStateId::Level1));
    host.iterate(start + tick * 5).unwrap();

    assert_eq!(menu.updates.load(Ordering::SeqCst), 2);
    assert_eq!(level1.updates.load(Ordering::SeqCst), 3);
    assert_eq!(level1.renders.load(Ordering::SeqCst), 3);
}
