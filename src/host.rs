//! Drive the states with a fixed timestep and present the result.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use crossbeam_channel::Receiver;
use web_time::Instant;

use crate::{
    canvas::DisplayBuffer,
    clock::LoopClock,
    config::Config,
    controller::{LoopCommand, LoopError},
    diagnostics::{FpsCounter, FpsReport},
    presenter::{Presenter, SurfaceError},
    state::StateManager,
};

/// What happened during a single [`Host::iterate`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IterationReport {
    /// Ticks where the active state was updated and rendered.
    pub ticks: u32,
    /// Ticks skipped because the presentation surface was not ready.
    pub skipped: u32,
    /// Executed ticks where the state returned an error.
    pub failed: u32,
    /// FPS report if a report window closed during this iteration.
    pub fps: Option<FpsReport>,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    /// State updated and rendered.
    Executed,
    /// State updated and rendered but at least one of them returned an error.
    Failed,
    /// Surface not ready, nothing happened.
    Skipped,
}

/// Owns everything the game loop touches.
///
/// Every owed tick updates the active state, clears the buffer, renders the active state into it and presents the buffer.
pub struct Host<P: Presenter> {
    /// Off-screen pixels.
    buffer: DisplayBuffer,
    /// Active state and all instances.
    states: StateManager,
    /// Platform surface.
    presenter: P,
    /// Fixed timestep accumulator.
    clock: LoopClock,
    /// Diagnostic tick counter.
    fps: FpsCounter,
    /// Physical width the buffer is scaled to.
    target_width: u32,
    /// Physical height the buffer is scaled to.
    target_height: u32,
    /// Copied from the config so the clock can be restarted.
    max_frame_time: Option<Duration>,
    /// Copied from the config so the counter can be restarted.
    fps_interval: Duration,
}

impl<P: Presenter> Host<P> {
    /// Setup the host, the clock starts now.
    ///
    /// # Arguments
    ///
    /// * `config` - Buffer size, scaling and timing.
    /// * `states` - States to drive.
    /// * `presenter` - Where the frames are shown.
    #[must_use]
    pub fn new(config: &Config, states: StateManager, presenter: P) -> Self {
        Self::with_start(config, states, presenter, Instant::now())
    }

    /// Setup the host with an explicit start time for the clock.
    #[must_use]
    pub fn with_start(config: &Config, states: StateManager, presenter: P, start: Instant) -> Self {
        let buffer = DisplayBuffer::new(config.buffer_width as usize, config.buffer_height as usize);
        let max_frame_time = config.max_frame_time_secs.map(Duration::from_secs_f64);
        let fps_interval = Duration::from_secs_f64(config.fps_report_interval_secs);

        Self {
            buffer,
            states,
            presenter,
            clock: LoopClock::new(start, config.tick_duration(), max_frame_time),
            fps: FpsCounter::new(start, fps_interval),
            target_width: config.window_width(),
            target_height: config.window_height(),
            max_frame_time,
            fps_interval,
        }
    }

    /// Run a single loop iteration.
    ///
    /// Adds the time passed since the last iteration and runs every full tick that's owed.
    ///
    /// # Errors
    ///
    /// - [`SurfaceError::Closed`] when the presenter is gone, the remaining owed ticks stay in the accumulator.
    pub fn iterate(&mut self, now: Instant) -> Result<IterationReport, SurfaceError> {
        self.clock.advance(now);

        let mut report = IterationReport::default();
        while self.clock.has_pending_tick() {
            let outcome = self.tick()?;
            self.clock.consume_tick();

            match outcome {
                TickOutcome::Executed => report.ticks += 1,
                TickOutcome::Failed => {
                    report.ticks += 1;
                    report.failed += 1;
                }
                TickOutcome::Skipped => report.skipped += 1,
            }
            if outcome != TickOutcome::Skipped {
                self.fps.record_tick();
            }
        }

        report.fps = self.fps.poll(now);

        Ok(report)
    }

    /// Run iterations until the flag is cleared, sleeping between ticks.
    ///
    /// Commands are applied before each iteration, never between an update and its render.
    ///
    /// # Errors
    ///
    /// - When the presentation surface is closed, the flag is cleared as well.
    pub fn run(
        &mut self,
        running: &AtomicBool,
        commands: &Receiver<LoopCommand>,
    ) -> Result<(), LoopError> {
        // Time spent before the loop started shouldn't be caught up
        self.restart(Instant::now());

        log::debug!("Game loop started");

        while running.load(Ordering::Acquire) {
            for command in commands.try_iter() {
                self.handle_command(command);
            }

            if let Err(err) = self.iterate(Instant::now()) {
                running.store(false, Ordering::Release);
                log::error!("Stopping game loop: {err}");

                return Err(err.into());
            }

            let tick_duration = self.clock.tick_duration();
            std::thread::sleep(self.clock.until_next_tick().min(tick_duration));
        }

        log::debug!("Game loop stopped");

        Ok(())
    }

    /// Reset the clock and the FPS counter to start at the time passed.
    pub fn restart(&mut self, now: Instant) {
        self.clock = LoopClock::new(now, self.clock.tick_duration(), self.max_frame_time);
        self.fps = FpsCounter::new(now, self.fps_interval);
    }

    /// Apply a command sent from another thread.
    pub fn handle_command(&mut self, command: LoopCommand) {
        match command {
            LoopCommand::TransitionTo(next) => {
                self.states.transition_to(next);
            }
        }
    }

    /// Active state and all instances.
    #[inline]
    #[must_use]
    pub const fn states(&self) -> &StateManager {
        &self.states
    }

    /// Mutable access to the states.
    #[inline]
    pub fn states_mut(&mut self) -> &mut StateManager {
        &mut self.states
    }

    /// Off-screen pixel buffer.
    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    /// Platform surface.
    #[inline]
    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Fixed timestep accumulator.
    #[inline]
    #[must_use]
    pub const fn clock(&self) -> &LoopClock {
        &self.clock
    }

    /// Update and render a single tick.
    fn tick(&mut self) -> Result<TickOutcome, SurfaceError> {
        match self.presenter.acquire_surface() {
            Ok(()) => (),
            Err(SurfaceError::NotReady) => {
                log::debug!("Presentation surface not ready, skipping tick");

                return Ok(TickOutcome::Skipped);
            }
            Err(err) => return Err(err),
        }

        let mut failed = false;

        if let Err(err) = self.states.update() {
            log::error!("Error updating state {}: {err}", self.states.active_name());
            failed = true;
        }

        self.buffer.clear();
        if let Err(err) = self.states.render(&mut self.buffer.canvas()) {
            log::error!("Error rendering state {}: {err}", self.states.active_name());
            failed = true;
        }

        match self
            .presenter
            .present(self.buffer.as_img(), self.target_width, self.target_height)
        {
            Ok(()) => (),
            // The frame is lost but the state did advance
            Err(SurfaceError::NotReady) => log::debug!("Presentation surface lost a frame"),
            Err(err) => return Err(err),
        }

        Ok(if failed {
            TickOutcome::Failed
        } else {
            TickOutcome::Executed
        })
    }
}
