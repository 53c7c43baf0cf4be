//! Run the host on a dedicated thread.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::JoinHandle,
};

use crossbeam_channel::{Receiver, Sender};
use miette::Diagnostic;
use thiserror::Error;

use crate::{
    host::Host,
    presenter::{Presenter, SurfaceError},
    state::GameStateId,
};

/// Messages the game loop thread applies between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCommand {
    /// Switch the active state.
    TransitionTo(GameStateId),
}

/// Reasons the game loop ended abnormally.
#[derive(Debug, Error, Diagnostic)]
pub enum LoopError {
    /// Presentation surface went away.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Surface(#[from] SurfaceError),
    /// Operating system refused to create the thread.
    #[error("Error spawning game loop thread")]
    #[diagnostic(code(pixel_skeleton::controller::spawn))]
    Spawn(#[source] std::io::Error),
    /// Thread panicked, the host is lost.
    #[error("Game loop thread panicked")]
    #[diagnostic(code(pixel_skeleton::controller::panicked))]
    Panicked,
}

/// Clears the running flag of a [`LoopController`] from any thread.
#[derive(Debug, Clone)]
pub struct StopHandle {
    /// Shared with the loop thread.
    running: Arc<AtomicBool>,
}

impl StopHandle {
    /// Ask the game loop to stop after the current iteration.
    #[inline]
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Whether the game loop wasn't asked to stop yet.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// What the loop thread hands back when it ends.
type LoopThread<P> = JoinHandle<(Host<P>, Result<(), LoopError>)>;

/// Starts and stops the game loop thread owning the [`Host`].
///
/// # Example
///
/// ```no_run
/// # use pixel_skeleton::{Config, Host, LoopController, StateManager, presenter::{Presenter, SurfaceError}, RGBA8};
/// # struct Headless;
/// # impl Presenter for Headless {
/// #     fn acquire_surface(&mut self) -> Result<(), SurfaceError> { Ok(()) }
/// #     fn present(&mut self, _: imgref::ImgRef<'_, RGBA8>, _: u32, _: u32) -> Result<(), SurfaceError> { Ok(()) }
/// # }
/// let config = Config::default();
/// let host = Host::new(&config, StateManager::new(config.initial_state), Headless);
///
/// let mut controller = LoopController::new(host);
/// controller.start()?;
///
/// // ..
///
/// controller.stop()?;
/// # Ok::<(), pixel_skeleton::controller::LoopError>(())
/// ```
pub struct LoopController<P: Presenter + 'static> {
    /// Host while the loop is not running.
    host: Option<Host<P>>,
    /// Cancellation flag shared with the loop thread.
    running: Arc<AtomicBool>,
    /// Sending side of the command queue.
    commands: Sender<LoopCommand>,
    /// Receiving side, cloned into the loop thread.
    receiver: Receiver<LoopCommand>,
    /// Loop thread while it's running.
    thread: Option<LoopThread<P>>,
}

impl<P: Presenter + 'static> LoopController<P> {
    /// Wrap a host, the loop is not started yet.
    #[must_use]
    pub fn new(host: Host<P>) -> Self {
        let (commands, receiver) = crossbeam_channel::unbounded();

        Self {
            host: Some(host),
            running: Arc::new(AtomicBool::new(false)),
            commands,
            receiver,
            thread: None,
        }
    }

    /// Spawn the game loop thread.
    ///
    /// Calling this while the loop is already running does nothing.
    ///
    /// # Errors
    ///
    /// - When the thread could not be spawned.
    pub fn start(&mut self) -> Result<(), LoopError> {
        if self.thread.is_some() {
            log::warn!("Game loop is already started");

            return Ok(());
        }
        let Some(mut host) = self.host.take() else {
            // Only reachable when a previous loop thread panicked
            return Err(LoopError::Panicked);
        };

        self.running.store(true, Ordering::Release);

        let running = Arc::clone(&self.running);
        let receiver = self.receiver.clone();
        let thread = std::thread::Builder::new()
            .name("game-loop".to_owned())
            .spawn(move || {
                let result = host.run(&running, &receiver);

                (host, result)
            })
            .map_err(|err| {
                self.running.store(false, Ordering::Release);

                LoopError::Spawn(err)
            })?;

        self.thread = Some(thread);

        Ok(())
    }

    /// Ask the loop to stop and wait for the thread to finish.
    ///
    /// Afterwards the host is available again through [`LoopController::host`] and the loop can be restarted.
    ///
    /// # Errors
    ///
    /// - When the loop ended because of an error before it was stopped.
    /// - When the loop thread panicked.
    pub fn stop(&mut self) -> Result<(), LoopError> {
        self.running.store(false, Ordering::Release);

        self.join()
    }

    /// Wait for the loop to end by itself, for example when the surface closes.
    ///
    /// # Errors
    ///
    /// - Same as [`LoopController::stop`].
    pub fn join(&mut self) -> Result<(), LoopError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        let (host, result) = thread.join().map_err(|_| LoopError::Panicked)?;
        self.host = Some(host);

        log::debug!("Game loop thread joined");

        result
    }

    /// Queue a state switch, applied by the loop thread before its next iteration.
    ///
    /// When the loop is not running it's applied once the loop starts.
    pub fn transition_to(&self, next: GameStateId) {
        // Can't fail, this struct keeps a receiver alive
        let _ = self.commands.send(LoopCommand::TransitionTo(next));
    }

    /// Handle that can stop the loop from another thread.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Whether the loop thread is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
            && self.running.load(Ordering::Acquire)
    }

    /// Host, only available while the loop is not running.
    #[must_use]
    pub const fn host(&self) -> Option<&Host<P>> {
        self.host.as_ref()
    }
}

impl<P: Presenter + 'static> Drop for LoopController<P> {
    fn drop(&mut self) {
        if self.thread.is_some() {
            if let Err(err) = self.stop() {
                log::error!("Game loop ended with an error: {err}");
            }
        }
    }
}
