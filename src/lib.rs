#![forbid(unsafe_code)]

//! Skeleton for 2D pixel-art games with a fixed timestep game loop.
//!
//! # Features
//!
//! - Fixed 60 Hz update rate decoupled from how long presenting a frame takes.
//! - Off-screen 320×180 RGBA buffer, presented integer scaled in a 1280×720 window.
//! - Game loop on a dedicated thread that can be started, stopped and sent commands.
//! - Switching between a menu and a level state.
//!
//! # Non-Goals
//!
//! - Input handling, asset loading, physics, audio or networking, the states are empty on purpose.
//!
//! # Usage
//!
//! There is a single trait [`State`] with two required functions, [`State::update`] and [`State::render`].
//! A [`StateManager`] routes every tick to the active state, a [`Host`] drives the manager with a fixed timestep and a [`LoopController`] runs the host on its own thread.
//!
//! ```
//! use pixel_skeleton::{
//!     presenter::{Presenter, SurfaceError},
//!     Config, GameStateId, Host, StateManager, RGBA8,
//! };
//!
//! /// Presenter that throws every frame away.
//! struct Headless;
//!
//! impl Presenter for Headless {
//!     fn acquire_surface(&mut self) -> Result<(), SurfaceError> {
//!         Ok(())
//!     }
//!
//!     fn present(
//!         &mut self,
//!         _buffer: imgref::ImgRef<'_, RGBA8>,
//!         _target_width: u32,
//!         _target_height: u32,
//!     ) -> Result<(), SurfaceError> {
//!         Ok(())
//!     }
//! }
//!
//! let config = Config::default();
//! let start = web_time::Instant::now();
//! let mut host = Host::with_start(&config, StateManager::new(GameStateId::Menu), Headless, start);
//!
//! // Two ticks are owed after two tick durations
//! let report = host.iterate(start + config.tick_duration() * 2).unwrap();
//! assert_eq!(report.ticks, 2);
//! ```
//!
//! # Features
//!
//! ## `window` (default)
//!
//! Open a desktop window with [`window::run`] and present the buffer on it.
//!
//! ## `x11`
//!
//! Build for X11 in addition to Wayland.

pub mod canvas;
pub mod clock;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod host;
pub mod presenter;
pub mod state;
#[cfg(feature = "window")]
pub mod window;

pub use config::Config;
pub use controller::{LoopController, StopHandle};
pub use host::Host;
pub use rgb::RGBA8;
pub use state::{GameStateId, State, StateManager};
