//! Spawn a winit window and run the game loop.
//!
//! Requires the `window` feature flag.

mod presenter;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use miette::{IntoDiagnostic, Result, WrapErr};
use pixels::{
    wgpu::{self, Color},
    PixelsBuilder, SurfaceTexture,
};
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use self::presenter::{frame_channel, WindowPresenter};
use crate::{
    controller::{LoopController, LoopError},
    presenter::SurfaceError,
    Config, Host, StateManager,
};

/// Open a window and run the game loop on a separate thread until the window is closed.
///
/// The window can't be resized, its size is the buffer size multiplied by the scaling.
///
/// # Arguments
///
/// * `config` - Configuration for the window and the game loop.
/// * `states` - States driven by the game loop.
///
/// # Errors
///
/// - When the config is invalid.
/// - When a window could not be opened.
/// - When the game loop thread could not be spawned or panicked.
pub fn run(config: Config, states: StateManager) -> Result<()> {
    config.validate()?;

    let event_loop = EventLoop::new()
        .into_diagnostic()
        .wrap_err("Error setting up event loop for window")?;
    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(
            config.window_width(),
            config.window_height(),
        ))
        .with_resizable(false)
        .build(&event_loop)
        .into_diagnostic()
        .wrap_err("Error setting up window")?;

    // Set by this thread once the pixel surface exists
    let ready = Arc::new(AtomicBool::new(false));

    let (frames, frame_receiver) = frame_channel();
    let presenter = WindowPresenter::new(frames, event_loop.create_proxy(), Arc::clone(&ready));
    let mut controller = LoopController::new(Host::new(&config, states, presenter));
    let stop = controller.stop_handle();
    controller.start()?;

    log::debug!("Opening window with game loop");

    // Frames only wake the loop with user events, no need to poll
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut pixels = None;
    let mut buffer_size = (config.buffer_width, config.buffer_height);
    let mut target_size = (config.window_width(), config.window_height());
    let result = event_loop.run(|event, elwt| {
        if let Some(is_ready) = surface_readiness(&event, pixels.is_some()) {
            ready.store(is_ready, Ordering::Release);
        }

        match event {
            // The surface can only be created once the window is resumed
            Event::Resumed if pixels.is_none() => {
                let size = window.inner_size();
                let surface_texture = SurfaceTexture::new(size.width, size.height, &window);

                match PixelsBuilder::new(config.buffer_width, config.buffer_height, surface_texture)
                    .clear_color(Color::BLACK)
                    .build()
                {
                    Ok(new_pixels) => {
                        pixels = Some(new_pixels);
                        ready.store(true, Ordering::Release);

                        log::debug!("Pixel surface ready");
                    }
                    Err(err) => {
                        log::error!("Error creating pixel surface: {err}");

                        stop.stop();
                        elwt.exit();
                    }
                }
            }
            Event::UserEvent(()) => {
                let Some(pixels) = &mut pixels else {
                    return;
                };
                // Only the latest frame is shown
                let Some(frame) = frame_receiver.try_iter().last() else {
                    return;
                };

                if frame.target_size != target_size {
                    target_size = frame.target_size;
                    let _ =
                        window.request_inner_size(LogicalSize::new(target_size.0, target_size.1));
                }

                if (frame.width, frame.height) != buffer_size {
                    if let Err(err) = pixels.resize_buffer(frame.width, frame.height) {
                        log::error!("Error resizing pixel buffer: {err}");

                        return;
                    }
                    buffer_size = (frame.width, frame.height);
                }
                pixels.frame_mut().copy_from_slice(&frame.rgba);

                match pixels.render() {
                    Ok(()) => (),
                    Err(err) if is_transient(&err) => {
                        log::debug!("Skipping frame, surface unavailable: {err}");
                    }
                    Err(err) => {
                        log::error!("Error presenting frame: {err}");

                        stop.stop();
                        elwt.exit();
                    }
                }
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    log::debug!("Window close requested");

                    stop.stop();
                    elwt.exit();
                }
                WindowEvent::Resized(size) => {
                    if let Some(pixels) = &mut pixels {
                        if let Err(err) = pixels.resize_surface(size.width, size.height) {
                            log::error!("Error resizing pixel surface: {err}");
                        }
                    }
                }
                _ => (),
            },
            _ => (),
        }
    });

    ready.store(false, Ordering::Release);
    stop.stop();

    let loop_result = controller.stop();
    result
        .into_diagnostic()
        .wrap_err("Error running window event loop")?;

    match loop_result {
        // The event loop may be gone before the game loop noticed the stop
        Ok(()) | Err(LoopError::Surface(SurfaceError::Closed)) => Ok(()),
        Err(err) => Err(err).wrap_err("Error running game loop"),
    }
}

/// Readiness of the pixel surface after a lifecycle event.
///
/// # Returns
///
/// - `None` when the event doesn't change the readiness.
fn surface_readiness(event: &Event<()>, has_surface: bool) -> Option<bool> {
    match event {
        Event::Resumed if has_surface => Some(true),
        Event::Suspended => Some(false),
        _ => None,
    }
}

/// Whether presenting can be retried with the next frame.
fn is_transient(err: &pixels::Error) -> bool {
    matches!(
        err,
        pixels::Error::Surface(
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost
        )
    )
}
