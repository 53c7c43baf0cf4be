//! Platform side of showing frames.

use imgref::ImgRef;
use miette::Diagnostic;
use rgb::RGBA8;
use thiserror::Error;

/// Where rendered frames end up, such as a window.
///
/// Called from the game loop thread.
pub trait Presenter: Send {
    /// Make sure a surface is available before a tick is rendered.
    ///
    /// # Errors
    ///
    /// - [`SurfaceError::NotReady`] when the platform surface hasn't been created yet, the tick is skipped and the call is retried the next tick.
    /// - [`SurfaceError::Closed`] when the surface will never become available again, this stops the game loop.
    fn acquire_surface(&mut self) -> Result<(), SurfaceError>;

    /// Show a rendered frame, scaled to the target size.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Logical pixels of the frame.
    /// * `target_width` - Width in physical pixels the frame is scaled to.
    /// * `target_height` - Height in physical pixels the frame is scaled to.
    ///
    /// # Errors
    ///
    /// - Same as [`Presenter::acquire_surface`].
    fn present(
        &mut self,
        buffer: ImgRef<'_, RGBA8>,
        target_width: u32,
        target_height: u32,
    ) -> Result<(), SurfaceError>;
}

/// Reasons a frame can't be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Diagnostic)]
pub enum SurfaceError {
    /// The surface doesn't exist yet, try again next tick.
    #[error("Presentation surface is not ready yet")]
    #[diagnostic(code(pixel_skeleton::surface::not_ready))]
    NotReady,
    /// The surface is gone for good.
    #[error("Presentation surface is closed")]
    #[diagnostic(
        code(pixel_skeleton::surface::closed),
        help("the window was probably closed")
    )]
    Closed,
}
