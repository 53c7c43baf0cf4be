//! Send frames from the game loop thread to the window thread.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use imgref::ImgRef;
use rgb::RGBA8;
use winit::event_loop::EventLoopProxy;

use crate::presenter::{Presenter, SurfaceError};

/// Rendered frame moving to the window thread.
#[derive(Debug)]
pub(crate) struct Frame {
    /// Horizontal pixels.
    pub(crate) width: u32,
    /// Vertical pixels.
    pub(crate) height: u32,
    /// Logical window size the frame should be shown at.
    pub(crate) target_size: (u32, u32),
    /// Pixels as RGBA bytes without padding.
    pub(crate) rgba: Vec<u8>,
}

/// Notify the window thread that a frame is waiting.
pub(crate) trait Wake: Send {
    /// Wake the window thread.
    ///
    /// # Returns
    ///
    /// - `false` when the window thread is gone.
    fn wake(&self) -> bool;
}

impl Wake for EventLoopProxy<()> {
    fn wake(&self) -> bool {
        self.send_event(()).is_ok()
    }
}

/// Channel holding at most a single frame that's not shown yet.
pub(crate) fn frame_channel() -> (Sender<Frame>, Receiver<Frame>) {
    crossbeam_channel::bounded(1)
}

/// [`Presenter`] for a winit window.
///
/// Frames go through a bounded channel, when the window thread didn't pick up the previous frame yet the new one is dropped.
pub(crate) struct WindowPresenter<W: Wake = EventLoopProxy<()>> {
    /// Pending frame for the window thread.
    frames: Sender<Frame>,
    /// Wakes the event loop after a frame is queued.
    waker: W,
    /// Set by the window thread when the pixel surface exists.
    ready: Arc<AtomicBool>,
    /// Set once the window thread is gone.
    closed: bool,
}

impl<W: Wake> WindowPresenter<W> {
    /// Bind to the window thread.
    pub(crate) const fn new(frames: Sender<Frame>, waker: W, ready: Arc<AtomicBool>) -> Self {
        Self {
            frames,
            waker,
            ready,
            closed: false,
        }
    }
}

impl<W: Wake> Presenter for WindowPresenter<W> {
    fn acquire_surface(&mut self) -> Result<(), SurfaceError> {
        if self.closed {
            Err(SurfaceError::Closed)
        } else if self.ready.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(SurfaceError::NotReady)
        }
    }

    fn present(
        &mut self,
        buffer: ImgRef<'_, RGBA8>,
        target_width: u32,
        target_height: u32,
    ) -> Result<(), SurfaceError> {
        // Window thread is behind, don't convert a frame that would be dropped anyway
        if self.frames.is_full() {
            return Err(SurfaceError::NotReady);
        }

        let mut rgba = Vec::with_capacity(buffer.width() * buffer.height() * 4);
        for row in buffer.rows() {
            rgba.extend(row.iter().flat_map(|pixel| [pixel.r, pixel.g, pixel.b, pixel.a]));
        }

        let frame = Frame {
            width: buffer.width() as u32,
            height: buffer.height() as u32,
            target_size: (target_width, target_height),
            rgba,
        };

        match self.frames.try_send(frame) {
            Ok(()) => (),
            Err(TrySendError::Full(_)) => return Err(SurfaceError::NotReady),
            Err(TrySendError::Disconnected(_)) => {
                self.closed = true;

                return Err(SurfaceError::Closed);
            }
        }

        if self.waker.wake() {
            Ok(())
        } else {
            self.closed = true;

            Err(SurfaceError::Closed)
        }
    }
}
