//! Pixel buffer the game draws on.

use imgref::{ImgRef, ImgRefMut};
use line_drawing::Bresenham;
use rgb::RGBA8;

/// Color the buffer is cleared to before every render.
pub const CLEAR_COLOR: RGBA8 = RGBA8 {
    r: 0,
    g: 0,
    b: 0,
    a: 255,
};

/// Fixed size off-screen image the game is rendered into.
///
/// Created once at startup, cleared and drawn into every tick, then presented scaled on the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    /// Amount of horizontal pixels.
    width: usize,
    /// Amount of vertical pixels.
    height: usize,
    /// Row-major pixels without padding.
    pixels: Vec<RGBA8>,
}

impl DisplayBuffer {
    /// Allocate a buffer filled with [`CLEAR_COLOR`].
    ///
    /// # Arguments
    ///
    /// * `width` - Amount of horizontal pixels.
    /// * `height` - Amount of vertical pixels.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let pixels = vec![CLEAR_COLOR; width * height];

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Fill every pixel with [`CLEAR_COLOR`].
    #[inline]
    pub fn clear(&mut self) {
        self.pixels.fill(CLEAR_COLOR);
    }

    /// Mutable view for drawing, the size can't be changed through it.
    #[inline]
    pub fn canvas(&mut self) -> Canvas<'_> {
        Canvas::new(ImgRefMut::new(&mut self.pixels[..], self.width, self.height))
    }

    /// Read-only view passed to the presenter.
    #[inline]
    #[must_use]
    pub fn as_img(&self) -> ImgRef<'_, RGBA8> {
        ImgRef::new(&self.pixels[..], self.width, self.height)
    }

    /// All pixels, row by row.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[RGBA8] {
        &self.pixels
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }
}

/// Simple wrapper around a pixel buffer that can be passed around to rendering calls.
///
/// All coordinates are signed so shapes partially outside of the canvas are clipped instead of wrapping.
pub struct Canvas<'a> {
    /// Borrowed pixels with their dimensions.
    image: ImgRefMut<'a, RGBA8>,
}

impl<'a> Canvas<'a> {
    /// Wrap a mutable image.
    #[inline]
    #[must_use]
    pub const fn new(image: ImgRefMut<'a, RGBA8>) -> Self {
        Self { image }
    }

    /// Set a pixel on the buffer at the coordinate passed.
    ///
    /// If the coordinate is out of bounds nothing will be done.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: RGBA8) {
        if let Some(index) = self.index(x, y) {
            self.image.buf_mut()[index] = color;
        }
    }

    /// Get the pixel at the coordinate.
    ///
    /// # Returns
    ///
    /// - `None` when the coordinate is outside of the canvas.
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<RGBA8> {
        self.index(x, y).map(|index| self.image.buf()[index])
    }

    /// Fill the canvas with a single color.
    #[inline]
    pub fn fill(&mut self, color: RGBA8) {
        self.image.buf_mut().fill(color);
    }

    /// Fill a rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: RGBA8) {
        let (canvas_width, canvas_height) = self.size();

        // Clamp to the canvas
        let start_x = clamp_to(i64::from(x), canvas_width);
        let end_x = clamp_to(i64::from(x) + i64::from(width), canvas_width);
        let start_y = clamp_to(i64::from(y), canvas_height);
        let end_y = clamp_to(i64::from(y) + i64::from(height), canvas_height);
        if start_x >= end_x {
            return;
        }

        let stride = self.image.stride();
        let buffer = self.image.buf_mut();
        for row in start_y..end_y {
            let row_index = row * stride;
            buffer[(row_index + start_x)..(row_index + end_x)].fill(color);
        }
    }

    /// Draw a line using Bresenham's line algorithm.
    ///
    /// Both ends are included, pixels outside of the canvas are skipped.
    pub fn draw_line(&mut self, start: (i32, i32), end: (i32, i32), color: RGBA8) {
        for (x, y) in Bresenham::new(start, end) {
            self.set_pixel(x, y, color);
        }
    }

    /// Get the raw buffer of pixels.
    #[inline]
    pub fn raw_buffer(&mut self) -> &mut [RGBA8] {
        self.image.buf_mut()
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.image.width()
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.image.height()
    }

    /// Size in pixels.
    #[inline]
    #[must_use]
    pub fn size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Index into the buffer, `None` if outside.
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x >= self.width() || y >= self.height() {
            return None;
        }

        Some(x + y * self.image.stride())
    }
}

/// Clamp a signed coordinate between zero and the size.
fn clamp_to(value: i64, size: usize) -> usize {
    usize::try_from(value.max(0)).map_or(size, |value| value.min(size))
}
