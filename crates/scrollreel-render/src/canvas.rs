//! The drawing surface seam and the cover-fit frame renderer.

use scrollreel_core::{FrameBuffer, ScrollreelResult, SurfaceSize};

use crate::cover::{cover_fit, Placement};
use crate::image_set::DecodedImage;

/// A 2D drawing surface the engine paints composites onto.
///
/// Implemented on the CPU by [`RasterCanvas`]; hosts may wrap their own
/// surface. Drawing calls return `Result` so a failing paint can be caught
/// and reported instead of wedging the caller.
pub trait Canvas {
    fn size(&self) -> SurfaceSize;

    /// Change the surface dimensions. Contents are discarded.
    fn resize(&mut self, size: SurfaceSize);

    /// Clear the whole surface to transparent.
    fn clear(&mut self);

    /// Draw `image` scaled into `placement.rect`, clipped to the surface.
    fn draw_image(&mut self, image: &DecodedImage, placement: &Placement) -> ScrollreelResult<()>;

    /// Byte copy of the current contents; `None` for a zero-area surface.
    fn snapshot(&self) -> Option<FrameBuffer>;

    /// Clear, then copy `composite` to the origin at its natural size.
    fn blit(&mut self, composite: &FrameBuffer) -> ScrollreelResult<()>;
}

/// CPU canvas backed by an RGBA frame buffer.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    buffer: FrameBuffer,
}

impl RasterCanvas {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            buffer: FrameBuffer::new(size.width, size.height, scrollreel_core::PixelFormat::Rgba8),
        }
    }

    pub fn pixels(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn into_pixels(self) -> FrameBuffer {
        self.buffer
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> SurfaceSize {
        self.buffer.size()
    }

    fn resize(&mut self, size: SurfaceSize) {
        *self = RasterCanvas::new(size);
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn draw_image(&mut self, image: &DecodedImage, placement: &Placement) -> ScrollreelResult<()> {
        let size = self.size();
        let src = image.pixels();
        if size.is_empty() || !image.is_decoded() || placement.scale <= 0.0 {
            return Ok(());
        }

        let rect = placement.rect;
        let x0 = rect.x.max(0.0).floor() as u32;
        let y0 = rect.y.max(0.0).floor() as u32;
        let x1 = (rect.right().min(size.width as f64).ceil().max(0.0) as u32).min(size.width);
        let y1 = (rect.bottom().min(size.height as f64).ceil().max(0.0) as u32).min(size.height);

        // Nearest-neighbour: sample the source at each destination pixel centre.
        for dy in y0..y1 {
            let sy = ((dy as f64 + 0.5 - rect.y) / placement.scale).floor();
            if sy < 0.0 || sy >= src.height as f64 {
                continue;
            }
            for dx in x0..x1 {
                let sx = ((dx as f64 + 0.5 - rect.x) / placement.scale).floor();
                if sx < 0.0 || sx >= src.width as f64 {
                    continue;
                }
                if let Some(pixel) = src.get_pixel(sx as u32, sy as u32) {
                    self.buffer.blend_pixel(dx, dy, pixel);
                }
            }
        }
        Ok(())
    }

    fn snapshot(&self) -> Option<FrameBuffer> {
        if self.size().is_empty() {
            return None;
        }
        Some(self.buffer.clone())
    }

    fn blit(&mut self, composite: &FrameBuffer) -> ScrollreelResult<()> {
        self.buffer.clear();
        let width = composite.width.min(self.buffer.width);
        let height = composite.height.min(self.buffer.height);
        for y in 0..height {
            for x in 0..width {
                if let Some(pixel) = composite.get_pixel(x, y) {
                    self.buffer.blend_pixel(x, y, pixel);
                }
            }
        }
        Ok(())
    }
}

/// Result of a cover render attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderOutcome {
    Drawn(Placement),
    /// The image has no decoded pixels; nothing was touched.
    NotReady,
    /// The surface has zero area; nothing to draw.
    EmptySurface,
}

/// Clear the canvas and draw `image` cover-fitted to it.
pub fn render_cover<C: Canvas + ?Sized>(
    canvas: &mut C,
    image: &DecodedImage,
) -> ScrollreelResult<RenderOutcome> {
    if !image.is_decoded() {
        return Ok(RenderOutcome::NotReady);
    }

    let size = canvas.size();
    let Some(placement) = cover_fit(image.size(), size) else {
        return Ok(RenderOutcome::EmptySurface);
    };

    canvas.clear();
    canvas.draw_image(image, &placement)?;
    Ok(RenderOutcome::Drawn(placement))
}
