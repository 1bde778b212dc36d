//! Last-good composite cache.
//!
//! After every successful paint the canvas contents are copied here so a
//! recovery path can put *something* back on screen when the frame it wants
//! is not decoded yet. The copy is only valid for the surface size it was
//! taken at; any resize drops it.

use scrollreel_core::{FrameBuffer, FrameIndex, SurfaceSize};

use crate::canvas::Canvas;

#[derive(Debug, Clone, PartialEq)]
pub struct CachedComposite {
    /// Frame that was on screen when the copy was taken.
    pub frame: FrameIndex,
    pub pixels: FrameBuffer,
}

impl CachedComposite {
    pub fn size(&self) -> SurfaceSize {
        self.pixels.size()
    }
}

#[derive(Debug, Default)]
pub struct FrameCache {
    entry: Option<CachedComposite>,
}

impl FrameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached composite with a copy of `canvas`.
    ///
    /// Stores nothing (and drops any previous copy) when the surface has
    /// zero area or the frame that was drawn is not ready.
    pub fn capture<C: Canvas + ?Sized>(
        &mut self,
        canvas: &C,
        frame: FrameIndex,
        source_ready: bool,
    ) -> Option<&CachedComposite> {
        self.entry = if source_ready {
            canvas
                .snapshot()
                .map(|pixels| CachedComposite { frame, pixels })
        } else {
            None
        };
        self.entry.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// The cached composite, only if it was taken at exactly `size`.
    pub fn get_for(&self, size: SurfaceSize) -> Option<&CachedComposite> {
        self.entry.as_ref().filter(|c| c.size() == size)
    }

    pub fn latest(&self) -> Option<&CachedComposite> {
        self.entry.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}
