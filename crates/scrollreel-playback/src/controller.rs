//! Per-canvas playback state machine.
//!
//! The controller owns the canvas, the composite cache and the paint queue.
//! Requests only *schedule* paints; the host calls
//! [`PlaybackController::on_animation_frame`] once per display refresh to
//! execute them, so a burst of scroll events collapses into at most one
//! paint per refresh.

use std::collections::VecDeque;

use scrollreel_core::{FrameIndex, SurfaceSize};
use scrollreel_render::{render_cover, Canvas, DecodedImage, FrameCache, ImageSet, RenderOutcome};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Nothing has been scheduled yet.
    Idle,
    /// A paint is in flight.
    Rendering,
    /// The last paint finished (successfully or not).
    Ready,
}

/// What a render request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRequest {
    /// A paint was queued for the next refresh.
    Scheduled(FrameIndex),
    /// Same frame already in flight; dropped.
    Coalesced(FrameIndex),
    /// Target image missing or not decoded; the displayed frame is kept.
    NotReady(FrameIndex),
    /// Another frame is in flight; dropped until the next update.
    Busy(FrameIndex),
    /// The image set is empty.
    NoFrames,
}

impl RenderRequest {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, RenderRequest::Scheduled(_))
    }
}

/// Which tier of [`PlaybackController::safe_render_frame`] was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The requested frame was ready and a forced paint was scheduled.
    Live(RenderRequest),
    /// The cached composite of this frame was put back on the canvas.
    Cached(FrameIndex),
    /// Last resort: a forced paint of frame 0.
    FirstFrame(RenderRequest),
    NoFrames,
}

/// Paints executed by one display refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub painted: Vec<FrameIndex>,
    pub failed: Vec<FrameIndex>,
    /// Jobs dropped because the surface had zero area.
    pub skipped: Vec<FrameIndex>,
    /// Cached composites put back by a recovery this refresh.
    pub restored: Vec<FrameIndex>,
}

impl FrameReport {
    pub fn paint_count(&self) -> usize {
        self.painted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.painted.is_empty()
            && self.failed.is_empty()
            && self.skipped.is_empty()
            && self.restored.is_empty()
    }

    /// Whether the canvas contents changed.
    pub fn changed_canvas(&self) -> bool {
        !self.painted.is_empty() || !self.restored.is_empty()
    }
}

#[derive(Debug, Clone)]
struct PaintJob {
    frame: FrameIndex,
    image: DecodedImage,
}

#[derive(Debug)]
pub struct PlaybackController<C: Canvas> {
    canvas: C,
    cache: FrameCache,
    current: FrameIndex,
    displayed: Option<FrameIndex>,
    in_flight: bool,
    phase: PlaybackPhase,
    queue: VecDeque<PaintJob>,
}

impl<C: Canvas> PlaybackController<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            cache: FrameCache::new(),
            current: FrameIndex::FIRST,
            displayed: None,
            in_flight: false,
            phase: PlaybackPhase::Idle,
            queue: VecDeque::new(),
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn cache(&self) -> &FrameCache {
        &self.cache
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.canvas.size()
    }

    /// The frame most recently accepted for painting.
    pub fn current_frame(&self) -> FrameIndex {
        self.current
    }

    /// The frame whose pixels are on the canvas, if any.
    pub fn displayed_frame(&self) -> Option<FrameIndex> {
        self.displayed
    }

    pub fn is_render_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn pending_paints(&self) -> usize {
        self.queue.len()
    }

    /// Request a paint of `requested`, clamped into the sequence.
    ///
    /// Non-forced requests are dropped while a paint is in flight; forced
    /// requests always schedule (if the image is ready).
    pub fn render_frame(&mut self, images: &ImageSet, requested: i64, forced: bool) -> RenderRequest {
        let Some(index) = FrameIndex::clamp_signed(requested, images.len()) else {
            return RenderRequest::NoFrames;
        };

        if index == self.current && self.in_flight && !forced {
            return RenderRequest::Coalesced(index);
        }

        let Some(image) = images.ready_image(index) else {
            warn!("image at index {} not loaded", index.get());
            return RenderRequest::NotReady(index);
        };

        if self.in_flight && !forced {
            return RenderRequest::Busy(index);
        }

        self.in_flight = true;
        self.phase = PlaybackPhase::Rendering;
        self.current = index;
        self.queue.push_back(PaintJob {
            frame: index,
            image: image.clone(),
        });
        RenderRequest::Scheduled(index)
    }

    /// Recovery render: live image, else cached composite, else frame 0.
    /// Never leaves the canvas blank when anything at all can be shown.
    pub fn safe_render_frame(&mut self, images: &ImageSet, requested: i64) -> Recovery {
        let Some(index) = FrameIndex::clamp_signed(requested, images.len()) else {
            return Recovery::NoFrames;
        };

        if images.is_ready(index) {
            return Recovery::Live(self.render_frame(images, index.get() as i64, true));
        }

        if let Some(cached) = self.cache.get_for(self.canvas.size()) {
            match self.canvas.blit(&cached.pixels) {
                Ok(()) => {
                    info!("used cached frame {} for index {}", cached.frame.get(), index.get());
                    self.displayed = Some(cached.frame);
                    return Recovery::Cached(cached.frame);
                }
                Err(e) => warn!("failed to restore cached frame: {}", e),
            }
        }

        info!("fallback to frame 0");
        Recovery::FirstFrame(self.render_frame(images, 0, true))
    }

    /// Apply a new surface size. The cache is dropped; if a frame was on
    /// screen it is re-rendered at the new size. Returns whether a paint was
    /// scheduled.
    pub fn resize(&mut self, images: &ImageSet, size: SurfaceSize) -> bool {
        self.canvas.resize(size);
        self.cache.invalidate();

        if size.is_empty() || self.displayed.is_none() {
            return false;
        }

        self.in_flight = false;
        self.render_frame(images, self.current.get() as i64, true)
            .is_scheduled()
    }

    /// Execute every queued paint. Call once per display refresh.
    pub fn on_animation_frame(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        if self.queue.is_empty() {
            return report;
        }

        while let Some(job) = self.queue.pop_front() {
            match render_cover(&mut self.canvas, &job.image) {
                Ok(RenderOutcome::Drawn(_)) => {
                    self.cache.capture(&self.canvas, job.frame, job.image.is_decoded());
                    self.displayed = Some(job.frame);
                    debug!("rendered frame {}", job.frame.get());
                    report.painted.push(job.frame);
                }
                Ok(RenderOutcome::EmptySurface) => {
                    debug!("skipped frame {}: zero-area surface", job.frame.get());
                    report.skipped.push(job.frame);
                }
                Ok(RenderOutcome::NotReady) => {
                    warn!("image at index {} not fully loaded", job.frame.get());
                    report.skipped.push(job.frame);
                }
                Err(e) => {
                    warn!("error rendering frame {}: {}", job.frame.get(), e);
                    report.failed.push(job.frame);
                }
            }
            self.in_flight = false;
        }

        self.phase = PlaybackPhase::Ready;
        report
    }
}
