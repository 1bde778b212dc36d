//! Single-threaded player for the browser host.
//!
//! The host fetches each frame's bytes itself (it owns the network) and
//! hands them over with [`WasmPlayer::load_frame`]; scroll lifecycle
//! callbacks and the display-refresh callback forward here. The canvas is a
//! CPU [`RasterCanvas`] whose RGBA bytes the host copies into an `ImageData`.

use scrollreel_core::{
    FrameBuffer, FrameIndex, ScrollreelError, ScrollreelConfig, ScrollreelResult, SurfaceSize,
    Timestamp,
};
use scrollreel_playback::{
    FrameReport, HeroContentStyle, RenderRequest, ScrollDriver, ScrollEvent, ScrollReaction,
};
use scrollreel_render::image_loader::load_image_from_bytes;
use scrollreel_render::{DecodedImage, ImageSet, LoadEvent, LoadProgress, LoadTracker, RasterCanvas};
use serde::Serialize;
use tracing::info;

/// Load progress as handed to the host's indicator.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProgressReport {
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
    pub label: String,
    pub complete: bool,
}

impl From<LoadProgress> for ProgressReport {
    fn from(progress: LoadProgress) -> Self {
        Self {
            completed: progress.completed,
            total: progress.total,
            percent: progress.percent(),
            label: progress.label(),
            complete: progress.is_complete(),
        }
    }
}

pub struct WasmPlayer {
    config: ScrollreelConfig,
    tracker: LoadTracker,
    driver: ScrollDriver<RasterCanvas>,
    completed_once: bool,
}

impl WasmPlayer {
    pub fn new(config: ScrollreelConfig) -> Self {
        let sources = config
            .sequence
            .sources()
            .into_iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"));
        let mut tracker = LoadTracker::new(ImageSet::new(sources));
        let mut completed_once = false;
        tracker.start(&mut |event: &LoadEvent| {
            if matches!(event, LoadEvent::Complete(_)) {
                completed_once = true;
            }
        });
        let driver = ScrollDriver::new(RasterCanvas::new(config.surface.size()), &config.playback);
        let mut player = Self {
            config,
            tracker,
            driver,
            completed_once,
        };
        if player.completed_once {
            player.request_first_frame();
        }
        player
    }

    pub fn with_frames(frame_count: usize, width: u32, height: u32) -> Self {
        let mut config = ScrollreelConfig::default();
        config.sequence.frame_count = frame_count;
        config.surface.width = width;
        config.surface.height = height;
        Self::new(config)
    }

    pub fn config(&self) -> &ScrollreelConfig {
        &self.config
    }

    pub fn frame_count(&self) -> usize {
        self.images().len()
    }

    pub fn images(&self) -> &ImageSet {
        self.tracker.image_set()
    }

    /// URL (relative to the page) of frame `index`.
    pub fn frame_source(&self, index: usize) -> Option<&str> {
        self.images().get(FrameIndex(index)).map(|slot| slot.source())
    }

    /// Decode `bytes` as frame `index`. Undecodable bytes count as a failed
    /// frame, not an error; only an out-of-range index is rejected.
    pub fn load_frame(&mut self, index: usize, bytes: &[u8]) -> ScrollreelResult<LoadProgress> {
        let outcome = load_image_from_bytes(bytes)
            .map(DecodedImage::new)
            .map_err(|e| e.to_string());
        self.record(index, outcome)
    }

    /// The host could not fetch frame `index`.
    pub fn fail_frame(&mut self, index: usize, reason: &str) -> ScrollreelResult<LoadProgress> {
        self.record(index, Err(reason.to_string()))
    }

    fn record(
        &mut self,
        index: usize,
        outcome: Result<DecodedImage, String>,
    ) -> ScrollreelResult<LoadProgress> {
        if index >= self.frame_count() {
            return Err(ScrollreelError::InvalidArgument(format!(
                "frame index {} out of range (frame count {})",
                index,
                self.frame_count()
            )));
        }
        let mut completed = false;
        self.tracker.record(FrameIndex(index), outcome, &mut |event: &LoadEvent| {
            if matches!(event, LoadEvent::Complete(_)) {
                completed = true;
            }
        });
        if completed {
            self.completed_once = true;
            info!("all {} frames resolved", self.frame_count());
            self.request_first_frame();
        }
        Ok(self.tracker.progress())
    }

    /// Once every frame has resolved, frame 0 is shown without waiting for
    /// the first scroll event.
    fn request_first_frame(&mut self) -> RenderRequest {
        self.driver
            .controller_mut()
            .render_frame(self.tracker.image_set(), 0, false)
    }

    pub fn load_progress(&self) -> LoadProgress {
        self.tracker.progress()
    }

    /// Whether the one-time completion has fired.
    pub fn is_loaded(&self) -> bool {
        self.completed_once
    }

    pub fn scroll(&mut self, event: ScrollEvent, now_ms: f64) -> ScrollReaction {
        self.driver
            .handle(self.tracker.image_set(), event, Timestamp::from_millis(now_ms))
    }

    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.driver
            .resize(self.tracker.image_set(), SurfaceSize::new(width, height))
    }

    pub fn animation_frame(&mut self, now_ms: f64) -> FrameReport {
        self.driver
            .animation_frame(self.tracker.image_set(), Timestamp::from_millis(now_ms))
    }

    pub fn pixels(&self) -> &FrameBuffer {
        self.driver.controller().canvas().pixels()
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.driver.controller().surface_size()
    }

    pub fn current_frame(&self) -> FrameIndex {
        self.driver.controller().current_frame()
    }

    pub fn hero_style(&self, progress: f64) -> HeroContentStyle {
        self.driver.hero_fade().style_at(progress)
    }
}
