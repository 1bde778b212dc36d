//! Scroll-to-frame driver.
//!
//! Translates the host's pinned-scroll lifecycle into controller calls.
//! Updates go through the coalescing path; entering the region (from
//! either direction) schedules a recovery render after the settle delay,
//! fired by [`ScrollDriver::tick`].

use scrollreel_core::{Duration, FrameIndex, PlaybackConfig, SurfaceSize, Timestamp};
use scrollreel_render::{Canvas, ImageSet};
use tracing::{debug, info};

use crate::controller::{FrameReport, PlaybackController, Recovery, RenderRequest};
use crate::fade::{HeroContentStyle, HeroFade};
use crate::progress::{clamp_progress, progress_to_frame};

/// Lifecycle events of the pinned scroll region. Payloads are progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollEvent {
    Enter(f64),
    EnterBack(f64),
    Update(f64),
    Leave,
    Complete,
}

impl ScrollEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ScrollEvent::Enter(_) => "enter",
            ScrollEvent::EnterBack(_) => "enter-back",
            ScrollEvent::Update(_) => "update",
            ScrollEvent::Leave => "leave",
            ScrollEvent::Complete => "complete",
        }
    }
}

/// What the driver did with an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollReaction {
    Render(RenderRequest),
    RecoveryScheduled { frame: FrameIndex, due: Timestamp },
    /// Logged only.
    Observed,
    NoFrames,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DeferredRecovery {
    frame: FrameIndex,
    due: Timestamp,
}

#[derive(Debug)]
pub struct ScrollDriver<C: Canvas> {
    controller: PlaybackController<C>,
    settle_delay: Duration,
    fade: HeroFade,
    deferred: Vec<DeferredRecovery>,
    progress: f64,
    hero_style: HeroContentStyle,
}

impl<C: Canvas> ScrollDriver<C> {
    pub fn new(canvas: C, config: &PlaybackConfig) -> Self {
        Self::with_controller(PlaybackController::new(canvas), config)
    }

    pub fn with_controller(controller: PlaybackController<C>, config: &PlaybackConfig) -> Self {
        Self {
            controller,
            settle_delay: config.settle_delay(),
            fade: HeroFade::from_config(config),
            deferred: Vec::new(),
            progress: 0.0,
            hero_style: HeroContentStyle::VISIBLE,
        }
    }

    pub fn controller(&self) -> &PlaybackController<C> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<C> {
        &mut self.controller
    }

    pub fn into_controller(self) -> PlaybackController<C> {
        self.controller
    }

    /// Last progress seen, clamped to [0, 1].
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn hero_style(&self) -> HeroContentStyle {
        self.hero_style
    }

    pub fn hero_fade(&self) -> &HeroFade {
        &self.fade
    }

    pub fn pending_recoveries(&self) -> usize {
        self.deferred.len()
    }

    pub fn handle(&mut self, images: &ImageSet, event: ScrollEvent, now: Timestamp) -> ScrollReaction {
        match event {
            ScrollEvent::Update(progress) => {
                self.progress = clamp_progress(progress);
                self.hero_style = self.fade.style_at(self.progress);
                match progress_to_frame(self.progress, images.len()) {
                    Some(frame) => ScrollReaction::Render(self.controller.render_frame(
                        images,
                        frame.get() as i64,
                        false,
                    )),
                    None => ScrollReaction::NoFrames,
                }
            }
            ScrollEvent::Enter(progress) | ScrollEvent::EnterBack(progress) => {
                self.progress = clamp_progress(progress);
                info!("{} hero section at progress {:.3}", event.name(), self.progress);
                let Some(frame) = progress_to_frame(self.progress, images.len()) else {
                    return ScrollReaction::NoFrames;
                };
                let due = now + self.settle_delay;
                debug!("recovery of frame {} due at {}", frame.get(), due);
                self.deferred.push(DeferredRecovery { frame, due });
                ScrollReaction::RecoveryScheduled { frame, due }
            }
            ScrollEvent::Leave => {
                info!("leaving hero section");
                ScrollReaction::Observed
            }
            ScrollEvent::Complete => {
                info!("frame animation completed");
                ScrollReaction::Observed
            }
        }
    }

    /// Fire every deferred recovery whose settle delay has elapsed.
    pub fn tick(&mut self, images: &ImageSet, now: Timestamp) -> Vec<Recovery> {
        let (due, waiting): (Vec<_>, Vec<_>) = self.deferred.drain(..).partition(|r| r.due <= now);
        self.deferred = waiting;
        due.into_iter()
            .map(|r| self.controller.safe_render_frame(images, r.frame.get() as i64))
            .collect()
    }

    /// One display refresh: due recoveries first, then the paint queue.
    pub fn animation_frame(&mut self, images: &ImageSet, now: Timestamp) -> FrameReport {
        let recoveries = self.tick(images, now);
        let mut report = self.controller.on_animation_frame();
        report.restored.extend(recoveries.into_iter().filter_map(|r| match r {
            Recovery::Cached(frame) => Some(frame),
            _ => None,
        }));
        report
    }

    pub fn resize(&mut self, images: &ImageSet, size: SurfaceSize) -> bool {
        self.controller.resize(images, size)
    }
}
