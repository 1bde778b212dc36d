//! Hero content fade, a projection of scroll progress.
//!
//! Near the end of the pinned region the overlay content fades out and
//! drifts upward. This never influences which frame is shown.

use scrollreel_core::PlaybackConfig;
use serde::Serialize;

use crate::progress::clamp_progress;

/// Style applied to the hero overlay for a given progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeroContentStyle {
    pub opacity: f64,
    /// Vertical offset in CSS pixels; negative moves up.
    pub offset_y: f64,
}

impl HeroContentStyle {
    pub const VISIBLE: HeroContentStyle = HeroContentStyle {
        opacity: 1.0,
        offset_y: 0.0,
    };
}

impl Default for HeroContentStyle {
    fn default() -> Self {
        Self::VISIBLE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroFade {
    pub start: f64,
    pub offset_px: f64,
}

impl Default for HeroFade {
    fn default() -> Self {
        Self {
            start: 0.8,
            offset_px: 50.0,
        }
    }
}

impl HeroFade {
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            start: config.fade_start,
            offset_px: config.fade_offset_px,
        }
    }

    pub fn style_at(&self, progress: f64) -> HeroContentStyle {
        let progress = clamp_progress(progress);
        if progress <= self.start || self.start >= 1.0 {
            return HeroContentStyle::VISIBLE;
        }
        let fade = ((progress - self.start) / (1.0 - self.start)).min(1.0);
        HeroContentStyle {
            opacity: 1.0 - fade,
            offset_y: -self.offset_px * fade,
        }
    }
}
