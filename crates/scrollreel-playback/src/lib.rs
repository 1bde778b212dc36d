//! # scrollreel-playback
//!
//! Scroll-driven frame selection on top of `scrollreel-render`: the
//! per-canvas [`PlaybackController`] state machine with its display-refresh
//! paint queue, and the [`ScrollDriver`] that feeds it from scroll
//! lifecycle events.

pub mod controller;
pub mod driver;
pub mod fade;
pub mod progress;

pub use controller::{FrameReport, PlaybackController, PlaybackPhase, Recovery, RenderRequest};
pub use driver::{ScrollDriver, ScrollEvent, ScrollReaction};
pub use fade::{HeroContentStyle, HeroFade};
pub use progress::{clamp_progress, progress_to_frame};
