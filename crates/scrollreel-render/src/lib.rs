//! # scrollreel-render
//!
//! Everything between encoded stills and pixels on a surface: decoding
//! and loading the image set, cover-fit drawing onto a [`Canvas`], and the
//! last-good composite cache used for recovery.

pub mod cache;
pub mod canvas;
pub mod cover;
pub mod image_loader;
pub mod image_set;
pub mod loader;

pub use cache::{CachedComposite, FrameCache};
pub use canvas::{render_cover, Canvas, RasterCanvas, RenderOutcome};
pub use cover::{cover_fit, Placement};
pub use image_set::{DecodedImage, FrameSlot, FrameStatus, ImageSet};
#[cfg(feature = "runtime")]
pub use loader::ImageSetLoader;
pub use loader::{LoadEvent, LoadProgress, LoadTracker};
