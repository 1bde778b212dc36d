//! The ordered set of stills backing a frame sequence.

use std::sync::Arc;

use scrollreel_core::{FrameBuffer, FrameIndex, SurfaceSize};

/// A decoded still. Cloning is cheap; pixels are shared.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: Arc<FrameBuffer>,
}

impl DecodedImage {
    pub fn new(pixels: FrameBuffer) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn natural_width(&self) -> u32 {
        self.pixels.width
    }

    pub fn natural_height(&self) -> u32 {
        self.pixels.height
    }

    pub fn size(&self) -> SurfaceSize {
        self.pixels.size()
    }

    /// A zero-sized decode result is treated like an image that never arrived.
    pub fn is_decoded(&self) -> bool {
        self.natural_width() > 0 && self.natural_height() > 0
    }

    pub fn pixels(&self) -> &FrameBuffer {
        &self.pixels
    }
}

#[derive(Debug, Clone)]
pub enum FrameStatus {
    Pending,
    Loaded(DecodedImage),
    Failed { reason: String },
}

/// One entry of the image set.
#[derive(Debug, Clone)]
pub struct FrameSlot {
    source: String,
    status: FrameStatus,
}

impl FrameSlot {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn status(&self) -> &FrameStatus {
        &self.status
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.status, FrameStatus::Loaded(_))
    }

    pub fn decode_failed(&self) -> bool {
        matches!(self.status, FrameStatus::Failed { .. })
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self.status, FrameStatus::Pending)
    }

    /// Pixel size of the loaded image; `None` until loaded.
    pub fn pixel_size(&self) -> Option<SurfaceSize> {
        match &self.status {
            FrameStatus::Loaded(image) => Some(image.size()),
            _ => None,
        }
    }

    /// The image, if it is loaded and fully decoded.
    pub fn ready_image(&self) -> Option<&DecodedImage> {
        match &self.status {
            FrameStatus::Loaded(image) if image.is_decoded() => Some(image),
            _ => None,
        }
    }
}

/// Fixed-length, index-addressed sequence of frame slots.
///
/// Slot `i` holds the still numbered `i + 1`. Each slot is resolved at most
/// once and is never cleared afterwards.
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    slots: Vec<FrameSlot>,
}

impl ImageSet {
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: sources
                .into_iter()
                .map(|source| FrameSlot {
                    source: source.into(),
                    status: FrameStatus::Pending,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: FrameIndex) -> Option<&FrameSlot> {
        self.slots.get(index.get())
    }

    pub fn ready_image(&self, index: FrameIndex) -> Option<&DecodedImage> {
        self.get(index).and_then(FrameSlot::ready_image)
    }

    pub fn is_ready(&self, index: FrameIndex) -> bool {
        self.ready_image(index).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameSlot> {
        self.slots.iter()
    }

    /// Record the outcome for a slot. Returns `false` (and changes nothing) if
    /// the index is out of range or the slot was already resolved.
    pub fn resolve(&mut self, index: FrameIndex, outcome: Result<DecodedImage, String>) -> bool {
        let Some(slot) = self.slots.get_mut(index.get()) else {
            return false;
        };
        if slot.is_resolved() {
            return false;
        }
        slot.status = match outcome {
            Ok(image) => FrameStatus::Loaded(image),
            Err(reason) => FrameStatus::Failed { reason },
        };
        true
    }

    pub fn resolved_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_resolved()).count()
    }

    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_loaded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.decode_failed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(w: u32, h: u32) -> DecodedImage {
        DecodedImage::new(FrameBuffer::filled(w, h, [0, 0, 0, 255]))
    }

    #[test]
    fn test_new_set_is_all_pending() {
        let set = ImageSet::new(["a.jpg", "b.jpg"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.resolved_count(), 0);
        assert!(!set.is_ready(FrameIndex(0)));
        assert_eq!(set.get(FrameIndex(1)).unwrap().source(), "b.jpg");
    }

    #[test]
    fn test_resolve_once_only() {
        let mut set = ImageSet::new(["a.jpg"]);
        assert!(set.resolve(FrameIndex(0), Ok(image(4, 4))));
        assert!(!set.resolve(FrameIndex(0), Err("late failure".into())));
        assert!(set.get(FrameIndex(0)).unwrap().is_loaded());
    }

    #[test]
    fn test_resolve_out_of_range() {
        let mut set = ImageSet::new(["a.jpg"]);
        assert!(!set.resolve(FrameIndex(5), Ok(image(1, 1))));
    }

    #[test]
    fn test_failed_slot_keeps_loaded_false() {
        let mut set = ImageSet::new(["a.jpg", "b.jpg"]);
        set.resolve(FrameIndex(1), Err("404".into()));
        let slot = set.get(FrameIndex(1)).unwrap();
        assert!(slot.decode_failed());
        assert!(!slot.is_loaded());
        assert_eq!(slot.pixel_size(), None);
        assert_eq!(set.failed_count(), 1);
    }

    #[test]
    fn test_zero_sized_image_is_not_ready() {
        let mut set = ImageSet::new(["a.jpg"]);
        set.resolve(FrameIndex(0), Ok(image(0, 0)));
        assert!(set.get(FrameIndex(0)).unwrap().is_loaded());
        assert!(!set.is_ready(FrameIndex(0)));
    }

    #[test]
    fn test_pixel_size_after_load() {
        let mut set = ImageSet::new(["a.jpg"]);
        set.resolve(FrameIndex(0), Ok(image(16, 9)));
        assert_eq!(
            set.get(FrameIndex(0)).unwrap().pixel_size(),
            Some(SurfaceSize::new(16, 9))
        );
    }
}
