use serde::{Deserialize, Serialize};

use crate::math::SurfaceSize;

/// Pixel format of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA (4 bytes per pixel).
    Rgba8,
    /// 8-bit RGB (3 bytes per pixel, no alpha).
    Rgb8,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// A raw pixel buffer: a decoded still, a canvas surface or a cached composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Raw pixel data.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: PixelFormat,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with zeros (transparent black).
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let size = (width as usize) * (height as usize) * format.bytes_per_pixel();
        Self {
            data: vec![0u8; size],
            width,
            height,
            format,
        }
    }

    /// Create an RGBA frame buffer filled with a single pixel value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&rgba);
        }
        Self {
            data,
            width,
            height,
            format: PixelFormat::Rgba8,
        }
    }

    /// Wrap already-decoded RGBA8 bytes. Returns `None` when the length does not match.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
            format: PixelFormat::Rgba8,
        })
    }

    /// Dimensions of this buffer.
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Total byte size of the pixel data.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Reset every byte to zero (transparent black).
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Get the RGBA value at a pixel coordinate. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * bpp;
        match self.format {
            PixelFormat::Rgba8 => Some([
                self.data[offset],
                self.data[offset + 1],
                self.data[offset + 2],
                self.data[offset + 3],
            ]),
            PixelFormat::Rgb8 => Some([
                self.data[offset],
                self.data[offset + 1],
                self.data[offset + 2],
                255,
            ]),
        }
    }

    /// Set the RGBA value at a pixel coordinate. No-op if out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * bpp;
        match self.format {
            PixelFormat::Rgba8 => {
                self.data[offset..offset + 4].copy_from_slice(&rgba);
            }
            PixelFormat::Rgb8 => {
                self.data[offset..offset + 3].copy_from_slice(&rgba[..3]);
            }
        }
    }

    /// Source-over blend of a single RGBA pixel at (x, y). No-op if out of bounds.
    pub fn blend_pixel(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let sa = src[3] as u32;
        if sa == 0 {
            return;
        }
        if sa == 255 || self.format != PixelFormat::Rgba8 {
            self.set_pixel(x, y, src);
            return;
        }
        let Some(dst) = self.get_pixel(x, y) else {
            return;
        };

        let da = dst[3] as u32;
        let inv_sa = 255 - sa;
        let out_a = sa + ((da * inv_sa) / 255);
        if out_a == 0 {
            return;
        }

        let channel = |s: u8, d: u8| -> u8 {
            ((s as u32 * sa * 255 + d as u32 * da * inv_sa) / (out_a * 255)) as u8
        };

        self.set_pixel(
            x,
            y,
            [
                channel(src[0], dst[0]),
                channel(src[1], dst[1]),
                channel(src[2], dst[2]),
                out_a as u8,
            ],
        );
    }
}

/// Zero-based position of a still within the sequence.
///
/// File naming is 1-based (`frame_0001`), array access 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct FrameIndex(pub usize);

impl FrameIndex {
    pub const FIRST: FrameIndex = FrameIndex(0);

    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// Clamp an arbitrary (possibly negative or overflowing) request into
    /// `[0, frame_count - 1]`. `None` when there are no frames at all.
    pub fn clamp_signed(requested: i64, frame_count: usize) -> Option<FrameIndex> {
        if frame_count == 0 {
            return None;
        }
        let last = (frame_count - 1) as i64;
        Some(FrameIndex(requested.clamp(0, last.max(0)) as usize))
    }

    /// 1-based number used in asset file names.
    pub fn sequence_number(&self) -> usize {
        self.0 + 1
    }
}

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "frame {}", self.0)
    }
}
