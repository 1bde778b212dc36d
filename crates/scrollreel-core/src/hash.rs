//! Content hashing for composites.
//!
//! Produces a SHA-256 hash of frame buffer data so two paints of the same
//! frame at the same surface size can be compared bit-for-bit.

use sha2::{Digest, Sha256};

use crate::frame::FrameBuffer;

/// A content hash digest (SHA-256, 32 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> String {
        self.to_hex()[..12].to_string()
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Compute the content hash of a single frame buffer.
pub fn hash_frame(frame: &FrameBuffer) -> ContentHash {
    let mut hasher = Sha256::new();
    // Dimensions and format are part of the identity: a resized composite
    // with coincidentally equal bytes must not compare equal.
    hasher.update(frame.width.to_le_bytes());
    hasher.update(frame.height.to_le_bytes());
    hasher.update([frame.format as u8]);
    hasher.update(&frame.data);
    let result = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    ContentHash::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;

    #[test]
    fn test_identical_frames_same_hash() {
        let a = FrameBuffer::filled(8, 8, [255, 0, 0, 255]);
        let b = FrameBuffer::filled(8, 8, [255, 0, 0, 255]);
        assert_eq!(hash_frame(&a), hash_frame(&b));
    }

    #[test]
    fn test_different_frames_different_hash() {
        let a = FrameBuffer::filled(8, 8, [255, 0, 0, 255]);
        let b = FrameBuffer::filled(8, 8, [0, 0, 255, 255]);
        assert_ne!(hash_frame(&a), hash_frame(&b));
    }

    #[test]
    fn test_dimensions_affect_hash() {
        let a = FrameBuffer::new(4, 2, PixelFormat::Rgba8);
        let b = FrameBuffer::new(2, 4, PixelFormat::Rgba8);
        assert_ne!(hash_frame(&a), hash_frame(&b));
    }

    #[test]
    fn test_hex_length() {
        let hash = hash_frame(&FrameBuffer::new(1, 1, PixelFormat::Rgba8));
        assert_eq!(hash.to_hex().len(), 64);
        assert_eq!(hash.short().len(), 12);
    }
}
