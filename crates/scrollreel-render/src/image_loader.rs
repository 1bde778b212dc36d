//! Image loading module.
//! Decodes JPEG and PNG stills into RGBA frame buffers.

use std::path::Path;

use scrollreel_core::{FrameBuffer, PixelFormat, ScrollreelError, ScrollreelResult};

/// Load an image file and convert it to a FrameBuffer.
pub fn load_image(path: &Path) -> ScrollreelResult<FrameBuffer> {
    let img = image::open(path).map_err(|e| {
        ScrollreelError::asset(
            format!("failed to load image '{}': {}", path.display(), e),
            path,
        )
    })?;

    Ok(into_frame_buffer(img))
}

/// Load an image from raw bytes (e.g., a response body handed over by the host).
pub fn load_image_from_bytes(data: &[u8]) -> ScrollreelResult<FrameBuffer> {
    let img = image::load_from_memory(data)
        .map_err(|e| ScrollreelError::Decode(format!("failed to decode image: {}", e)))?;

    Ok(into_frame_buffer(img))
}

/// Write an RGBA frame buffer as PNG.
pub fn save_png(fb: &FrameBuffer, path: &Path) -> ScrollreelResult<()> {
    if fb.format != PixelFormat::Rgba8 {
        return Err(ScrollreelError::InvalidArgument(
            "only RGBA8 buffers can be written as PNG".into(),
        ));
    }
    image::save_buffer(
        path,
        &fb.data,
        fb.width,
        fb.height,
        image::ExtendedColorType::Rgba8,
    )
    .map_err(|e| ScrollreelError::asset(format!("failed to write png: {}", e), path))
}

fn into_frame_buffer(img: image::DynamicImage) -> FrameBuffer {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut fb = FrameBuffer::new(width, height, PixelFormat::Rgba8);
    fb.data = rgba.into_raw();
    fb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_image_missing_file() {
        let result = load_image(Path::new("/nonexistent/frame_0001.jpg"));
        assert!(matches!(result, Err(ScrollreelError::Asset { .. })));
    }

    #[test]
    fn test_load_garbage_bytes_is_decode_error() {
        let result = load_image_from_bytes(b"definitely not a jpeg");
        assert!(matches!(result, Err(ScrollreelError::Decode(_))));
    }

    #[test]
    fn test_png_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_0001.png");
        let fb = FrameBuffer::filled(3, 2, [10, 20, 30, 255]);
        save_png(&fb, &path).unwrap();
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.width, 3);
        assert_eq!(loaded.height, 2);
        assert_eq!(loaded.get_pixel(2, 1), Some([10, 20, 30, 255]));
    }
}
