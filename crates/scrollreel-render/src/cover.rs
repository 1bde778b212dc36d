//! Cover-fit placement: scale an image to fill the target completely,
//! preserving aspect ratio and cropping the overflow equally on both sides.

use scrollreel_core::{Rect, SurfaceSize};

/// Where a scaled image lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    pub scale: f64,
}

/// `scale = max(tw / iw, th / ih)`, centred on both axes.
///
/// `None` if either the image or the target has zero area.
pub fn cover_fit(image: SurfaceSize, target: SurfaceSize) -> Option<Placement> {
    if image.is_empty() || target.is_empty() {
        return None;
    }

    let (iw, ih) = (image.width as f64, image.height as f64);
    let (tw, th) = (target.width as f64, target.height as f64);

    let scale = (tw / iw).max(th / ih);
    let width = iw * scale;
    let height = ih * scale;
    let x = tw / 2.0 - width / 2.0;
    let y = th / 2.0 - height / 2.0;

    Some(Placement {
        rect: Rect::new(x, y, width, height),
        scale,
    })
}
