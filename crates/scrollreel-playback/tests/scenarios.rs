use scrollreel_core::{
    FrameBuffer, FrameIndex, PlaybackConfig, ScrollreelError, ScrollreelResult, SurfaceSize,
    Timestamp,
};
use scrollreel_playback::{
    PlaybackController, PlaybackPhase, Recovery, RenderRequest, ScrollDriver, ScrollEvent,
    ScrollReaction,
};
use scrollreel_render::{Canvas, DecodedImage, ImageSet, Placement, RasterCanvas};

/// Canvas double that records draw and blit calls and can fail draws.
#[derive(Debug)]
struct RecordingCanvas {
    inner: RasterCanvas,
    draws: usize,
    blits: usize,
    fail_draws: bool,
}

impl RecordingCanvas {
    fn new(size: SurfaceSize) -> Self {
        Self {
            inner: RasterCanvas::new(size),
            draws: 0,
            blits: 0,
            fail_draws: false,
        }
    }

    fn failing(size: SurfaceSize) -> Self {
        Self {
            fail_draws: true,
            ..Self::new(size)
        }
    }

    fn top_left(&self) -> Option<[u8; 4]> {
        self.inner.pixels().get_pixel(0, 0)
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> SurfaceSize {
        self.inner.size()
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.inner.resize(size);
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn draw_image(&mut self, image: &DecodedImage, placement: &Placement) -> ScrollreelResult<()> {
        self.draws += 1;
        if self.fail_draws {
            return Err(ScrollreelError::render("surface lost"));
        }
        self.inner.draw_image(image, placement)
    }

    fn snapshot(&self) -> Option<FrameBuffer> {
        self.inner.snapshot()
    }

    fn blit(&mut self, composite: &FrameBuffer) -> ScrollreelResult<()> {
        self.blits += 1;
        self.inner.blit(composite)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn colour(i: usize) -> [u8; 4] {
    [(i * 40 + 10) as u8, 0, 0, 255]
}

/// `n` solid-colour frames; indices in `failed` resolve as decode failures.
fn sequence(n: usize, failed: &[usize]) -> ImageSet {
    let mut set = ImageSet::new((1..=n).map(|i| format!("frames/frame_{:04}.jpg", i)));
    for i in 0..n {
        let outcome = if failed.contains(&i) {
            Err("corrupt jpeg".to_string())
        } else {
            Ok(DecodedImage::new(FrameBuffer::filled(2, 2, colour(i))))
        };
        set.resolve(FrameIndex(i), outcome);
    }
    set
}

fn controller() -> PlaybackController<RecordingCanvas> {
    PlaybackController::new(RecordingCanvas::new(SurfaceSize::new(4, 4)))
}

#[test]
fn test_out_of_range_requests_are_clamped() {
    init_tracing();
    let images = sequence(4, &[]);
    let mut c = controller();

    assert_eq!(c.render_frame(&images, 10, false), RenderRequest::Scheduled(FrameIndex(3)));
    assert_eq!(c.on_animation_frame().painted, vec![FrameIndex(3)]);
    assert_eq!(c.canvas().top_left(), Some(colour(3)));

    assert_eq!(c.render_frame(&images, -2, false), RenderRequest::Scheduled(FrameIndex(0)));
    assert_eq!(c.on_animation_frame().painted, vec![FrameIndex(0)]);
    assert_eq!(c.canvas().top_left(), Some(colour(0)));

    assert_eq!(
        c.render_frame(&images, i64::MAX, false),
        RenderRequest::Scheduled(FrameIndex(3))
    );
}

#[test]
fn test_same_frame_in_flight_paints_once() {
    let images = sequence(4, &[]);
    let mut c = controller();

    assert!(c.render_frame(&images, 2, false).is_scheduled());
    assert_eq!(c.render_frame(&images, 2, false), RenderRequest::Coalesced(FrameIndex(2)));

    let report = c.on_animation_frame();
    assert_eq!(report.paint_count(), 1);
    assert_eq!(c.canvas().draws, 1);
}

#[test]
fn test_forced_request_always_paints() {
    let images = sequence(4, &[]);
    let mut c = controller();

    c.render_frame(&images, 1, false);
    assert!(c.render_frame(&images, 1, true).is_scheduled());
    assert!(c.render_frame(&images, 2, true).is_scheduled());
    assert_eq!(c.current_frame(), FrameIndex(2));

    let report = c.on_animation_frame();
    assert_eq!(report.painted, vec![FrameIndex(1), FrameIndex(1), FrameIndex(2)]);
    assert_eq!(c.displayed_frame(), Some(FrameIndex(2)));
    assert_eq!(c.canvas().top_left(), Some(colour(2)));
}

#[test]
fn test_fallback_prefers_live_image() {
    let images = sequence(4, &[]);
    let mut c = controller();
    c.render_frame(&images, 1, false);
    c.on_animation_frame();

    assert_eq!(
        c.safe_render_frame(&images, 2),
        Recovery::Live(RenderRequest::Scheduled(FrameIndex(2)))
    );
    c.on_animation_frame();
    assert_eq!(c.canvas().blits, 0);
    assert_eq!(c.canvas().top_left(), Some(colour(2)));
}

#[test]
fn test_fallback_to_first_frame_without_cache() {
    let images = sequence(4, &[2]);
    let mut c = controller();

    assert_eq!(
        c.safe_render_frame(&images, 2),
        Recovery::FirstFrame(RenderRequest::Scheduled(FrameIndex(0)))
    );
    assert_eq!(c.on_animation_frame().painted, vec![FrameIndex(0)]);
    assert_eq!(c.canvas().top_left(), Some(colour(0)));
}

#[test]
fn test_failed_frame_keeps_last_and_recovers_from_cache() {
    init_tracing();
    let images = sequence(4, &[2]);
    let mut c = controller();

    c.render_frame(&images, 1, false);
    c.on_animation_frame();

    assert_eq!(c.render_frame(&images, 2, false), RenderRequest::NotReady(FrameIndex(2)));
    assert!(c.on_animation_frame().is_empty());
    assert_eq!(c.current_frame(), FrameIndex(1));
    assert_eq!(c.canvas().top_left(), Some(colour(1)));

    assert_eq!(c.safe_render_frame(&images, 2), Recovery::Cached(FrameIndex(1)));
    assert_eq!(c.canvas().blits, 1);
    assert_eq!(c.canvas().top_left(), Some(colour(1)));
    assert_eq!(c.pending_paints(), 0);
}

#[test]
fn test_resize_invalidates_and_rerenders_current_frame() {
    let images = sequence(4, &[]);
    let mut c = controller();
    c.render_frame(&images, 3, false);
    c.on_animation_frame();
    assert!(c.cache().latest().is_some());

    assert!(c.resize(&images, SurfaceSize::new(16, 9)));
    assert!(c.cache().is_empty());
    assert_eq!(c.pending_paints(), 1);

    let report = c.on_animation_frame();
    assert_eq!(report.painted, vec![FrameIndex(3)]);
    let cached = c.cache().get_for(SurfaceSize::new(16, 9)).unwrap();
    assert_eq!(cached.frame, FrameIndex(3));
}

#[test]
fn test_stale_cache_is_not_blitted_after_resize_to_empty() {
    let images = sequence(4, &[2]);
    let mut c = controller();
    c.render_frame(&images, 1, false);
    c.on_animation_frame();

    assert!(!c.resize(&images, SurfaceSize::new(0, 0)));
    assert!(matches!(c.safe_render_frame(&images, 2), Recovery::FirstFrame(_)));
    assert_eq!(c.canvas().blits, 0);
}

#[test]
fn test_draw_error_releases_in_flight() {
    init_tracing();
    let images = sequence(4, &[]);
    let mut c = PlaybackController::new(RecordingCanvas::failing(SurfaceSize::new(4, 4)));

    c.render_frame(&images, 1, false);
    let report = c.on_animation_frame();
    assert_eq!(report.failed, vec![FrameIndex(1)]);
    assert!(report.painted.is_empty());
    assert!(!c.is_render_in_flight());
    assert_eq!(c.phase(), PlaybackPhase::Ready);
    assert!(c.cache().is_empty());

    assert!(c.render_frame(&images, 2, false).is_scheduled());
}

#[test]
fn test_scroll_through_default_length_sequence() {
    let mut images = ImageSet::new((1..=251).map(|i| format!("frames/frame_{:04}.jpg", i)));
    for i in 0..251 {
        images.resolve(
            FrameIndex(i),
            Ok(DecodedImage::new(FrameBuffer::filled(1, 1, [0, 0, 0, 255]))),
        );
    }
    let mut driver = ScrollDriver::new(
        RasterCanvas::new(SurfaceSize::new(4, 4)),
        &PlaybackConfig::default(),
    );

    let mut now = Timestamp::zero();
    let mut painted = Vec::new();
    for progress in [0.0, 0.5, 1.0] {
        driver.handle(&images, ScrollEvent::Update(progress), now);
        now = Timestamp::from_millis(now.as_seconds() * 1000.0 + 16.0);
        painted.extend(driver.animation_frame(&images, now).painted);
    }
    assert_eq!(painted, vec![FrameIndex(0), FrameIndex(125), FrameIndex(250)]);
}

#[test]
fn test_burst_of_updates_paints_once_per_refresh() {
    let images = sequence(4, &[]);
    let mut driver = ScrollDriver::new(
        RecordingCanvas::new(SurfaceSize::new(4, 4)),
        &PlaybackConfig::default(),
    );

    let now = Timestamp::zero();
    assert_eq!(
        driver.handle(&images, ScrollEvent::Update(0.0), now),
        ScrollReaction::Render(RenderRequest::Scheduled(FrameIndex(0)))
    );
    assert_eq!(
        driver.handle(&images, ScrollEvent::Update(0.4), now),
        ScrollReaction::Render(RenderRequest::Busy(FrameIndex(1)))
    );
    assert_eq!(
        driver.handle(&images, ScrollEvent::Update(0.7), now),
        ScrollReaction::Render(RenderRequest::Busy(FrameIndex(2)))
    );

    let report = driver.animation_frame(&images, Timestamp::from_millis(16.0));
    assert_eq!(report.painted, vec![FrameIndex(0)]);
    assert_eq!(driver.controller().canvas().draws, 1);
}

#[test]
fn test_enter_back_after_leave_restores_frame() {
    let images = sequence(4, &[]);
    let mut driver = ScrollDriver::new(
        RecordingCanvas::new(SurfaceSize::new(4, 4)),
        &PlaybackConfig::default(),
    );

    driver.handle(&images, ScrollEvent::Update(1.0), Timestamp::zero());
    driver.animation_frame(&images, Timestamp::from_millis(16.0));
    driver.handle(&images, ScrollEvent::Leave, Timestamp::from_millis(32.0));
    driver.controller_mut().render_frame(&images, 0, true);
    driver.animation_frame(&images, Timestamp::from_millis(48.0));
    assert_eq!(driver.controller().canvas().top_left(), Some(colour(0)));

    driver.handle(&images, ScrollEvent::EnterBack(1.0), Timestamp::from_millis(100.0));
    assert!(driver
        .animation_frame(&images, Timestamp::from_millis(116.0))
        .is_empty());
    let report = driver.animation_frame(&images, Timestamp::from_millis(200.0));
    assert_eq!(report.painted, vec![FrameIndex(3)]);
    assert_eq!(driver.controller().canvas().top_left(), Some(colour(3)));
}
