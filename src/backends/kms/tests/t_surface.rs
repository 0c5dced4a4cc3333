use crate::{
    backends::kms::{
        surface::{Surface, SurfaceError},
        tests::fake::{Call, HEIGHT, Panel, WIDTH},
    },
    format::PixelFormat,
    video::drm::{DrmFb, DrmObject},
};

#[test]
fn create_reports_kernel_layout() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    let mut surface = Surface::create(&dev, WIDTH, HEIGHT, PixelFormat::Rgbx.drm()).unwrap();
    assert_eq!(surface.width(), WIDTH);
    assert_eq!(surface.height(), HEIGHT);
    // The fake pads rows to 256 bytes.
    assert_eq!(surface.row_bytes(), 3328);
    assert_eq!(surface.pixel_bytes(), 4);
    assert!(surface.fb().is_some());
    assert!(surface.is_allocated());
    let len = (surface.row_bytes() * surface.height()) as usize;
    let data = surface.data();
    assert_eq!(data.len(), len);
    data[len - 1] = 0xff;
    let s = panel.state();
    assert_eq!(s.live_dumbs.len(), 1);
    assert_eq!(s.live_fbs.len(), 1);
    assert_eq!(s.live_maps.len(), 1);
}

#[test]
fn rgb565_uses_two_bytes_per_pixel() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    let surface = Surface::create(&dev, WIDTH, HEIGHT, PixelFormat::Rgb565.drm()).unwrap();
    assert_eq!(surface.pixel_bytes(), 2);
    assert_eq!(surface.row_bytes(), 1792);
}

#[test]
fn map_failure_rolls_back() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    panel.state_mut().fail_map = true;
    let res = Surface::create(&dev, WIDTH, HEIGHT, PixelFormat::Rgbx.drm());
    assert!(matches!(res, Err(SurfaceError::Map(_))));
    let s = panel.state();
    assert!(s.nothing_allocated());
    let calls: Vec<_> = s
        .calls
        .iter()
        .filter(|c| !matches!(c, Call::Open(_) | Call::Close))
        .cloned()
        .collect();
    assert!(matches!(
        &calls[..],
        [
            Call::CreateDumb(h1),
            Call::AddFb(f1),
            Call::RmFb(f2),
            Call::DestroyDumb(h2),
        ] if h1 == h2 && f1 == f2
    ));
}

#[test]
fn add_fb_failure_rolls_back() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    panel.state_mut().fail_add_fb = true;
    let res = Surface::create(&dev, WIDTH, HEIGHT, PixelFormat::Rgbx.drm());
    assert!(matches!(res, Err(SurfaceError::AddFb(_))));
    let s = panel.state();
    assert!(s.nothing_allocated());
    assert!(!s.calls.iter().any(|c| matches!(c, Call::RmFb(_) | Call::Map(_))));
    assert_eq!(
        s.calls.iter().filter(|c| matches!(c, Call::DestroyDumb(_))).count(),
        1
    );
}

#[test]
fn allocation_failure_acquires_nothing() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    panel.state_mut().fail_create_dumb = true;
    let res = Surface::create(&dev, WIDTH, HEIGHT, PixelFormat::Rgbx.drm());
    assert!(matches!(res, Err(SurfaceError::Allocate(_))));
    let s = panel.state();
    assert!(s.nothing_allocated());
    assert!(s.calls.is_empty());
}

#[test]
fn destroy_is_idempotent() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    let mut surface = Surface::create(&dev, WIDTH, HEIGHT, PixelFormat::Rgbx.drm()).unwrap();
    surface.destroy();
    assert!(!surface.is_allocated());
    assert_eq!(surface.fb(), DrmFb::NONE);
    assert!(surface.data().is_empty());
    assert!(panel.state().nothing_allocated());
    let releases = |panel: &Panel| {
        panel
            .state()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Unmap(_) | Call::RmFb(_) | Call::DestroyDumb(_)))
            .count()
    };
    assert_eq!(releases(&panel), 3);
    surface.destroy();
    drop(surface);
    assert_eq!(releases(&panel), 3);
}

#[test]
fn release_order() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    let surface = Surface::create(&dev, WIDTH, HEIGHT, PixelFormat::Rgbx.drm()).unwrap();
    let fb = surface.fb();
    let start = panel.state().calls.len();
    drop(surface);
    let s = panel.state();
    assert!(matches!(
        &s.calls[start..],
        [Call::Unmap(_), Call::RmFb(f), Call::DestroyDumb(_)] if *f == fb.0
    ));
}

#[test]
fn fill_skips_row_padding() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    let mut surface = Surface::create(&dev, WIDTH, HEIGHT, PixelFormat::Rgbx.drm()).unwrap();
    surface.fill(&PixelFormat::Rgbx.encode(0x10, 0x20, 0x30));
    let row_bytes = surface.row_bytes() as usize;
    let data = surface.data();
    assert_eq!(&data[..4], [0x10, 0x20, 0x30, 0xff]);
    let last = (WIDTH as usize - 1) * 4;
    assert_eq!(&data[last..last + 4], [0x10, 0x20, 0x30, 0xff]);
    assert!(data[WIDTH as usize * 4..row_bytes].iter().all(|b| *b == 0));
    let tail = data.len() - row_bytes;
    assert_eq!(&data[tail..tail + 4], [0x10, 0x20, 0x30, 0xff]);
}

#[test]
fn fill_rejects_wrong_pixel_size() {
    let panel = Panel::new(None);
    let dev = panel.dev();
    let mut surface = Surface::create(&dev, WIDTH, HEIGHT, PixelFormat::Rgbx.drm()).unwrap();
    surface.fill(&PixelFormat::Rgb565.encode(0xff, 0xff, 0xff));
    assert!(surface.data().iter().all(|b| *b == 0));
}

#[test]
fn data_ends_at_last_row_of_page_aligned_buffer() {
    let panel = Panel::new(None);
    panel.state_mut().page_align_dumbs = true;
    let dev = panel.dev();
    let mut surface = Surface::create(&dev, 10, 3, PixelFormat::Rgbx.drm()).unwrap();
    assert_eq!(surface.row_bytes(), 256);
    let len = (surface.row_bytes() * surface.height()) as usize;
    assert_eq!(surface.data().len(), len);
    surface.fill(&PixelFormat::Rgbx.encode(0xff, 0xff, 0xff));
    let data = surface.data();
    for row in data.chunks_exact(256) {
        assert!(row[..40].iter().all(|b| *b == 0xff));
        assert!(row[40..].iter().all(|b| *b == 0));
    }
    surface.destroy();
    assert!(surface.data().is_empty());
}
