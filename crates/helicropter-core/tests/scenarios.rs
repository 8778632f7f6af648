//! End-to-end crop scenarios through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use helicropter_core::raster::{render_crop, DecodedImage, FilterType};
use helicropter_core::{
    CropCoordinates, CropError, Cropper, CropperConfig, InitialImage, Point, Size, SurfaceEvent,
    Transform,
};

const FLOWER: Size = Size::new(800.0, 600.0);

fn cropper() -> Cropper {
    Cropper::new(CropperConfig::default()).unwrap()
}

#[test]
fn initial_centering() {
    let mut c = cropper();
    let t = c.set_image("flower.jpg", FLOWER, None).unwrap();

    let min = (320.0f64 / 800.0).max(250.0 / 600.0);
    assert_relative_eq!(t.scale, min);
    assert_relative_eq!(t.scale, 0.4167, epsilon = 1e-4);
    assert_relative_eq!(t.left, (320.0 - 800.0 * min) / 2.0);
    assert_relative_eq!(t.top, (250.0 - 600.0 * min) / 2.0, epsilon = 1e-9);
}

#[test]
fn drag_stops_at_frame_edge() {
    let mut c = cropper();
    c.set_image("flower.jpg", FLOWER, None).unwrap();
    let t = c.drag(-1000.0, 0.0).unwrap();
    assert_relative_eq!(t.left, -13.3333, epsilon = 1e-3);

    // Further drags in the same direction are absorbed
    let again = c.drag(-1000.0, 0.0).unwrap();
    assert_eq!(again.left, t.left);
}

#[test]
fn empty_widget_has_nothing_to_save() {
    let mut c = cropper();
    assert!(c.crop().is_none());
    assert!(matches!(c.drag(-5.0, 0.0), Err(CropError::InvalidState(_))));
    assert!(matches!(c.zoom(1.5, None), Err(CropError::InvalidState(_))));
    c.remove_image();
    assert!(c.crop().is_none());
}

#[test]
fn preview_tracks_every_event() {
    let mut c = cropper();
    c.set_image(
        "flower.jpg",
        FLOWER,
        Some(CropCoordinates {
            scale: 1.0,
            left: -50.0,
            top: 0.0,
        }),
    )
    .unwrap();

    let preview = c.preview().unwrap().clone();
    assert_eq!(preview.transform(), Some(Transform::new(0.25, -12.5, 0.0)));

    for step in 0..10 {
        let t = if step % 2 == 0 {
            c.drag(-7.0 * step as f64, 3.0).unwrap()
        } else {
            c.zoom(1.0 + step as f64 / 10.0, Some(Point::new(100.0, 60.0))).unwrap()
        };
        let p = preview.transform().unwrap();
        assert_eq!(p.scale, t.scale * 0.25);
        assert_eq!(p.left, t.left * 0.25);
        assert_eq!(p.top, t.top * 0.25);
    }
}

#[test]
fn zoom_about_center_keeps_center_fixed() {
    let mut c = cropper();
    c.set_image(
        "flower.jpg",
        FLOWER,
        Some(CropCoordinates {
            scale: 1.0,
            left: -240.0,
            top: -175.0,
        }),
    )
    .unwrap();

    let center = Point::new(160.0, 125.0);
    let before = c.transform().unwrap().image_point_at(center);
    for scale in [1.25, 2.0, 3.5, 1.1] {
        let after = c.zoom(scale, None).unwrap().image_point_at(center);
        assert_relative_eq!(after.x, before.x, epsilon = 1e-9);
        assert_relative_eq!(after.y, before.y, epsilon = 1e-9);
    }
}

#[test]
fn save_and_restore_in_new_session() {
    let mut first = cropper();
    first.set_image("flower.jpg", FLOWER, None).unwrap();
    first.zoom(1.3, Some(Point::new(250.0, 40.0))).unwrap();
    first.drag(35.0, -60.0).unwrap();
    let expected = first.transform().unwrap();
    let saved = first.crop().unwrap();

    // Options as they would arrive from the page: saved descriptor as JSON
    let json = serde_json::to_string(&saved).unwrap();
    let restored: helicropter_core::CropDescriptor = serde_json::from_str(&json).unwrap();

    let second = Cropper::new(CropperConfig {
        initial_image: Some(InitialImage {
            url: restored.url,
            natural_size: FLOWER,
            coordinates: Some(restored.coordinates),
        }),
        ..Default::default()
    })
    .unwrap();

    let t = second.transform().unwrap();
    assert_relative_eq!(t.scale, expected.scale);
    assert_relative_eq!(t.left, expected.left, epsilon = 1e-9);
    assert_relative_eq!(t.top, expected.top, epsilon = 1e-9);
}

#[test]
fn event_stream_order() {
    let mut c = cropper();
    let names = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&names);
    c.subscribe(move |event: &SurfaceEvent| sink.borrow_mut().push(event.name()));

    c.set_image("flower.jpg", FLOWER, None).unwrap();
    c.drag(-1.0, 0.0).unwrap();
    c.zoom(2.0, None).unwrap();
    c.remove_image();
    c.remove_image();

    assert_eq!(
        *names.borrow(),
        vec!["image-loaded", "moving", "scaling", "reset"]
    );
}

#[test]
fn saved_crop_renders_framed_pixels() {
    let mut c = cropper();
    c.set_image(
        "flower.jpg",
        FLOWER,
        Some(CropCoordinates {
            scale: 0.5,
            left: -100.0,
            top: -50.0,
        }),
    )
    .unwrap();
    let saved = c.crop().unwrap();

    let pixels: Vec<u8> = (0..600u32)
        .flat_map(|y| (0..800u32).flat_map(move |x| [(x % 256) as u8, (y % 256) as u8, 0]))
        .collect();
    let img = DecodedImage::new(800, 600, pixels).unwrap();

    let frame = c.surface().viewport();
    let out = render_crop(&img, &saved.coordinates, frame, None, FilterType::Bilinear).unwrap();
    assert_eq!((out.width, out.height), (640, 500));
    assert_eq!(&out.pixels[0..3], &[100, 50, 0]);
}
