use std::io::Cursor;

use base64::Engine as _;

use super::*;

const TEST_DEVICE: DeviceSize = DeviceSize {
    id: "test",
    name: "Test",
    width: 200,
    height: 400,
    category: "test",
};

fn data_uri(width: u32, height: u32, rgba: [u8; 4]) -> String {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buf)
    )
}

fn subject(image: Option<String>) -> Screenshot {
    let mut shot = Screenshot {
        id: "s1".to_string(),
        image_id: "img1".to_string(),
        image_data: image,
        ..Default::default()
    };
    // Center the subject and strip decorations so assertions stay local.
    shot.screenshot.x = 50.0;
    shot.screenshot.y = 50.0;
    shot.screenshot.shadow.enabled = false;
    shot
}

fn render(shot: &Screenshot) -> Painter {
    let mut painter = Painter::new(TEST_DEVICE.width, TEST_DEVICE.height).unwrap();
    let images = ImageCache::new();
    draw_device_layer(&mut painter, &images, shot, &TEST_DEVICE, &|| false).unwrap();
    painter
}

fn px(painter: &Painter, x: u32, y: u32) -> [u8; 4] {
    let idx = ((y * painter.width() + x) as usize) * 4;
    painter.data()[idx..idx + 4].try_into().unwrap()
}

#[test]
fn missing_image_data_skips_the_layer() {
    let painter = render(&subject(None));
    assert!(painter.data().iter().all(|&b| b == 0));
}

#[test]
fn failed_decode_skips_the_layer_silently() {
    let painter = render(&subject(Some("/no/such/shot.png".to_string())));
    assert!(painter.data().iter().all(|&b| b == 0));
}

#[test]
fn abort_after_decode_draws_nothing() {
    let shot = subject(Some(data_uri(8, 8, [255, 0, 0, 255])));
    let mut painter = Painter::new(TEST_DEVICE.width, TEST_DEVICE.height).unwrap();
    let images = ImageCache::new();
    draw_device_layer(&mut painter, &images, &shot, &TEST_DEVICE, &|| true).unwrap();
    assert!(painter.data().iter().all(|&b| b == 0));
}

#[test]
fn framed_subject_draws_phone_chrome_around_the_image() {
    let mut shot = subject(Some(data_uri(50, 100, [255, 0, 0, 255])));
    shot.screenshot.scale = 100.0;

    // phoneWidth = 200 * 0.72 = 144, body spans x 28..172, y 43.8..356.2.
    let painter = render(&shot);

    // Screen shows the cover-fitted uniform image.
    assert_eq!(px(&painter, 100, 200), [255, 0, 0, 255]);
    // Bezel strip between the inset highlight and the screen: frame color.
    assert_eq!(px(&painter, 31, 200), [0x1a, 0x1a, 0x1a, 255]);
    // Outside the body: untouched.
    assert_eq!(px(&painter, 20, 200), [0, 0, 0, 0]);
    // Dynamic island near the top of the screen is black, not image red.
    let island = px(&painter, 100, 54);
    assert_eq!(island[0], 0);
    assert_eq!(island[3], 255);
}

#[test]
fn frameless_subject_stretch_fits_the_image() {
    let mut shot = subject(Some(data_uri(10, 10, [0, 200, 80, 255])));
    shot.screenshot.device_frame.enabled = false;
    shot.screenshot.scale = 500.0;
    shot.screenshot.corner_radius = 0.0;

    // 10px image at 500% = 50x50 centered at (100, 200).
    let painter = render(&shot);
    assert_eq!(px(&painter, 100, 200), [0, 200, 80, 255]);
    assert_eq!(px(&painter, 80, 200), [0, 200, 80, 255]);
    assert_eq!(px(&painter, 70, 200), [0, 0, 0, 0]);
}

#[test]
fn border_is_stroked_when_enabled() {
    let mut shot = subject(Some(data_uri(10, 10, [0, 200, 80, 255])));
    shot.screenshot.device_frame.enabled = false;
    shot.screenshot.scale = 500.0;
    shot.screenshot.corner_radius = 0.0;
    shot.screenshot.border.enabled = true;
    shot.screenshot.border.width = 4.0;
    shot.screenshot.border.color = "#ff0000".to_string();
    shot.screenshot.border.opacity = 100.0;

    // Left edge at x=75; a 4px stroke is centered on it.
    let painter = render(&shot);
    let on_border = px(&painter, 74, 200);
    assert!(on_border[0] > 200, "border pixel was {on_border:?}");
    assert!(on_border[1] < 60);
    // The subject interior keeps the image color.
    assert_eq!(px(&painter, 100, 200), [0, 200, 80, 255]);
}

#[test]
fn shadow_backing_fills_behind_a_transparent_subject() {
    let mut shot = subject(Some(data_uri(10, 10, [0, 0, 0, 0])));
    shot.screenshot.device_frame.enabled = false;
    shot.screenshot.scale = 500.0;
    shot.screenshot.corner_radius = 0.0;

    // Without a shadow there is no backing: the fully transparent image
    // leaves the layer empty.
    assert!(render(&shot).data().iter().all(|&b| b == 0));

    // The shadow caster is an opaque black fill that stays beneath the
    // image, so transparent subject regions render black.
    shot.screenshot.shadow.enabled = true;
    shot.screenshot.shadow.blur = 8.0;
    shot.screenshot.shadow.x = 0.0;
    shot.screenshot.shadow.y = 0.0;
    let painter = render(&shot);
    assert_eq!(px(&painter, 100, 200), [0, 0, 0, 255]);
    assert_eq!(px(&painter, 80, 180), [0, 0, 0, 255]);
}

#[test]
fn disabled_reflection_is_a_true_noop() {
    let base = {
        let mut s = subject(Some(data_uri(10, 10, [40, 90, 240, 255])));
        s.screenshot.scale = 60.0;
        s
    };
    let mut with_fields = base.clone();
    with_fields.screenshot.effects.reflection = crate::model::config::ReflectionConfig {
        enabled: false,
        opacity: 77.0,
        offset: 123.0,
        fade: 91.0,
    };

    assert_eq!(render(&base).data(), render(&with_fields).data());
}

#[test]
fn reflection_fades_out_below_the_subject() {
    let mut shot = subject(Some(data_uri(10, 10, [0, 200, 80, 255])));
    shot.screenshot.device_frame.enabled = false;
    shot.screenshot.scale = 500.0;
    shot.screenshot.corner_radius = 0.0;
    shot.screenshot.y = 40.0;
    shot.screenshot.effects.reflection.enabled = true;
    shot.screenshot.effects.reflection.opacity = 100.0;
    shot.screenshot.effects.reflection.offset = 10.0;
    shot.screenshot.effects.reflection.fade = 50.0;

    // Subject spans y 135..185; the flip line sits at 195, the mirrored copy
    // starts at 205, and the fade floor runs 48px below the flip line.
    let painter = render(&shot);
    let near = px(&painter, 100, 210);
    assert!(near[3] > 0, "mirror should be visible near the flip line");
    assert!(near[1] > near[0], "mirror keeps the subject hue");
    let past = px(&painter, 100, 260);
    assert_eq!(past, [0, 0, 0, 0], "mirror must be gone past the fade");
}

#[test]
fn zero_scale_renders_nothing() {
    let mut framed = subject(Some(data_uri(8, 8, [255, 0, 0, 255])));
    framed.screenshot.scale = 0.0;
    assert!(render(&framed).data().iter().all(|&b| b == 0));

    let mut simple = subject(Some(data_uri(8, 8, [255, 0, 0, 255])));
    simple.screenshot.device_frame.enabled = false;
    simple.screenshot.scale = 0.0;
    assert!(render(&simple).data().iter().all(|&b| b == 0));
}

#[test]
fn isometric_preset_shifts_the_silhouette() {
    let mut front = subject(Some(data_uri(8, 16, [255, 255, 255, 255])));
    front.screenshot.scale = 50.0;
    let mut tilted = front.clone();
    tilted.screenshot.device_frame.preset_id = "iso-left".to_string();

    let a = render(&front);
    let b = render(&tilted);
    assert_ne!(a.data(), b.data());
    // The sheared body vacates the front pose's top-right corner region.
    assert_ne!(px(&a, 130, 130), px(&b, 130, 130));
}
