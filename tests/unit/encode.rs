use std::io::Read as _;

use super::*;
use crate::model::config::BackgroundKind;

fn solid_screenshot(color: &str) -> Screenshot {
    let mut shot = Screenshot {
        id: "s1".to_string(),
        ..Default::default()
    };
    shot.background.kind = BackgroundKind::Solid;
    shot.background.solid = color.to_string();
    shot.text.headline_enabled = false;
    shot
}

#[test]
fn export_image_produces_a_device_sized_png() {
    let mut renderer = Renderer::new();
    let mut surface = RenderSurface::new(1, 1).unwrap();
    let png = export_image(
        &mut renderer,
        &mut surface,
        &solid_screenshot("#336699"),
        "iphone-6.3-1179",
    )
    .unwrap();

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (1179, 2556));
    assert_eq!(decoded.get_pixel(10, 10).0, [0x33, 0x66, 0x99, 255]);
}

#[test]
fn zip_entries_are_named_one_based() {
    let screenshots = vec![solid_screenshot("#111111"), solid_screenshot("#222222")];
    let mut renderer = Renderer::new();
    let bytes = export_all_as_zip(&mut renderer, &screenshots, "iphone-6.3-1179").unwrap();

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);
    assert!(archive.by_name("screenshot-1.png").is_ok());

    let mut entry = archive.by_name("screenshot-2.png").unwrap();
    let mut png = Vec::new();
    entry.read_to_end(&mut png).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(5, 5).0, [0x22, 0x22, 0x22, 255]);
}

#[test]
fn empty_batch_yields_an_empty_archive() {
    let mut renderer = Renderer::new();
    let bytes = export_all_as_zip(&mut renderer, &[], "iphone-6.3-1179").unwrap();
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 0);
}

#[test]
fn unpremultiply_inverts_premultiply_within_rounding() {
    for &(color, alpha) in &[(200u8, 128u8), (255, 1), (17, 255), (0, 0)] {
        let premul = ((u16::from(color) * u16::from(alpha) + 127) / 255) as u8;
        let mut px = [premul, premul, premul, alpha];
        unpremultiply_rgba8_in_place(&mut px);
        if alpha > 0 {
            let err = i16::from(px[0]).abs_diff(i16::from(color));
            assert!(err <= 2, "color {color} alpha {alpha} round-tripped to {}", px[0]);
        }
    }
}
