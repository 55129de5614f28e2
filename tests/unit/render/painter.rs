use kurbo::Affine;

use super::*;
use crate::render::geometry::rounded_rect_path;

fn px(painter: &Painter, x: u32, y: u32) -> [u8; 4] {
    let idx = ((y * painter.width() + x) as usize) * 4;
    painter.data()[idx..idx + 4].try_into().unwrap()
}

#[test]
fn scene_fill_rect_writes_opaque_pixels() {
    let mut painter = Painter::new(4, 4).unwrap();
    painter
        .scene(|s| {
            s.fill_rect(
                Rect::new(0.0, 0.0, 4.0, 4.0),
                Affine::IDENTITY,
                Rgba8::new(255, 0, 0, 255),
            );
            Ok(())
        })
        .unwrap();
    assert_eq!(px(&painter, 0, 0), [255, 0, 0, 255]);
    assert_eq!(px(&painter, 3, 3), [255, 0, 0, 255]);
}

#[test]
fn overlay_from_applies_global_alpha() {
    let mut src = Painter::new(2, 2).unwrap();
    src.scene(|s| {
        s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Affine::IDENTITY, Rgba8::WHITE);
        Ok(())
    })
    .unwrap();

    let mut dst = Painter::new(2, 2).unwrap();
    dst.overlay_from(&src, 0.5).unwrap();

    let p = px(&dst, 0, 0);
    assert!(p[3] >= 126 && p[3] <= 129, "alpha was {}", p[3]);
    assert_eq!(p[0], p[3]); // premultiplied white

    let mut mismatched = Painter::new(3, 2).unwrap();
    assert!(mismatched.overlay_from(&src, 1.0).is_err());
}

#[test]
fn retain_alpha_zeroes_masked_pixels() {
    let mut painter = Painter::new(4, 1).unwrap();
    painter
        .scene(|s| {
            s.fill_rect(Rect::new(0.0, 0.0, 4.0, 1.0), Affine::IDENTITY, Rgba8::WHITE);
            Ok(())
        })
        .unwrap();

    painter.retain_alpha(|x, _| if x < 2 { 255 } else { 0 });

    assert_eq!(px(&painter, 0, 0), [255, 255, 255, 255]);
    assert_eq!(px(&painter, 1, 0), [255, 255, 255, 255]);
    assert_eq!(px(&painter, 2, 0), [0, 0, 0, 0]);
    assert_eq!(px(&painter, 3, 0), [0, 0, 0, 0]);
}

#[test]
fn shadow_pass_with_zero_blur_is_an_offset_silhouette() {
    let mut painter = Painter::new(8, 8).unwrap();
    let path = rounded_rect_path(0.0, 0.0, 2.0, 2.0, 0.0);
    painter
        .shadow_pass(&path, Affine::IDENTITY, Rgba8::BLACK, 0.0, (2.0, 2.0))
        .unwrap();

    assert_eq!(px(&painter, 3, 3), [0, 0, 0, 255]);
    assert_eq!(px(&painter, 0, 0), [0, 0, 0, 0]);
    assert_eq!(px(&painter, 6, 6), [0, 0, 0, 0]);
}

#[test]
fn shadow_pass_blur_softens_the_silhouette() {
    let mut painter = Painter::new(16, 16).unwrap();
    let path = rounded_rect_path(6.0, 6.0, 4.0, 4.0, 0.0);
    painter
        .shadow_pass(&path, Affine::IDENTITY, Rgba8::BLACK, 4.0, (0.0, 0.0))
        .unwrap();

    let center = px(&painter, 8, 8);
    let fringe = px(&painter, 11, 8); // just outside the unblurred shape
    assert!(center[3] > 0);
    assert!(fringe[3] > 0, "blur should bleed past the shape edge");
    assert!(fringe[3] < center[3]);
}

#[test]
fn transparent_color_makes_shadow_pass_a_noop() {
    let mut painter = Painter::new(4, 4).unwrap();
    let path = rounded_rect_path(0.0, 0.0, 4.0, 4.0, 0.0);
    painter
        .shadow_pass(&path, Affine::IDENTITY, Rgba8::TRANSPARENT, 3.0, (0.0, 0.0))
        .unwrap();
    assert!(painter.data().iter().all(|&b| b == 0));
}

#[test]
fn gaussian_kernel_is_normalized_and_symmetric() {
    let kernel = gaussian_kernel_q16(5, 2.5).unwrap();
    assert_eq!(kernel.len(), 11);
    assert_eq!(kernel.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);
    for i in 0..kernel.len() / 2 {
        assert_eq!(kernel[i], kernel[kernel.len() - 1 - i]);
    }
}

#[test]
fn premul_over_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(premul_over_in_place(&mut dst, &[0u8; 12]).is_err());
    assert!(premul_over_in_place(&mut dst, &[0u8; 8]).is_ok());
}

#[test]
fn resize_clears_to_transparent() {
    let mut painter = Painter::new(2, 2).unwrap();
    painter
        .scene(|s| {
            s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Affine::IDENTITY, Rgba8::WHITE);
            Ok(())
        })
        .unwrap();

    painter.resize(2, 2).unwrap();
    assert!(painter.data().iter().all(|&b| b == 0));

    painter.resize(3, 5).unwrap();
    assert_eq!((painter.width(), painter.height()), (3, 5));
    assert!(painter.data().iter().all(|&b| b == 0));

    assert!(Painter::new(0, 4).is_err());
}
