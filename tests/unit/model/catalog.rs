use super::*;

#[test]
fn unknown_ids_fall_back_to_first_entry() {
    assert_eq!(device_size_by_id("nope").id, DEVICE_SIZES[0].id);
    assert_eq!(isometric_preset_by_id("nope").id, "front");
    assert_eq!(device_size_by_id("iphone-6.3-1179").width, 1179);
    assert_eq!(isometric_preset_by_id("iso-left").edge_thickness, 0.065);
}

#[test]
fn catalogs_have_expected_shape() {
    assert_eq!(DEVICE_SIZES.len(), 5);
    assert_eq!(ISOMETRIC_PRESETS.len(), 12);
    assert_eq!(DEVICE_SIZES[0].id, "iphone-6.9");
    assert_eq!((DEVICE_SIZES[0].width, DEVICE_SIZES[0].height), (1320, 2868));
}

#[test]
fn catalog_ids_are_unique() {
    let mut device_ids: Vec<_> = DEVICE_SIZES.iter().map(|d| d.id).collect();
    device_ids.sort_unstable();
    device_ids.dedup();
    assert_eq!(device_ids.len(), DEVICE_SIZES.len());

    let mut preset_ids: Vec<_> = ISOMETRIC_PRESETS.iter().map(|p| p.id).collect();
    preset_ids.sort_unstable();
    preset_ids.dedup();
    assert_eq!(preset_ids.len(), ISOMETRIC_PRESETS.len());
}

#[test]
fn front_preset_is_identity_with_no_edge() {
    let front = isometric_preset_by_id("front");
    assert_eq!(
        front.transform,
        FrameTransform {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0
        }
    );
    assert_eq!(front.edge_direction, EdgeDirection::None);
    assert_eq!(front.edge_thickness, 0.0);
}

#[test]
fn tilted_presets_expose_the_opposite_edge() {
    for preset in ISOMETRIC_PRESETS {
        if preset.id.ends_with("-left") {
            assert_eq!(preset.edge_direction, EdgeDirection::Right, "{}", preset.id);
            assert!(preset.edge_thickness > 0.0, "{}", preset.id);
        } else if preset.id.ends_with("-right") {
            assert_eq!(preset.edge_direction, EdgeDirection::Left, "{}", preset.id);
            assert!(preset.edge_thickness > 0.0, "{}", preset.id);
        } else {
            assert_eq!(preset.edge_direction, EdgeDirection::None, "{}", preset.id);
        }
    }
}
