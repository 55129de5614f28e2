use super::*;

#[test]
fn defaults_match_editor_presets() {
    let config = ScreenshotConfig::default();
    assert_eq!(config.scale, 82.0);
    assert_eq!(config.x, 50.0);
    assert_eq!(config.y, 55.0);
    assert_eq!(config.corner_radius, 24.0);
    assert!(config.shadow.enabled);
    assert_eq!(config.shadow.blur, 60.0);
    assert_eq!(config.shadow.y, 30.0);
    assert!(!config.border.enabled);
    assert!(config.device_frame.enabled);
    assert_eq!(config.device_frame.preset_id, "front");
    assert_eq!(config.device_frame.frame_color, "#1a1a1a");

    let bg = BackgroundConfig::default();
    assert_eq!(bg.kind, BackgroundKind::Gradient);
    assert_eq!(bg.gradient.angle, 135.0);
    assert_eq!(bg.gradient.stops[0].color, "#667eea");
    assert_eq!(bg.gradient.stops[1].position, 100.0);
    assert!(!bg.noise);
    assert_eq!(bg.noise_intensity, 15);

    let effects = EffectsConfig::default();
    assert!(!effects.glow.enabled);
    assert_eq!(effects.glow.color, "#3b82f6");
    assert!(!effects.reflection.enabled);
    assert_eq!(effects.reflection.opacity, 30.0);
    assert_eq!(effects.reflection.fade, 50.0);
    assert_eq!(effects.perspective.rotate_x, 0.0);

    let text = TextConfig::default();
    assert_eq!(text.headline, "Your Amazing App");
    assert_eq!(text.headline_position, TextPosition::Top);
    assert_eq!(text.line_height, 120.0);
    assert_eq!(text.subheadline_opacity, 70.0);
}

#[test]
fn wire_field_names_stay_camel_case() {
    let json = serde_json::to_string(&Screenshot::default()).unwrap();
    assert!(json.contains("\"deviceFrame\""));
    assert!(json.contains("\"cornerRadius\""));
    assert!(json.contains("\"noiseIntensity\""));
    assert!(json.contains("\"headlineOffsetY\""));
    assert!(json.contains("\"frameColor\""));
    assert!(json.contains("\"type\":\"gradient\""));
}

#[test]
fn image_data_deserializes_but_never_serializes() {
    let mut shot = Screenshot {
        image_data: Some("data:image/png;base64,AAAA".to_string()),
        ..Default::default()
    };
    shot.id = "s1".to_string();

    let json = serde_json::to_string(&shot).unwrap();
    assert!(!json.contains("imageData"));

    let hydrated: Screenshot =
        serde_json::from_str(r#"{"id":"s1","imageData":"shot.png"}"#).unwrap();
    assert_eq!(hydrated.image_data.as_deref(), Some("shot.png"));
}

#[test]
fn missing_fields_resolve_to_defaults() {
    let config: ScreenshotConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, ScreenshotConfig::default());

    let partial: ScreenshotConfig = serde_json::from_str(r#"{"scale":50}"#).unwrap();
    assert_eq!(partial.scale, 50.0);
    assert_eq!(partial.y, 55.0);
    assert!(partial.device_frame.enabled);
}

#[test]
fn image_background_kind_parses() {
    let bg: BackgroundConfig = serde_json::from_str(r#"{"type":"image"}"#).unwrap();
    assert_eq!(bg.kind, BackgroundKind::Image);
}

#[test]
fn template_apply_preserves_identity_and_image() {
    let template = Template {
        id: "t1".to_string(),
        name: "Bold".to_string(),
        background: BackgroundConfig {
            solid: "#123456".to_string(),
            kind: BackgroundKind::Solid,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut shot = Screenshot {
        id: "s1".to_string(),
        image_id: "img1".to_string(),
        image_data: Some("shot.png".to_string()),
        ..Default::default()
    };

    template.apply_to(&mut shot);

    assert_eq!(shot.id, "s1");
    assert_eq!(shot.image_id, "img1");
    assert_eq!(shot.image_data.as_deref(), Some("shot.png"));
    assert_eq!(shot.background.solid, "#123456");
}
