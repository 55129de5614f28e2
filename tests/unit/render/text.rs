use super::*;

/// Deterministic stand-in for glyph measurement: 10px per character.
fn char_measure(s: &str) -> f64 {
    s.chars().count() as f64 * 10.0
}

#[test]
fn wrap_keeps_lines_within_the_budget() {
    let lines = wrap_words("the quick brown fox jumps over it", 100.0, char_measure);
    for line in &lines {
        let words = line.split(' ').count();
        assert!(
            char_measure(line) <= 100.0 || words == 1,
            "overlong multi-word line: {line:?}"
        );
    }
}

#[test]
fn wrap_preserves_word_order_without_splitting() {
    let text = "one two three four five six";
    let lines = wrap_words(text, 90.0, char_measure);
    assert_eq!(lines.join(" "), text);
}

#[test]
fn overlong_single_word_gets_its_own_line() {
    let lines = wrap_words("hi incomprehensibilities yo", 100.0, char_measure);
    assert!(lines.contains(&"incomprehensibilities".to_string()));
    for line in &lines {
        assert!(!line.contains(' ') || char_measure(line) <= 100.0);
    }
}

#[test]
fn wrap_of_empty_text_yields_no_lines() {
    assert!(wrap_words("", 100.0, char_measure).is_empty());
}

#[test]
fn everything_fits_on_one_line_when_it_measures_small() {
    let lines = wrap_words("a b c", 1000.0, char_measure);
    assert_eq!(lines, vec!["a b c".to_string()]);
}

#[test]
fn font_stacks_resolve_like_the_editor() {
    assert_eq!(resolve_font_stack("system"), "system-ui, sans-serif");
    assert_eq!(resolve_font_stack("Inter"), "Inter, sans-serif");
    assert_eq!(resolve_font_stack("DM Sans"), "DM Sans, sans-serif");
    assert_eq!(
        resolve_font_stack("Comic Sans MS"),
        "\"Comic Sans MS\", sans-serif"
    );
}

#[test]
fn weights_parse_with_a_regular_fallback() {
    assert_eq!(parse_weight("700"), 700.0);
    assert_eq!(parse_weight(" 300 "), 300.0);
    assert_eq!(parse_weight("bold"), 400.0);
    assert_eq!(parse_weight(""), 400.0);
}

#[test]
fn disabled_or_empty_headline_skips_the_text_layer() {
    let device = crate::model::catalog::device_size_by_id("iphone-6.3-1179");
    let mut renderer = TextRenderer::new();

    let mut painter = Painter::new(64, 64).unwrap();
    let mut text = TextConfig {
        headline_enabled: false,
        ..Default::default()
    };
    renderer.draw(&mut painter, &text, device).unwrap();
    assert!(painter.data().iter().all(|&b| b == 0));

    text.headline_enabled = true;
    text.headline = String::new();
    renderer.draw(&mut painter, &text, device).unwrap();
    assert!(painter.data().iter().all(|&b| b == 0));
}

#[test]
fn draw_smoke_test_never_panics_without_fonts() {
    // Glyph output depends on host font availability; the call itself must
    // succeed either way.
    let device = crate::model::catalog::device_size_by_id("iphone-6.3-1179");
    let mut painter = Painter::new(device.width, device.height).unwrap();
    let mut renderer = TextRenderer::new();
    renderer.draw(&mut painter, &TextConfig::default(), device).unwrap();
}
