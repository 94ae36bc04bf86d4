use std::str::FromStr;

use eframe::egui::Color32;
use palette::Srgb;

// ---------------------------------------------------------------------------
// Highlight colours
// ---------------------------------------------------------------------------

/// Pale green background for matching rows.
pub const DEFAULT_HIGHLIGHT: Color32 = Color32::from_rgb(0xd1, 0xe7, 0xdd);

/// Parse a `#rrggbb` (or `rrggbb`) hex colour, falling back to
/// [`DEFAULT_HIGHLIGHT`] when it cannot be read.
pub fn parse_highlight(hex: &str) -> Color32 {
    match Srgb::<u8>::from_str(hex.trim()) {
        Ok(rgb) => Color32::from_rgb(rgb.red, rgb.green, rgb.blue),
        Err(e) => {
            log::warn!("Invalid highlight colour {hex:?} ({e}), using default");
            DEFAULT_HIGHLIGHT
        }
    }
}

/// Text colour that stays readable on top of `background`.
pub fn text_on(background: Color32) -> Color32 {
    let rgb: Srgb<f32> = Srgb::new(background.r(), background.g(), background.b()).into_format();
    let luma = 0.2126 * rgb.red + 0.7152 * rgb.green + 0.0722 * rgb.blue;
    if luma > 0.5 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_or_without_hash() {
        assert_eq!(parse_highlight("#d1e7dd"), DEFAULT_HIGHLIGHT);
        assert_eq!(parse_highlight("ff0000"), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn bad_hex_falls_back() {
        assert_eq!(parse_highlight("green"), DEFAULT_HIGHLIGHT);
    }

    #[test]
    fn picks_contrasting_text() {
        assert_eq!(text_on(DEFAULT_HIGHLIGHT), Color32::BLACK);
        assert_eq!(text_on(Color32::from_rgb(20, 20, 60)), Color32::WHITE);
    }
}
