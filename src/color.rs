use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Segment;

// ---------------------------------------------------------------------------
// Segment colours
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Traffic-light colour for a tier: green, amber, red.
pub fn segment_color(segment: Segment) -> Color32 {
    match segment {
        Segment::High => hsl_to_color32(130.0, 0.55, 0.45),
        Segment::Mid => hsl_to_color32(45.0, 0.90, 0.55),
        Segment::Low => hsl_to_color32(0.0, 0.70, 0.55),
    }
}

/// Accent used for the yearly trend line.
pub fn trend_color() -> Color32 {
    hsl_to_color32(210.0, 0.75, 0.55)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_colors_distinct() {
        let colors: Vec<Color32> = Segment::ALL.iter().map(|&s| segment_color(s)).collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn test_high_is_green() {
        let c = segment_color(Segment::High);
        assert!(c.g() > c.r() && c.g() > c.b());
        let low = segment_color(Segment::Low);
        assert!(low.r() > low.g());
    }
}
