use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Fill colour of histogram bars.
pub const HISTOGRAM_FILL: &str = "skyblue";
/// Fill colour of the raster statistics bars.
pub const STATISTICS_FILL: &str = "lightcoral";

/// Generates `n` visually distinct colours using evenly spaced hues,
/// as `#rrggbb` strings for chart markers.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}
