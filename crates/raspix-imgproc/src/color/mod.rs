mod hsl;
mod hsv;
mod srgb;
mod xyz;

pub use hsl::{hsl_from_rgb, rgb_from_hsl};
pub use hsv::{hsv_from_rgb, rgb_from_hsv};
pub use srgb::{linear_from_srgb, srgb_from_linear};
pub use xyz::{rgb_from_xyz, xyz_from_rgb};

/// Hue in degrees for a chromatic pixel, in the range [0, 360).
///
/// The dominant channel is picked by exact comparison so ties resolve in
/// R, G, B order. The caller must ensure `chroma > 0`.
pub(crate) fn hue_from_rgb(r: f32, g: f32, b: f32, max: f32, chroma: f32) -> f32 {
    let h = if max == r {
        60.0 * (g - b) / chroma
    } else if max == g {
        120.0 + 60.0 * (b - r) / chroma
    } else {
        240.0 + 60.0 * (r - g) / chroma
    };

    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// RGB contributions of the hue sector, before the lightness offset.
///
/// Sector boundaries are half-open: a hue of exactly 60 degrees falls into
/// the second sector.
pub(crate) fn rgb_from_hue_sector(h: f32, chroma: f32, x: f32) -> (f32, f32, f32) {
    if h < 60.0 {
        (chroma, x, 0.0)
    } else if h < 120.0 {
        (x, chroma, 0.0)
    } else if h < 180.0 {
        (0.0, chroma, x)
    } else if h < 240.0 {
        (0.0, x, chroma)
    } else if h < 300.0 {
        (x, 0.0, chroma)
    } else {
        (chroma, 0.0, x)
    }
}

/// Secondary chroma component for the given hue.
pub(crate) fn hue_secondary(h: f32, chroma: f32) -> f32 {
    (1.0 - ((h / 60.0) % 2.0 - 1.0).abs()) * chroma
}
