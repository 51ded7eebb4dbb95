//! RGB ⇄ HSL conversions.
//!
//! Hue, saturation and lightness come out of [`rgb_to_hslc`] normalised to
//! `[0, 1]`, together with the chroma `max - min` of the normalised channels.
//! [`hsl_to_hex`] takes the CSS convention instead: hue in degrees and
//! saturation/lightness in percent.

/// Hue, saturation, lightness and chroma of one pixel, all in `[0, 1]`
/// (hue in `[0, 1)`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hslc {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub c: f64,
}

/// Convert 8-bit RGB channels to [`Hslc`].
///
/// Achromatic input (`r == g == b`) yields `h = s = 0`.
pub fn rgb_to_hslc(r: u8, g: u8, b: u8) -> Hslc {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let c = max - min;

    if max == min {
        return Hslc { h: 0.0, s: 0.0, l, c };
    }

    let d = c;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hslc { h: h / 6.0, s, l, c }
}

/// Evaluate one RGB channel from the HSL helper values `p`, `q` at hue
/// offset `t`. `t` is wrapped into `[0, 1]` first.
fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Shared core of the two HSL → RGB conversions: inputs in `[0, 1]`,
/// channels out in `[0, 1]`.
fn hsl_to_unit_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    if s == 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

/// Convert HSL in `[0, 1]` to RGB scaled to `[0, 255]`.
///
/// The channels are left unrounded.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    hsl_to_unit_rgb(h, s, l).map(|x| x * 255.0)
}

/// Convert a hue in degrees and saturation/lightness in percent into a
/// lowercase `#rrggbb` string.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let [r, g, b] = hsl_to_unit_rgb(h / 360.0, s / 100.0, l / 100.0).map(to_byte);
    format!("#{r:02x}{g:02x}{b:02x}")
}

#[inline(always)]
fn to_byte(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}
