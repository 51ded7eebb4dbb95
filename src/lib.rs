//! Dominant hues of a bitmap, for picking UI accent colours.
//!
//! Pixels are sampled at a fixed stride, converted to HSL, and binned into
//! 3° hue buckets weighted by chroma. Adjacent buckets are merged into
//! contiguous hue bins, and each bin is described by three colours: its
//! peak and its two ends. An RGB palette from k-means clustering is
//! attached alongside.
//!
//! ```no_run
//! use bitmap_hues::{AnalysisOptions, MinAlpha, palette_from_file};
//!
//! let report = palette_from_file("photo.png", &AnalysisOptions::default(), &MinAlpha::default())?;
//! for bin in &report.hues.bins {
//!     println!("{} ({}..{})", bin.peak.hex, bin.left.hex, bin.right.hex);
//! }
//! # Ok::<(), bitmap_hues::AnalysisError>(())
//! ```

use js_sys::{Array, Object, Reflect};
use log::info;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod analyzer;
pub mod bins;
pub mod color;
pub mod decode;
pub mod error;
pub mod histogram;
pub mod quantize;
pub mod sampler;
pub mod summary;

pub use analyzer::{AnalysisOptions, DEFAULT_COUNT, HueAnalysis, analyze, analyze_hues};
pub use bins::{HueBin, merge_buckets};
pub use color::{Hslc, hsl_to_hex, hsl_to_rgb, rgb_to_hslc};
pub use decode::{DecodedImage, decode_rgba, open_rgba};
pub use error::{AnalysisError, Result};
pub use histogram::{BUCKET_SIZE, HueHistogram, HueTotals};
pub use quantize::quantize_palette;
pub use sampler::{DEFAULT_MIN_ALPHA, DEFAULT_QUALITY, MinAlpha, PixelFilter, PixelSampler};
pub use summary::{BinSummary, ColorPoint};

/// Everything known about one image: where it came from, its hue bins and
/// its RGB palette.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaletteReport {
    pub path: String,
    pub hues: HueAnalysis,
    pub palette: Vec<String>,
}

/// Run both analyses over already decoded RGBA pixels.
pub fn palette_from_pixels<F>(
    path: impl Into<String>,
    pixels: &[u8],
    options: &AnalysisOptions,
    filter: &F,
) -> Result<PaletteReport>
where
    F: PixelFilter + Sync + ?Sized,
{
    let hues = analyze(pixels, options, filter)?;
    let palette = quantize_palette(pixels, options.count, options.quality, filter)?;
    Ok(PaletteReport { path: path.into(), hues, palette })
}

/// Decode `input` and analyse it. `path` is only carried into the report.
pub fn palette_from_bytes<F>(
    path: impl Into<String>,
    input: &[u8],
    options: &AnalysisOptions,
    filter: &F,
) -> Result<PaletteReport>
where
    F: PixelFilter + Sync + ?Sized,
{
    palette_from_decoded(path.into(), &decode_rgba(input)?, options, filter)
}

fn palette_from_decoded<F>(
    path: String,
    decoded: &DecodedImage,
    options: &AnalysisOptions,
    filter: &F,
) -> Result<PaletteReport>
where
    F: PixelFilter + Sync + ?Sized,
{
    info!("analysing {path} ({}x{})", decoded.width, decoded.height);
    palette_from_pixels(path, &decoded.data, options, filter)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn palette_from_file<F>(
    path: impl AsRef<std::path::Path>,
    options: &AnalysisOptions,
    filter: &F,
) -> Result<PaletteReport>
where
    F: PixelFilter + Sync + ?Sized,
{
    let path = path.as_ref();
    let decoded = open_rgba(path)?;
    palette_from_decoded(path.display().to_string(), &decoded, options, filter)
}

// ------------------------------------------------------------
// JavaScript bindings
// ------------------------------------------------------------

/// Route `log` output to the browser console.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() -> std::result::Result<(), JsValue> {
    console_log::init_with_level(log::Level::Debug)
        .map_err(|e| JsValue::from_str(&format!("Unable to initialise logging: {e}")))
}

/// Options for the JS export; anything left out takes the library default.
fn js_options(count: Option<u32>, quality: Option<i32>, min_alpha: Option<u8>) -> (AnalysisOptions, MinAlpha) {
    let options = AnalysisOptions {
        count: count.map_or(DEFAULT_COUNT, |c| c as usize),
        quality: quality.map_or(DEFAULT_QUALITY, i64::from),
        ..AnalysisOptions::default()
    };
    (options, min_alpha.map_or_else(MinAlpha::default, MinAlpha))
}

/// Analyse an encoded image (PNG, JPEG, ...).
///
/// Returns `{ path, hues: { bins, isDarkCompatible }, palette }`. Pixels
/// with alpha below `min_alpha` (127 when omitted) are ignored by the hue
/// bins and the palette.
#[wasm_bindgen(js_name = paletteFromBitmap)]
pub fn palette_from_bitmap(
    input: Vec<u8>,
    path: Option<String>,
    count: Option<u32>,
    quality: Option<i32>,
    min_alpha: Option<u8>,
) -> std::result::Result<Object, JsValue> {
    let (options, filter) = js_options(count, quality, min_alpha);
    let report = palette_from_bytes(path.unwrap_or_default(), &input, &options, &filter)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let bins = Array::new();
    for bin in &report.hues.bins {
        bins.push(&bin_to_js(bin)?);
    }
    let hues = Object::new();
    Reflect::set(&hues, &JsValue::from_str("bins"), &bins)?;
    Reflect::set(
        &hues,
        &JsValue::from_str("isDarkCompatible"),
        &JsValue::from_bool(report.hues.is_dark_compatible),
    )?;

    let palette = Array::new();
    for hex in &report.palette {
        palette.push(&JsValue::from_str(hex));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("path"), &JsValue::from_str(&report.path))?;
    Reflect::set(&result, &JsValue::from_str("hues"), &hues)?;
    Reflect::set(&result, &JsValue::from_str("palette"), &palette)?;
    Ok(result)
}

fn set_number(obj: &Object, key: &str, value: f64) -> std::result::Result<(), JsValue> {
    Reflect::set(obj, &JsValue::from_str(key), &JsValue::from_f64(value))?;
    Ok(())
}

fn totals_to_js(totals: &HueTotals) -> std::result::Result<JsValue, JsValue> {
    let obj = Object::new();
    set_number(&obj, "px", totals.px as f64)?;
    set_number(&obj, "c", totals.c)?;
    set_number(&obj, "s", totals.s)?;
    set_number(&obj, "l", totals.l)?;
    Ok(obj.into())
}

fn point_to_js(point: &ColorPoint) -> std::result::Result<JsValue, JsValue> {
    let obj = Object::new();
    set_number(&obj, "h", point.h as f64)?;
    set_number(&obj, "s", point.s as f64)?;
    set_number(&obj, "l", point.l as f64)?;
    Reflect::set(&obj, &JsValue::from_str("hex"), &JsValue::from_str(&point.hex))?;
    Ok(obj.into())
}

fn bin_to_js(summary: &BinSummary) -> std::result::Result<JsValue, JsValue> {
    let bin = &summary.bin;
    let obj = Object::new();
    set_number(&obj, "peakHue", bin.peak_hue as f64)?;
    set_number(&obj, "firstHue", bin.first_hue as f64)?;
    set_number(&obj, "lastHue", bin.last_hue as f64)?;
    Reflect::set(&obj, &JsValue::from_str("allHueTotals"), &totals_to_js(&bin.all_hue_totals)?)?;
    Reflect::set(&obj, &JsValue::from_str("peakTotals"), &totals_to_js(&bin.peak_totals)?)?;
    Reflect::set(&obj, &JsValue::from_str("peak"), &point_to_js(&summary.peak)?)?;
    Reflect::set(&obj, &JsValue::from_str("left"), &point_to_js(&summary.left)?)?;
    Reflect::set(&obj, &JsValue::from_str("right"), &point_to_js(&summary.right)?)?;
    Ok(obj.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_options_fall_back_to_defaults() {
        let (options, filter) = js_options(None, None, None);
        assert_eq!(options, AnalysisOptions::default());
        assert_eq!(filter, MinAlpha(DEFAULT_MIN_ALPHA));
    }

    #[test]
    fn js_options_carry_min_alpha_and_quality() {
        let (options, filter) = js_options(Some(3), Some(-2), Some(0));
        assert_eq!(options.count, 3);
        assert_eq!(options.quality, -2);
        assert_eq!(filter, MinAlpha(0));

        let pixels = [255, 0, 0, 0, 0, 0, 255, 10];
        let quality_one = AnalysisOptions { quality: 1, ..options };
        let report = palette_from_pixels("clear", &pixels, &quality_one, &filter).unwrap();
        assert_eq!(report.hues.bins.len(), 2);
        assert!(matches!(
            palette_from_pixels("clear", &pixels, &options, &filter),
            Err(AnalysisError::InvalidQuality(-2))
        ));
    }
}
