//! Hue analysis pipeline: sample → histogram → merge → summarize.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bins::merge_buckets;
use crate::error::Result;
use crate::histogram::HueHistogram;
use crate::sampler::{DEFAULT_QUALITY, PixelFilter, PixelSampler};
use crate::summary::{BinSummary, summarize};

/// Palette size handed to the RGB quantizer when nothing else is configured.
pub const DEFAULT_COUNT: usize = 5;

/// Tuning knobs shared by the hue analysis and the RGB palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    /// Number of RGB palette colours. Not used by the hue analysis.
    pub count: usize,
    /// Visit every `quality`-th pixel. Must be positive.
    pub quality: i64,
    /// Build the histogram over this many parallel shards; `1` is a plain
    /// single pass.
    pub shards: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            count: DEFAULT_COUNT,
            quality: DEFAULT_QUALITY,
            shards: 1,
        }
    }
}

/// Dominant hue bins of an image, most chromatic first.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HueAnalysis {
    pub bins: Vec<BinSummary>,
    pub is_dark_compatible: bool,
}

/// Analyse RGBA `pixels` with the given options.
pub fn analyze<F>(pixels: &[u8], options: &AnalysisOptions, filter: &F) -> Result<HueAnalysis>
where
    F: PixelFilter + Sync + ?Sized,
{
    let sampler = PixelSampler::new(pixels, options.quality)?;
    let histogram = HueHistogram::build_sharded(&sampler, filter, options.shards)?;
    Ok(finish(&histogram))
}

/// Single-threaded analysis at `quality`; accepts filters that are not `Sync`.
pub fn analyze_hues<F>(pixels: &[u8], quality: i64, filter: &F) -> Result<HueAnalysis>
where
    F: PixelFilter + ?Sized,
{
    let sampler = PixelSampler::new(pixels, quality)?;
    let histogram = HueHistogram::build(&sampler, filter)?;
    Ok(finish(&histogram))
}

fn finish(histogram: &HueHistogram) -> HueAnalysis {
    let is_dark_compatible = histogram.is_dark_compatible();
    debug!(
        "lightness: average {:.3}, bright fraction {:.3}, dark compatible {}",
        histogram.lightness.average(),
        histogram.lightness.bright_fraction(),
        is_dark_compatible
    );
    let bins = summarize(merge_buckets(histogram));
    HueAnalysis { bins, is_dark_compatible }
}
