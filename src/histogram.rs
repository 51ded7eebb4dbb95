//! Chroma-weighted hue histogram over the sampled pixels.
//!
//! Two statistics come out of one pass:
//!
//! * lightness over *every* sampled pixel, filter or not, which drives the
//!   dark-compatibility flag;
//! * per-bucket totals over pixels that pass the filter and carry enough
//!   colour to have a meaningful hue.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Range};

use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::color::rgb_to_hslc;
use crate::error::{AnalysisError, Result};
use crate::sampler::{PixelFilter, PixelSampler};

/// Width of one hue bucket, in degrees.
pub const BUCKET_SIZE: u16 = 3;

// Pixels below/above these are too grey, too dark or too bright to have a hue.
const MIN_SATURATION: f64 = 0.2;
const MIN_LIGHTNESS: f64 = 0.1;
const MAX_LIGHTNESS: f64 = 0.9;

const BRIGHT_LIGHTNESS: f64 = 0.75;
const DARK_COMPATIBLE_LIMIT: f64 = 0.8;

/// Discrete bucket key for a hue in `[0, 1)`: a multiple of
/// [`BUCKET_SIZE`] in `0..360`.
#[inline(always)]
pub fn hue_bucket(h: f64) -> u16 {
    let slot = ((360 / BUCKET_SIZE) as f64 * h).floor() as u16;
    BUCKET_SIZE * slot
}

/// Running sums for a set of pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct HueTotals {
    pub px: u32,
    pub c: f64,
    pub s: f64,
    pub l: f64,
}

impl Add for HueTotals {
    type Output = HueTotals;

    fn add(self, rhs: HueTotals) -> HueTotals {
        HueTotals {
            px: self.px + rhs.px,
            c: self.c + rhs.c,
            s: self.s + rhs.s,
            l: self.l + rhs.l,
        }
    }
}

impl AddAssign for HueTotals {
    fn add_assign(&mut self, rhs: HueTotals) {
        *self = *self + rhs;
    }
}

/// Lightness profile of the whole sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightnessStats {
    pub sum: f64,
    pub bright: u32,
    pub sampled: u32,
}

impl LightnessStats {
    fn record(&mut self, l: f64) {
        self.sum += l;
        self.sampled += 1;
        if l > BRIGHT_LIGHTNESS {
            self.bright += 1;
        }
    }

    pub fn average(&self) -> f64 {
        self.sum / self.sampled as f64
    }

    pub fn bright_fraction(&self) -> f64 {
        self.bright as f64 / self.sampled as f64
    }

    /// Light UI elements will read well on top of this image.
    pub fn is_dark_compatible(&self) -> bool {
        self.average() < DARK_COMPATIBLE_LIMIT && self.bright_fraction() < DARK_COMPATIBLE_LIMIT
    }
}

impl Add for LightnessStats {
    type Output = LightnessStats;

    fn add(self, rhs: LightnessStats) -> LightnessStats {
        LightnessStats {
            sum: self.sum + rhs.sum,
            bright: self.bright + rhs.bright,
            sampled: self.sampled + rhs.sampled,
        }
    }
}

/// Bucket totals keyed by hue, plus the grand totals needed downstream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HueHistogram {
    pub buckets: BTreeMap<u16, HueTotals>,
    pub total_hued_pixels: u32,
    pub total_hued_chroma: f64,
    pub lightness: LightnessStats,
}

impl HueHistogram {
    /// Single pass over every sampled pixel.
    pub fn build<F>(sampler: &PixelSampler<'_>, filter: &F) -> Result<Self>
    where
        F: PixelFilter + ?Sized,
    {
        let histogram = Self::build_range(sampler, filter, 0..sampler.pixels().len());
        histogram.ensure_sampled()?;
        debug!(
            "hue histogram: {} sampled, {} hued pixels in {} buckets",
            histogram.lightness.sampled,
            histogram.total_hued_pixels,
            histogram.buckets.len()
        );
        Ok(histogram)
    }

    /// Same result as [`build`](Self::build), computed over `shards`
    /// stride-aligned slices of the sample range in parallel and merged.
    pub fn build_sharded<F>(sampler: &PixelSampler<'_>, filter: &F, shards: usize) -> Result<Self>
    where
        F: PixelFilter + Sync + ?Sized,
    {
        if shards <= 1 {
            return Self::build(sampler, filter);
        }
        let per_shard = sampler.len().div_ceil(shards).max(1) * sampler.step();
        let len = sampler.pixels().len();
        let ranges: Vec<Range<usize>> = (0..len)
            .step_by(per_shard)
            .map(|start| start..(start + per_shard).min(len))
            .collect();
        debug!("hue histogram: {} shards of {} bytes", ranges.len(), per_shard);

        let histogram = ranges
            .into_par_iter()
            .map(|range| Self::build_range(sampler, filter, range))
            .reduce(HueHistogram::default, |mut acc, part| {
                acc.merge(part);
                acc
            });
        histogram.ensure_sampled()?;
        Ok(histogram)
    }

    fn build_range<F>(sampler: &PixelSampler<'_>, filter: &F, range: Range<usize>) -> Self
    where
        F: PixelFilter + ?Sized,
    {
        let pixels = sampler.pixels();
        let mut histogram = HueHistogram::default();

        for i in sampler.range_indices(range) {
            let [r, g, b, _] = sampler.rgba(i);
            let hslc = rgb_to_hslc(r, g, b);
            histogram.lightness.record(hslc.l);

            if !filter.accept(pixels, i) {
                continue;
            }
            if hslc.s < MIN_SATURATION || hslc.l < MIN_LIGHTNESS || hslc.l > MAX_LIGHTNESS {
                continue;
            }

            let totals = histogram.buckets.entry(hue_bucket(hslc.h)).or_default();
            *totals += HueTotals { px: 1, c: hslc.c, s: hslc.s, l: hslc.l };
            histogram.total_hued_pixels += 1;
            histogram.total_hued_chroma += hslc.c;
        }

        histogram
    }

    fn ensure_sampled(&self) -> Result<()> {
        if self.lightness.sampled == 0 {
            return Err(AnalysisError::EmptyImage);
        }
        Ok(())
    }

    /// Fold another partial histogram into this one.
    pub fn merge(&mut self, other: HueHistogram) {
        for (hue, totals) in other.buckets {
            *self.buckets.entry(hue).or_default() += totals;
        }
        self.total_hued_pixels += other.total_hued_pixels;
        self.total_hued_chroma += other.total_hued_chroma;
        self.lightness = self.lightness + other.lightness;
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn is_dark_compatible(&self) -> bool {
        self.lightness.is_dark_compatible()
    }
}
