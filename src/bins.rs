//! Merging hue buckets into contiguous bins.
//!
//! Buckets are visited from the highest total chroma down. Each one either
//! extends a bin it touches (one bucket-width past either open end, modulo
//! 360) or starts a new bin. The sweep stops at the first bucket that
//! contributes less than 1/400 of the total chroma.

use std::cmp::Ordering;

use log::debug;
use serde::Serialize;

use crate::histogram::{BUCKET_SIZE, HueHistogram, HueTotals};

/// Share of the total chroma a bucket needs to keep the sweep going.
const STOP_DIVISOR: f64 = 400.0;

/// A contiguous run of hue buckets around a seed bucket.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HueBin {
    pub peak_hue: u16,
    pub first_hue: u16,
    pub last_hue: u16,
    pub all_hue_totals: HueTotals,
    pub peak_totals: HueTotals,
}

impl HueBin {
    fn seed(hue: u16, totals: HueTotals) -> Self {
        HueBin {
            peak_hue: hue,
            first_hue: hue,
            last_hue: hue,
            all_hue_totals: totals,
            peak_totals: totals,
        }
    }

    /// Extend the bin by `hue` if it sits right next to either open end.
    fn try_attach(&mut self, hue: u16, totals: HueTotals) -> bool {
        if (self.first_hue + 360 - BUCKET_SIZE) % 360 == hue {
            self.first_hue = hue;
        } else if (self.last_hue + BUCKET_SIZE) % 360 == hue {
            self.last_hue = hue;
        } else {
            return false;
        }
        self.all_hue_totals += totals;
        true
    }

    /// Bucket keys from `first_hue` to `last_hue`, walking up the circle.
    pub fn hues(&self) -> impl Iterator<Item = u16> + use<> {
        let span = (self.last_hue + 360 - self.first_hue) % 360 / BUCKET_SIZE;
        let first = self.first_hue;
        (0..=span).map(move |k| (first + k * BUCKET_SIZE) % 360)
    }
}

/// Group the histogram's buckets into bins, most chromatic first.
pub fn merge_buckets(histogram: &HueHistogram) -> Vec<HueBin> {
    let mut buckets: Vec<(u16, HueTotals)> =
        histogram.buckets.iter().map(|(&hue, &totals)| (hue, totals)).collect();
    // Stable, so equal chroma keeps ascending hue order.
    buckets.sort_by(|a, b| b.1.c.partial_cmp(&a.1.c).unwrap_or(Ordering::Equal));

    let Some((&(peak_hue, peak_totals), rest)) = buckets.split_first() else {
        return Vec::new();
    };

    let threshold = histogram.total_hued_chroma / STOP_DIVISOR;
    let mut bins = vec![HueBin::seed(peak_hue, peak_totals)];

    for &(hue, totals) in rest {
        let attached = bins.iter_mut().any(|bin| bin.try_attach(hue, totals));
        let below = totals.c < threshold;
        // A weak bucket may still widen a bin but never starts one, so every
        // bin past the first is seeded above the threshold.
        if !attached && !below {
            bins.push(HueBin::seed(hue, totals));
        }
        if below {
            debug!("bin merge: stopped at hue {hue} ({:.3} < {threshold:.3})", totals.c);
            break;
        }
    }

    debug!("bin merge: {} buckets -> {} bins", buckets.len(), bins.len());
    bins
}
