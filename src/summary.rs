//! Representative colours for each merged bin.

use serde::Serialize;

use crate::bins::HueBin;
use crate::color::hsl_to_hex;
use crate::histogram::HueTotals;

/// A colour as hue in degrees, saturation and lightness in whole percent,
/// and its `#rrggbb` rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColorPoint {
    pub h: u16,
    pub s: u8,
    pub l: u8,
    pub hex: String,
}

impl ColorPoint {
    /// Average saturation and lightness of `totals`, placed at hue `h`.
    fn averaged(h: u16, totals: &HueTotals) -> Self {
        let s = percent(totals.s, totals.px);
        let l = percent(totals.l, totals.px);
        ColorPoint { h, s, l, hex: hsl_to_hex(h as f64, s as f64, l as f64) }
    }
}

fn percent(sum: f64, px: u32) -> u8 {
    (100.0 * sum / px as f64).round().clamp(0.0, 100.0) as u8
}

/// A bin together with its peak colour and the colours at both ends.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BinSummary {
    #[serde(flatten)]
    pub bin: HueBin,
    pub peak: ColorPoint,
    pub left: ColorPoint,
    pub right: ColorPoint,
}

impl BinSummary {
    pub fn new(bin: HueBin) -> Self {
        let peak = ColorPoint::averaged(bin.peak_hue, &bin.peak_totals);
        let edge = |hue: u16| {
            if hue == bin.peak_hue {
                peak.clone()
            } else {
                ColorPoint::averaged(hue, &bin.all_hue_totals)
            }
        };
        let left = edge(bin.first_hue);
        let right = edge(bin.last_hue);
        BinSummary { bin, peak, left, right }
    }
}

pub fn summarize(bins: Vec<HueBin>) -> Vec<BinSummary> {
    bins.into_iter().map(BinSummary::new).collect()
}
