//! Small RGB palette via k-means in Lab space.
//!
//! Runs next to the hue analysis and shares its sampling: the same stride
//! and the same pixel filter decide which pixels are clustered.

use std::collections::HashMap;

use kmeans_colors::get_kmeans;
use log::debug;
use palette::{IntoColor, Lab, LinSrgb, Srgb};

use crate::error::Result;
use crate::sampler::{PixelFilter, PixelSampler};

const MAX_ITERATIONS: usize = 20;
const CONVERGENCE: f32 = 1e-4;
const SEED: u64 = 0;
// k-means cluster indices are stored as u8.
pub const MAX_COLORS: usize = u8::MAX as usize + 1;

fn to_hex(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

/// Up to `count` representative colours, most populous first. `count` is
/// capped at [`MAX_COLORS`].
///
/// When the sample holds no more than `count` distinct colours those are
/// returned as-is instead of clustering.
pub fn quantize_palette<F>(pixels: &[u8], count: usize, quality: i64, filter: &F) -> Result<Vec<String>>
where
    F: PixelFilter + ?Sized,
{
    let sampler = PixelSampler::new(pixels, quality)?;
    if count == 0 {
        return Ok(Vec::new());
    }
    if count > MAX_COLORS {
        debug!("quantize: count {count} capped at {MAX_COLORS}");
    }
    let count = count.min(MAX_COLORS);

    // First-seen order is kept so ties in population stay deterministic.
    let mut distinct: Vec<([u8; 3], usize)> = Vec::new();
    let mut slot: HashMap<[u8; 3], usize> = HashMap::new();
    let mut samples: Vec<[u8; 3]> = Vec::with_capacity(sampler.len());
    for (_, [r, g, b, _]) in sampler.filtered(filter) {
        let rgb = [r, g, b];
        let idx = *slot.entry(rgb).or_insert_with(|| {
            distinct.push((rgb, 0));
            distinct.len() - 1
        });
        distinct[idx].1 += 1;
        samples.push(rgb);
    }

    if distinct.len() <= count {
        distinct.sort_by(|a, b| b.1.cmp(&a.1));
        return Ok(distinct
            .into_iter()
            .map(|([r, g, b], _)| to_hex(Srgb::new(r, g, b)))
            .collect());
    }

    let lab_pixels: Vec<Lab> = samples
        .iter()
        .map(|&[r, g, b]| {
            let linear: LinSrgb<f32> = Srgb::<u8>::new(r, g, b).into_linear();
            linear.into_color()
        })
        .collect();
    let kmeans = get_kmeans(count, MAX_ITERATIONS, CONVERGENCE, false, &lab_pixels, SEED);
    debug!(
        "quantize: {} samples, {} distinct, k = {}, score {:.4}",
        samples.len(),
        distinct.len(),
        count,
        kmeans.score
    );

    let mut population = vec![0usize; kmeans.centroids.len()];
    for &idx in &kmeans.indices {
        population[idx as usize] += 1;
    }

    let mut ranked: Vec<(usize, &Lab)> = population.into_iter().zip(kmeans.centroids.iter()).collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(ranked
        .into_iter()
        .filter(|&(n, _)| n > 0)
        .map(|(_, &lab)| {
            let rgb_f32: Srgb<f32> = Srgb::from_linear(lab.into_color());
            to_hex(rgb_f32.into_format::<u8>())
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::MinAlpha;

    fn image(pixels: &[[u8; 4]]) -> Vec<u8> {
        pixels.iter().flatten().copied().collect()
    }

    #[test]
    fn few_colours_come_back_exactly_by_population() {
        let pixels = image(&[
            [0, 0, 255, 255],
            [255, 0, 0, 255],
            [0, 0, 255, 255],
            [0, 255, 0, 0],
        ]);
        let palette = quantize_palette(&pixels, 5, 1, &MinAlpha::default()).unwrap();
        assert_eq!(palette, vec!["#0000ff".to_string(), "#ff0000".to_string()]);
    }

    #[test]
    fn zero_count_or_no_pixels_is_empty() {
        let pixels = image(&[[1, 2, 3, 255]]);
        assert!(quantize_palette(&pixels, 0, 1, &MinAlpha::default()).unwrap().is_empty());
        let transparent = image(&[[1, 2, 3, 0]; 3]);
        assert!(quantize_palette(&transparent, 5, 1, &MinAlpha::default()).unwrap().is_empty());
    }

    #[test]
    fn clusters_down_to_count() {
        let mut px = Vec::new();
        for i in 0..40u8 {
            px.push([200 + i / 4, 10, 10, 255]);
            px.push([10, 10, 200 + i / 4, 255]);
        }
        let palette = quantize_palette(&image(&px), 2, 1, &MinAlpha::default()).unwrap();
        assert_eq!(palette.len(), 2);
        for hex in &palette {
            assert_eq!(hex.len(), 7);
        }
        let reddish = palette.iter().filter(|h| u8::from_str_radix(&h[1..3], 16).unwrap() > 150).count();
        assert_eq!(reddish, 1);
    }

    #[test]
    fn count_is_capped_at_max_colors() {
        let px: Vec<[u8; 4]> = (0..300u32).map(|i| [(i % 256) as u8, (i / 256 * 200) as u8, 90, 255]).collect();
        let palette = quantize_palette(&image(&px), 1000, 1, &MinAlpha::default()).unwrap();
        assert!(!palette.is_empty());
        assert!(palette.len() <= MAX_COLORS, "got {} colours", palette.len());
    }

    #[test]
    fn bad_quality_is_rejected() {
        let pixels = image(&[[1, 2, 3, 255]]);
        assert!(quantize_palette(&pixels, 5, 0, &MinAlpha::default()).is_err());
    }
}
