//! Strided walk over an RGBA byte buffer.

use std::iter::StepBy;
use std::ops::Range;

use crate::error::{AnalysisError, Result};

/// Every `quality`-th pixel is visited unless configured otherwise.
pub const DEFAULT_QUALITY: i64 = 10;

/// Alpha at or above which [`MinAlpha::default`] accepts a pixel.
pub const DEFAULT_MIN_ALPHA: u8 = 127;

const BYTES_PER_PIXEL: usize = 4;

/// Decides whether the pixel starting at `index` in `pixels` is considered.
pub trait PixelFilter {
    fn accept(&self, pixels: &[u8], index: usize) -> bool;
}

impl<F> PixelFilter for F
where
    F: Fn(&[u8], usize) -> bool,
{
    fn accept(&self, pixels: &[u8], index: usize) -> bool {
        self(pixels, index)
    }
}

/// Accepts pixels whose alpha channel is at least the given value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinAlpha(pub u8);

impl Default for MinAlpha {
    fn default() -> Self {
        MinAlpha(DEFAULT_MIN_ALPHA)
    }
}

impl PixelFilter for MinAlpha {
    fn accept(&self, pixels: &[u8], index: usize) -> bool {
        pixels[index + 3] >= self.0
    }
}

/// Turn a configured quality into a byte stride.
pub fn stride_for(quality: i64) -> Result<usize> {
    if quality <= 0 {
        return Err(AnalysisError::InvalidQuality(quality));
    }
    usize::try_from(quality)
        .ok()
        .and_then(|q| q.checked_mul(BYTES_PER_PIXEL))
        .ok_or(AnalysisError::InvalidQuality(quality))
}

/// Borrowing view over a pixel buffer that yields the byte offset of every
/// sampled pixel. Nothing is copied.
#[derive(Clone, Copy, Debug)]
pub struct PixelSampler<'a> {
    pixels: &'a [u8],
    step: usize,
}

impl<'a> PixelSampler<'a> {
    pub fn new(pixels: &'a [u8], quality: i64) -> Result<Self> {
        let step = stride_for(quality)?;
        if pixels.len() % BYTES_PER_PIXEL != 0 {
            return Err(AnalysisError::InvalidBufferLength(pixels.len()));
        }
        Ok(Self { pixels, step })
    }

    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    /// Distance in bytes between two sampled pixels.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Number of pixels [`indices`](Self::indices) yields.
    pub fn len(&self) -> usize {
        self.pixels.len().div_ceil(self.step)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn indices(&self) -> StepBy<Range<usize>> {
        self.range_indices(0..self.pixels.len())
    }

    /// Sampled offsets inside `range`. `range.start` must be a multiple of
    /// [`step`](Self::step) for the result to line up with [`indices`](Self::indices).
    pub fn range_indices(&self, range: Range<usize>) -> StepBy<Range<usize>> {
        let end = range.end.min(self.pixels.len());
        (range.start..end).step_by(self.step)
    }

    /// RGBA channels of the pixel at `index`.
    #[inline(always)]
    pub fn rgba(&self, index: usize) -> [u8; 4] {
        let p = &self.pixels[index..index + BYTES_PER_PIXEL];
        [p[0], p[1], p[2], p[3]]
    }

    /// Sampled pixels that pass `filter`, with their offsets.
    pub fn filtered<'f, F>(&self, filter: &'f F) -> impl Iterator<Item = (usize, [u8; 4])> + use<'a, 'f, F>
    where
        F: PixelFilter + ?Sized,
    {
        let sampler = *self;
        self.indices()
            .filter(move |&i| filter.accept(sampler.pixels, i))
            .map(move |i| (i, sampler.rgba(i)))
    }
}
