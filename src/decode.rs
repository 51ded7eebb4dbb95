//! Decoding image files into flat RGBA8 buffers.

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use log::debug;

use crate::error::Result;

/// Row-major, RGBA-interleaved pixel data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl From<DynamicImage> for DecodedImage {
    fn from(img: DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        // Work with RGBA so the alpha filter always has a channel to read.
        let data = img.to_rgba8().into_raw();
        DecodedImage { width, height, data }
    }
}

/// Decode an in-memory image; the format is guessed from its contents.
pub fn decode_rgba(input: &[u8]) -> Result<DecodedImage> {
    let img = image::load_from_memory(input)?;
    let decoded = DecodedImage::from(img);
    debug!("decoded {}x{} image", decoded.width, decoded.height);
    Ok(decoded)
}

/// Read and decode the image at `path`.
pub fn open_rgba(path: impl AsRef<Path>) -> Result<DecodedImage> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_rgba(&bytes)
}
