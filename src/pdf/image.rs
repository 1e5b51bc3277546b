//! Bitmap layers as PDF image data.
//!
//! Layers are decoded with the `image` crate and split into a deflated RGB
//! plane plus, when any pixel is translucent, a deflated alpha plane used
//! as a soft mask.

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbaImage;

use crate::error::{LnPdfError, Result};

/// A decoded, compressed page layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    /// Deflated 8-bit RGB samples
    pub rgb: Vec<u8>,
    /// Deflated 8-bit alpha samples, absent for opaque images
    pub alpha: Option<Vec<u8>>,
}

impl PageImage {
    /// Decode an image file.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| LnPdfError::Image(format!("{}: {}", path.display(), e)))?;
        Self::from_rgba(&img.to_rgba8())
    }

    pub fn from_rgba(img: &RgbaImage) -> Result<Self> {
        let pixels = img.as_raw();
        let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);
        let mut alpha = Vec::with_capacity(pixels.len() / 4);
        for px in pixels.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
            alpha.push(px[3]);
        }

        let alpha = if alpha.iter().all(|&a| a == u8::MAX) {
            None
        } else {
            Some(deflate(&alpha)?)
        };

        Ok(Self {
            width: img.width(),
            height: img.height(),
            rgb: deflate(&rgb)?,
            alpha,
        })
    }
}

/// Zlib-compress `data` for a `/FlateDecode` stream.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
