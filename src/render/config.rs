//! # Render Configuration
//!
//! Output parameters that do not come from the notebook itself.
//!
//! ## Calculations
//!
//! ```text
//! points_per_pixel = 72 / dpi
//! pixel_size       = textlayerfontsize × font_size_factor
//!
//! At the default 300 DPI:
//!   points_per_pixel = 0.24
//!   a 2480 × 3508 px notebook page = 595.2 × 841.9 pt (A4)
//! ```

use crate::ir::Typeface;

/// # Render Configuration
///
/// - **dpi**: notebook pixels per inch; sets the pixel → point scale
/// - **font_size_factor**: LectureNotes stores font sizes 4/3 too large
/// - **default_typeface**: used when the notebook's font family code is unknown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub dpi: f32,
    pub font_size_factor: f32,
    pub default_typeface: Typeface,
}

impl RenderConfig {
    /// # Default Configuration
    ///
    /// | Property | Value |
    /// |----------|-------|
    /// | DPI | 300 |
    /// | Font size factor | 0.75 |
    /// | Typeface | sans-serif |
    pub const DEFAULT: Self = Self {
        dpi: 300.0,
        font_size_factor: 0.75,
        default_typeface: Typeface::Sans,
    };

    /// Same configuration at a different resolution.
    pub fn with_dpi(self, dpi: f32) -> Self {
        Self { dpi, ..self }
    }

    /// PDF points per notebook pixel.
    ///
    /// ## Example
    ///
    /// ```
    /// use lnpdf::render::RenderConfig;
    ///
    /// let config = RenderConfig::DEFAULT;
    /// assert!((config.points_per_pixel() - 0.24).abs() < 1e-6);
    /// ```
    #[inline]
    pub fn points_per_pixel(&self) -> f32 {
        72.0 / self.dpi
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
