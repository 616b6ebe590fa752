use crate::foundation::core::Rect;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::format::BandFormat;

/// Minimum pull granularity a node requires.
///
/// The scheduler only issues pulls to a node that satisfy its declared
/// granularity; consumer rectangles are merged or split to comply.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub enum DemandStyle {
    /// Any rectangle may be requested directly.
    Any,
    /// Only full-width strips of at most `rows` rows, aligned to multiples
    /// of `rows` from the top of the image.
    ThinStrip {
        /// Strip height in rows, must be non-zero.
        rows: u32,
    },
}

/// Finalized description of an image node: geometry, band count, sample
/// format, and demand hint.
///
/// Headers are computed from a node's recipe when the node is built, never
/// from sampled pixel data, and are immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageHeader {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Band (channel) count.
    pub bands: u32,
    /// Sample format tag.
    pub format: BandFormat,
    /// Minimum pull granularity.
    pub demand: DemandStyle,
}

impl ImageHeader {
    /// Build a validated header.
    pub fn new(
        width: u32,
        height: u32,
        bands: u32,
        format: BandFormat,
        demand: DemandStyle,
    ) -> TesseraResult<Self> {
        if width == 0 || height == 0 {
            return Err(TesseraError::configuration(
                "image width and height must be > 0",
            ));
        }
        if bands == 0 {
            return Err(TesseraError::configuration("image bands must be > 0"));
        }
        if let DemandStyle::ThinStrip { rows } = demand
            && rows == 0
        {
            return Err(TesseraError::configuration("strip rows must be > 0"));
        }
        Ok(Self {
            width,
            height,
            bands,
            format,
            demand,
        })
    }

    /// Full image extent as a rectangle at the origin.
    pub fn extent(&self) -> Rect {
        Rect::sized(self.width, self.height)
    }

    /// Scalars per pixel: `bands * format.components()`.
    pub fn scalars_per_pixel(&self) -> usize {
        self.bands as usize * self.format.components()
    }

    /// Scalar count of a buffer covering `rect` in this header's format.
    pub fn scalars_for(&self, rect: Rect) -> usize {
        rect.pixels() * self.scalars_per_pixel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_headers() {
        assert!(ImageHeader::new(0, 1, 1, BandFormat::UChar, DemandStyle::Any).is_err());
        assert!(ImageHeader::new(1, 1, 0, BandFormat::UChar, DemandStyle::Any).is_err());
        assert!(
            ImageHeader::new(1, 1, 1, BandFormat::UChar, DemandStyle::ThinStrip { rows: 0 })
                .is_err()
        );
    }

    #[test]
    fn complex_scalars_count_both_components() {
        let h = ImageHeader::new(3, 2, 2, BandFormat::DpComplex, DemandStyle::Any).unwrap();
        assert_eq!(h.scalars_per_pixel(), 4);
        assert_eq!(h.scalars_for(h.extent()), 24);
    }
}
